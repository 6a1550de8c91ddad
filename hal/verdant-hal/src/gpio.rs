//! GPIO pin abstractions
//!
//! Provides the digital input trait used by the rotary encoder driver.
//! Chip-specific HALs implement it on top of their own pin types.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip. Reads must be cheap and non-blocking, since the
/// encoder samples its lines from edge-notification context.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &T {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_is_low_is_inverse() {
        assert!(Level(false).is_low());
        assert!(!Level(true).is_low());
    }

    #[test]
    fn test_reference_forwards() {
        let pin = Level(true);
        let by_ref = &pin;
        assert!(InputPin::is_high(&by_ref));
    }
}
