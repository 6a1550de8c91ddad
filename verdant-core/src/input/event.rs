//! Decoded encoder events

/// Discrete events produced by the rotary decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodedEvent {
    /// Encoder rotated clockwise (1 detent)
    RotateClockwise,
    /// Encoder rotated counter-clockwise (1 detent)
    RotateCounterClockwise,
    /// Push-button went down
    ButtonPress,
    /// Push-button came back up
    ButtonRelease,
}

impl DecodedEvent {
    /// Returns true if this is a rotation event
    pub fn is_rotation(&self) -> bool {
        matches!(
            self,
            DecodedEvent::RotateClockwise | DecodedEvent::RotateCounterClockwise
        )
    }

    /// Returns true if this is a button event
    pub fn is_button(&self) -> bool {
        matches!(self, DecodedEvent::ButtonPress | DecodedEvent::ButtonRelease)
    }

    /// Returns the rotation direction as a signed delta (-1, 0, or +1)
    pub fn rotation_delta(&self) -> i32 {
        match self {
            DecodedEvent::RotateClockwise => 1,
            DecodedEvent::RotateCounterClockwise => -1,
            _ => 0,
        }
    }
}
