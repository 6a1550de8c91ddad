//! Analog-to-digital converter abstractions
//!
//! The RP2040 ADC is 12-bit; readings are returned unscaled.

/// Errors from an ADC conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete or reported an error flag
    Conversion,
}

/// One-shot ADC channel reader
///
/// Reading is async because the conversion completes on an interrupt.
pub trait AdcReader {
    /// Read a single raw sample from the channel
    fn read(&mut self) -> impl core::future::Future<Output = Result<u16, AdcError>>;
}
