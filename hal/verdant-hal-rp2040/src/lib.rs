//! RP2040-specific HAL for the plant station firmware
//!
//! Implements the shared `verdant-hal` traits on top of embassy-rp:
//!
//! - Encoder inputs with pull-ups and edge waiting
//! - ADC channel reader for the moisture probe
//! - Flash storage driver (implements `verdant_hal::FlashStorage`)

#![no_std]

pub mod adc;
pub mod flash;
pub mod gpio;

// Re-export shared traits from verdant-hal for convenience
pub use verdant_hal::{AdcReader, FlashStorage as FlashStorageTrait, InputPin, StorageKey};
