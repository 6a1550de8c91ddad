//! Verdant Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that are implemented by
//! chip-specific HALs. Drivers and the firmware only talk to these traits,
//! which keeps the encoder, sensor and storage code testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  verdant-drivers / verdant-firmware     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  verdant-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ verdant-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (encoder lines, push-button)
//! - [`adc::AdcReader`] - One-shot analog sampling (moisture probe)
//! - [`flash::FlashStorage`] - Persistent key-value storage

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod flash;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AdcReader};
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::InputPin;
