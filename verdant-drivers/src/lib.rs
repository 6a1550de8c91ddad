//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in verdant-core:
//!
//! - Rotary encoder with push-button over HAL input pins
//! - 16x2 HD44780 character LCD behind a PCF8574 I2C backpack
//! - Capacitive moisture probe with dry/wet calibration

#![no_std]
#![deny(unsafe_code)]

pub mod encoder;
pub mod lcd;
pub mod moisture;
