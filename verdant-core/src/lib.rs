//! Board-agnostic core logic for the plant station firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Rotary encoder quadrature and push-button decoding
//! - Event dispatch from the decoder to its listeners
//! - Menu state machine driving the two-line character display
//! - Idle monitor that falls back to the status screen
//! - Settings and calendar types persisted by the firmware
//! - Collaborator traits (display, settings store, clock, sensor)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod input;
pub mod menu;
pub mod traits;
