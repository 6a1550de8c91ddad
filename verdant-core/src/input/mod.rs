//! User input decoding
//!
//! Turns raw encoder line levels into discrete events and fans them out
//! to whoever listens.

pub mod decoder;
pub mod dispatcher;
pub mod event;

pub use decoder::{
    ButtonDecoder, PinState, QuadratureDecoder, QuadratureLine, RotaryDecoder, Transition,
    CLOCKWISE_TRANSITION, COUNTER_CLOCKWISE_TRANSITION,
};
pub use dispatcher::{EventDispatcher, EventListener, SubscribeError};
pub use event::DecodedEvent;
