//! Encoder input pins

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;

/// Pulled-up digital input that can wait for edges
///
/// The encoder switches pull its lines to ground, so every line is
/// configured with the internal pull-up enabled.
pub struct EncoderInput<'d> {
    input: Input<'d>,
}

impl<'d> EncoderInput<'d> {
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            input: Input::new(pin, Pull::Up),
        }
    }

    /// Wait until the line changes level in either direction
    pub async fn wait_for_any_edge(&mut self) {
        self.input.wait_for_any_edge().await
    }
}

impl verdant_hal::InputPin for EncoderInput<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
