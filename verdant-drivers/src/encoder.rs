//! Rotary encoder with integrated push-button
//!
//! Wraps the three encoder lines and a [`RotaryDecoder`]. The firmware
//! calls [`RotaryEncoder::on_line_edge`] or
//! [`RotaryEncoder::on_button_edge`] whenever a line changes; the
//! driver samples the current levels and returns the decoded event, if
//! any.

use verdant_core::input::{DecodedEvent, PinState, QuadratureLine, RotaryDecoder};
use verdant_hal::InputPin;

/// Rotary encoder over three input pins
///
/// - `DT`: data line (quadrature B)
/// - `CLK`: clock line (quadrature A)
/// - `SW`: push-button, active low
pub struct RotaryEncoder<DT, CLK, SW> {
    dt: DT,
    clk: CLK,
    sw: SW,
    decoder: RotaryDecoder,
}

impl<DT, CLK, SW> RotaryEncoder<DT, CLK, SW>
where
    DT: InputPin,
    CLK: InputPin,
    SW: InputPin,
{
    /// Create the encoder, seeding the decoder from the current levels
    pub fn new(dt: DT, clk: CLK, sw: SW) -> Self {
        let lines = PinState::new(dt.is_high(), clk.is_high());
        let decoder = RotaryDecoder::with_initial(lines, sw.is_high());
        Self {
            dt,
            clk,
            sw,
            decoder,
        }
    }

    /// A quadrature line changed level
    pub fn on_line_edge(&mut self, line: QuadratureLine) -> Option<DecodedEvent> {
        let dt = self.dt.is_high();
        let clk = self.clk.is_high();

        #[cfg(feature = "defmt")]
        defmt::trace!("encoder edge on {}: dt={} clk={}", line, dt, clk);

        self.decoder.on_pin_change(line, dt, clk)
    }

    /// The button line changed level
    pub fn on_button_edge(&mut self) -> Option<DecodedEvent> {
        self.decoder.on_button_change(self.sw.is_high())
    }

    pub fn is_button_pressed(&self) -> bool {
        self.decoder.is_button_pressed()
    }

    /// Mutable access to the pins, e.g. to wait for the next edge
    pub fn pins_mut(&mut self) -> (&mut DT, &mut CLK, &mut SW) {
        (&mut self.dt, &mut self.clk, &mut self.sw)
    }

    /// Release the pins
    pub fn release(self) -> (DT, CLK, SW) {
        (self.dt, self.clk, self.sw)
    }
}
