//! Encoder task
//!
//! Waits for an edge on any encoder line, decodes it and queues the
//! resulting event. Nothing here renders or touches storage.

use defmt::*;
use embassy_futures::select::{select3, Either3};

use verdant_core::input::QuadratureLine;
use verdant_drivers::encoder::RotaryEncoder;
use verdant_hal_rp2040::gpio::EncoderInput;

use crate::channels::INPUT_CHANNEL;

pub type Encoder = RotaryEncoder<EncoderInput<'static>, EncoderInput<'static>, EncoderInput<'static>>;

#[embassy_executor::task]
pub async fn encoder_task(mut encoder: Encoder) {
    info!("Encoder task started");

    loop {
        let edge = {
            let (dt, clk, sw) = encoder.pins_mut();
            select3(
                dt.wait_for_any_edge(),
                clk.wait_for_any_edge(),
                sw.wait_for_any_edge(),
            )
            .await
        };

        let decoded = match edge {
            Either3::First(()) => encoder.on_line_edge(QuadratureLine::Data),
            Either3::Second(()) => encoder.on_line_edge(QuadratureLine::Clock),
            Either3::Third(()) => encoder.on_button_edge(),
        };

        if let Some(event) = decoded {
            trace!("Decoded {}", event);
            if INPUT_CHANNEL.try_send(event).is_err() {
                warn!("Input queue full, dropping {}", event);
            }
        }
    }
}
