//! LCD task
//!
//! Owns the I2C character display and draws whatever frame was
//! published last. A bus failure is fatal.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;

use verdant_core::traits::CharacterDisplay;
use verdant_drivers::lcd::Lcd1602;

use crate::channels::SCREEN;

pub type Display = Lcd1602<I2c<'static, I2C0, Blocking>, Delay>;

#[embassy_executor::task]
pub async fn lcd_task(mut lcd: Display) {
    info!("LCD task started");

    loop {
        let frame = SCREEN.wait().await;
        trace!("LCD: '{}' / '{}'", frame.line1.as_str(), frame.line2.as_str());

        if let Err(e) = lcd.render_frame(&frame) {
            error!("LCD write failed: {:?}", e);
            cortex_m::peripheral::SCB::sys_reset();
        }
    }
}
