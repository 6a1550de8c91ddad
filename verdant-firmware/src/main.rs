//! Verdant - Plant Watering Station Firmware
//!
//! Firmware for a Raspberry Pi Pico W that watches soil moisture,
//! shows it on a 16x2 character LCD and is driven by a rotary encoder
//! with a push-button.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::rtc::{InterruptHandler as RtcInterruptHandler, Rtc};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use verdant_core::menu::IdleMonitor;
use verdant_core::traits::CharacterDisplay;
use verdant_drivers::encoder::RotaryEncoder;
use verdant_drivers::lcd::{Lcd1602, DEFAULT_ADDRESS};
use verdant_drivers::moisture::MoistureProbe;
use verdant_hal_rp2040::adc::AdcChannelReader;
use verdant_hal_rp2040::flash::Rp2040FlashStorage;
use verdant_hal_rp2040::gpio::EncoderInput;

use crate::config::defaults::{
    CALIBRATION_TIMING, CLOCK_INITIAL_DATE, IDLE_TIMEOUT_MS, POLL_INTERVAL_MS, READING_INTERVAL_MS,
};
use crate::controller::BoardClock;

mod channels;
mod config;
mod controller;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
    RTC_IRQ => RtcInterruptHandler;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Verdant firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Character LCD on I2C0 (SDA=GPIO8, SCL=GPIO9)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, I2cConfig::default());
    let mut lcd = match Lcd1602::new(i2c, Delay, DEFAULT_ADDRESS) {
        Ok(lcd) => lcd,
        Err(e) => {
            error!("LCD init failed: {:?}", e);
            cortex_m::peripheral::SCB::sys_reset();
        }
    };
    if let Err(e) = lcd.render("Startup Sequence", "in progress...") {
        error!("LCD write failed: {:?}", e);
        cortex_m::peripheral::SCB::sys_reset();
    }
    info!("LCD initialized");

    // Settings from flash (or plant.toml defaults)
    let mut storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);
    let settings = config::load_settings(&mut storage).await;

    // Calendar clock
    let clock = BoardClock::new(Rtc::new(p.RTC, Irqs), CLOCK_INITIAL_DATE);

    // Moisture probe on ADC1 (GPIO27)
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let channel = Channel::new_pin(p.PIN_27, Pull::None);
    let probe = MoistureProbe::new(AdcChannelReader::new(adc, channel), settings.calibration);

    // Rotary encoder (DT=GPIO12, CLK=GPIO11, SW=GPIO13)
    let encoder = RotaryEncoder::new(
        EncoderInput::new(p.PIN_12.into()),
        EncoderInput::new(p.PIN_11.into()),
        EncoderInput::new(p.PIN_13.into()),
    );
    info!("Encoder initialized");

    let idle = IdleMonitor::new(IDLE_TIMEOUT_MS);

    spawner.spawn(tasks::lcd_task(lcd)).unwrap();
    spawner.spawn(tasks::settings_task(storage)).unwrap();
    spawner
        .spawn(tasks::sensor_task(probe, READING_INTERVAL_MS, CALIBRATION_TIMING))
        .unwrap();
    spawner.spawn(tasks::tick_task(POLL_INTERVAL_MS)).unwrap();
    spawner
        .spawn(tasks::controller_task(settings, clock, idle))
        .unwrap();
    spawner.spawn(tasks::encoder_task(encoder)).unwrap();

    info!("All tasks spawned, firmware running");
}
