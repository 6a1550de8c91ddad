//! Tick task for the idle monitor
//!
//! Wakes the controller at a fixed cadence so it can check for
//! inactivity.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Signal to notify controller of tick, carrying milliseconds since boot
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u64> = Signal::new();

#[embassy_executor::task]
pub async fn tick_task(interval_ms: u64) {
    info!("Tick task started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(Instant::now().as_millis());
    }
}
