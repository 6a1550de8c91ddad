//! Moisture sensor task
//!
//! Owns the probe. Publishes a fresh reading after every averaging
//! burst and runs the guided calibration when the controller asks for
//! one. Without a calibration there is nothing to read, so the task
//! just waits for the request.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Delay;

use verdant_drivers::moisture::{CalibrationTiming, MoistureProbe};
use verdant_hal_rp2040::adc::AdcChannelReader;

use crate::channels::{CALIBRATION_REQUEST, CALIBRATION_RESULT, MOISTURE_READING};
use crate::controller::ScreenOutput;

pub type Probe = MoistureProbe<AdcChannelReader<'static>>;

#[embassy_executor::task]
pub async fn sensor_task(mut probe: Probe, reading_interval_ms: u32, timing: CalibrationTiming) {
    info!("Sensor task started");

    let mut delay = Delay;

    loop {
        if probe.calibration().is_none() {
            CALIBRATION_REQUEST.wait().await;
            run_calibration(&mut probe, &mut delay, &timing).await;
            continue;
        }

        let outcome = select(
            CALIBRATION_REQUEST.wait(),
            probe.read_percent(&mut delay, reading_interval_ms),
        )
        .await;

        match outcome {
            Either::First(()) => run_calibration(&mut probe, &mut delay, &timing).await,
            Either::Second(Ok(percent)) => {
                trace!("Moisture {}%", percent);
                MOISTURE_READING.signal(percent);
            }
            Either::Second(Err(e)) => {
                error!("Moisture sensor failed: {:?}", e);
                cortex_m::peripheral::SCB::sys_reset();
            }
        }
    }
}

async fn run_calibration(probe: &mut Probe, delay: &mut Delay, timing: &CalibrationTiming) {
    info!("Starting sensor calibration");

    let result = probe.calibrate(delay, &mut ScreenOutput, timing).await;
    match &result {
        Ok(cal) => info!("Sensor calibrated: min={} max={}", cal.min, cal.max),
        Err(e) => warn!("Sensor calibration failed: {:?}", e),
    }

    CALIBRATION_RESULT.signal(result);
}
