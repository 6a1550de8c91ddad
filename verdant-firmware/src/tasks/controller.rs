//! Main controller task
//!
//! Owns the menu state machine. Receives decoded input, idle ticks and
//! calibration results, and is the only place that mutates display
//! state. Any collaborator failure restarts the device.

use core::cell::RefCell;

use defmt::*;
use embassy_futures::select::{select3, Either3};

use verdant_core::config::Settings;
use verdant_core::input::EventDispatcher;
use verdant_core::menu::{IdleMonitor, MenuError, MenuStateMachine};

use crate::channels::{CALIBRATION_RESULT, INPUT_CHANNEL};
use crate::controller::{
    BoardClock, CalibrationTrigger, EventLogger, MoistureCache, ScreenOutput, SettingsHandle,
};
use crate::tasks::tick::TICK_SIGNAL;

/// Listener slots: the event logger and the menu
const LISTENERS: usize = 2;

#[embassy_executor::task]
pub async fn controller_task(settings: Settings, clock: BoardClock, idle: IdleMonitor) {
    info!("Controller task started");

    let calibrated = settings.is_calibrated();

    let menu = match MenuStateMachine::new(
        ScreenOutput,
        SettingsHandle::new(settings),
        clock,
        CalibrationTrigger,
    ) {
        Ok(menu) => RefCell::new(menu),
        Err(e) => fatal(e),
    };

    let logger = EventLogger;
    let mut dispatcher: EventDispatcher<'_, MenuError, LISTENERS> = EventDispatcher::new();
    if dispatcher.subscribe(&logger).is_err() || dispatcher.subscribe(&menu).is_err() {
        error!("Event dispatcher out of listener slots");
        cortex_m::peripheral::SCB::sys_reset();
    }

    let mut moisture = MoistureCache::default();

    if !calibrated {
        info!("No sensor calibration stored, calibrating now");
        if let Err(e) = menu.borrow_mut().start_calibration() {
            fatal(e);
        }
    }

    loop {
        let result = match select3(
            INPUT_CHANNEL.receive(),
            TICK_SIGNAL.wait(),
            CALIBRATION_RESULT.wait(),
        )
        .await
        {
            Either3::First(event) => dispatcher.publish(event),
            Either3::Second(now_ms) => idle
                .check(now_ms, &mut menu.borrow_mut(), &mut moisture)
                .map(|shown| {
                    if shown {
                        trace!("Idle, status screen shown");
                    }
                }),
            Either3::Third(Ok(calibration)) => {
                menu.borrow_mut().calibration_complete(calibration)
            }
            Either3::Third(Err(e)) => {
                warn!("Calibration aborted: {:?}", e);
                menu.borrow_mut().calibration_failed()
            }
        };

        if let Err(e) = result {
            fatal(e);
        }
    }
}

fn fatal(e: MenuError) -> ! {
    error!("Fatal collaborator failure: {:?}", e);
    cortex_m::peripheral::SCB::sys_reset()
}
