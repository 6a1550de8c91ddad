//! Settings persistence task
//!
//! Writes the settings record to flash whenever the controller
//! changes it. Several changes in quick succession collapse into one
//! write because the signal only keeps the latest record.

use defmt::*;

use verdant_hal_rp2040::flash::Rp2040FlashStorage;

use crate::channels::SETTINGS_SAVE;
use crate::config::save_settings;

#[embassy_executor::task]
pub async fn settings_task(mut storage: Rp2040FlashStorage<'static>) {
    info!("Settings task started");

    loop {
        let settings = SETTINGS_SAVE.wait().await;
        if let Err(e) = save_settings(&mut storage, &settings).await {
            warn!("Failed to save settings: {:?}", e);
        }
    }
}
