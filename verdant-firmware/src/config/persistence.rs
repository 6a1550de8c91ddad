//! Settings persistence
//!
//! Loads and saves the settings record to flash storage.

use defmt::*;

use verdant_core::config::Settings;
use verdant_hal_rp2040::flash::{FlashError, Rp2040FlashStorage, StorageKey, MAX_ITEM_SIZE};
use verdant_hal_rp2040::FlashStorageTrait;

use super::defaults::default_settings;

/// Settings persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// CRC check failed
    CrcMismatch,
    /// Invalid magic or version
    InvalidFormat,
}

impl From<FlashError> for SettingsError {
    fn from(e: FlashError) -> Self {
        SettingsError::Flash(e)
    }
}

/// Load settings from flash
///
/// Falls back to the plant.toml defaults if nothing is stored or the
/// stored record does not validate.
pub async fn load_settings(storage: &mut Rp2040FlashStorage<'_>) -> Settings {
    match load_settings_inner(storage).await {
        Ok(settings) => {
            info!("Loaded settings from flash");
            log_settings(&settings);
            settings
        }
        Err(SettingsError::Flash(FlashError::NotFound)) => {
            info!("No settings in flash, using defaults");
            default_settings()
        }
        Err(e) => {
            warn!("Failed to load settings: {:?}, using defaults", e);
            default_settings()
        }
    }
}

async fn load_settings_inner(
    storage: &mut Rp2040FlashStorage<'_>,
) -> Result<Settings, SettingsError> {
    let mut buffer = [0u8; MAX_ITEM_SIZE];
    let len = storage.read(StorageKey::Settings, &mut buffer).await?;

    debug!("Read {} bytes of settings from flash", len);

    let settings: Settings =
        postcard::from_bytes(&buffer[..len]).map_err(|_| SettingsError::Deserialize)?;

    if !settings.is_valid() {
        return Err(SettingsError::InvalidFormat);
    }

    if !settings.verify_crc() {
        warn!("Settings CRC mismatch");
        return Err(SettingsError::CrcMismatch);
    }

    Ok(settings)
}

/// Save settings to flash
///
/// Refreshes the CRC on a copy before serializing, so a record that
/// was edited field by field still validates on the next boot.
pub async fn save_settings(
    storage: &mut Rp2040FlashStorage<'_>,
    settings: &Settings,
) -> Result<(), SettingsError> {
    let mut record = settings.clone();
    record.update_crc();

    let mut buffer = [0u8; MAX_ITEM_SIZE];
    let bytes = postcard::to_slice(&record, &mut buffer).map_err(|_| SettingsError::Serialize)?;

    debug!("Saving {} bytes of settings to flash", bytes.len());

    storage.write(StorageKey::Settings, bytes).await?;

    info!("Saved settings to flash");
    log_settings(&record);
    Ok(())
}

fn log_settings(settings: &Settings) {
    debug!(
        "Settings: name={}, start={}.{}.{}, threshold={}%",
        settings.name.as_str(),
        settings.start_date.year,
        settings.start_date.month,
        settings.start_date.day,
        settings.moisture_threshold,
    );
    match settings.calibration {
        Some(cal) => debug!("  Sensor calibration: min={} max={}", cal.min, cal.max),
        None => debug!("  Sensor not calibrated"),
    }
}
