//! Flash storage driver for RP2040
//!
//! Keeps a wear-leveled key/value map (sequential-storage) in the last
//! 64KB of the Pico W's 2MB flash. `memory.x` only gives the linker the
//! space below it.

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use verdant_hal::flash::{FlashError, StorageKey};

/// Pico W flash size
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Space reserved for the settings map
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;

pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

pub const SETTINGS_RANGE: Range<u32> = (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Largest item the map will hand back
///
/// The settings record is well under this once postcard-encoded.
pub const MAX_ITEM_SIZE: usize = 256;

const _: () = assert!(SETTINGS_PARTITION_SIZE % ERASE_SIZE == 0);

/// RP2040 flash storage
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    scratch: [u8; MAX_ITEM_SIZE],
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            scratch: [0; MAX_ITEM_SIZE],
        }
    }

    /// Look `key` up, returning the stored bytes if any
    async fn fetch(&mut self, key: StorageKey) -> Result<Option<&[u8]>, FlashError> {
        map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}

impl verdant_hal::FlashStorage for Rp2040FlashStorage<'_> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = self.fetch(key).await?.ok_or(FlashError::NotFound)?;
        let len = data.len();
        if buffer.len() < len {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..len].copy_from_slice(data);
        Ok(len)
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if data.len() > MAX_ITEM_SIZE {
            return Err(FlashError::BufferTooSmall);
        }

        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
            &data,
        )
        .await
        .map_err(|e| match e {
            sequential_storage::Error::FullStorage => FlashError::Full,
            sequential_storage::Error::Corrupted { .. } => FlashError::Corrupted,
            _ => FlashError::Storage,
        })
    }
}
