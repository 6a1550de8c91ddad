//! Persistent storage abstractions
//!
//! A tiny key/value interface over on-chip flash. The chip HAL is
//! responsible for wear leveling; callers deal in whole records.

use core::future::Future;

/// Keys of the records kept in flash
///
/// The discriminant is the byte written to flash, so existing values
/// must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Settings record (postcard-encoded)
    Settings = 0x53,
}

impl From<StorageKey> for u8 {
    fn from(key: StorageKey) -> u8 {
        key as u8
    }
}

impl TryFrom<u8> for StorageKey {
    type Error = FlashError;

    fn try_from(value: u8) -> Result<Self, FlashError> {
        match value {
            0x53 => Ok(StorageKey::Settings),
            _ => Err(FlashError::Corrupted),
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Underlying flash or map operation failed
    Storage,
    /// No record under this key
    NotFound,
    /// Record does not fit the caller's buffer
    BufferTooSmall,
    /// Stored data is unreadable
    Corrupted,
    /// No room left for the record
    Full,
}

/// Key/value record storage
pub trait FlashStorage {
    /// Copy the record stored under `key` into `buffer`
    ///
    /// Returns the record length.
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<usize, FlashError>>;

    /// Store `data` under `key`, replacing any previous record
    fn write(&mut self, key: StorageKey, data: &[u8])
        -> impl Future<Output = Result<(), FlashError>>;

    /// Whether a record is stored under `key`
    fn exists(&mut self, key: StorageKey) -> impl Future<Output = bool> {
        async move {
            matches!(
                self.read(key, &mut []).await,
                Ok(_) | Err(FlashError::BufferTooSmall)
            )
        }
    }
}

#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let slot = buffer
            .first_mut()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        *slot = u8::from(*self);
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let byte = buffer
            .first()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        StorageKey::try_from(*byte)
            .map(|key| (key, 1))
            .map_err(|_| sequential_storage::map::SerializationError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-slot storage for exercising the provided methods
    struct OneRecord {
        data: Option<[u8; 4]>,
    }

    impl FlashStorage for OneRecord {
        async fn read(&mut self, _key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
            let data = self.data.ok_or(FlashError::NotFound)?;
            if buffer.len() < data.len() {
                return Err(FlashError::BufferTooSmall);
            }
            buffer[..data.len()].copy_from_slice(&data);
            Ok(data.len())
        }

        async fn write(&mut self, _key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
            let record: [u8; 4] = data.try_into().map_err(|_| FlashError::Full)?;
            self.data = Some(record);
            Ok(())
        }
    }

    /// Drive a future that never pends
    fn ready<F: Future>(future: F) -> F::Output {
        use core::pin::pin;
        use core::task::{Context, Poll, Waker};

        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => output,
            Poll::Pending => panic!("future pended"),
        }
    }

    #[test]
    fn test_key_byte() {
        assert_eq!(u8::from(StorageKey::Settings), 0x53);
        assert_eq!(StorageKey::try_from(0x53), Ok(StorageKey::Settings));
        assert_eq!(StorageKey::try_from(0x00), Err(FlashError::Corrupted));
    }

    #[test]
    fn test_exists_follows_contents() {
        let mut storage = OneRecord { data: None };
        assert!(!ready(storage.exists(StorageKey::Settings)));

        ready(storage.write(StorageKey::Settings, &[1, 2, 3, 4])).unwrap();
        assert!(ready(storage.exists(StorageKey::Settings)));
    }

    #[test]
    fn test_read_into_short_buffer() {
        let mut storage = OneRecord {
            data: Some([9, 8, 7, 6]),
        };
        let mut buffer = [0u8; 2];
        assert_eq!(
            ready(storage.read(StorageKey::Settings, &mut buffer)),
            Err(FlashError::BufferTooSmall)
        );
    }
}
