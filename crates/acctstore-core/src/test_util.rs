//! Shared test helpers for `acctstore-core` unit tests.

use crate::accounts::{AccountKind, AccountStore, StoredRecord, STORAGE_KEY};
use crate::error::StorageError;
use crate::storage::{KeyValueStorage, MemoryStorage};

/// A `Local` record with the given id and raw labels, and a login derived
/// from the id so records are distinguishable.
pub fn record(id: &str, labels_raw: &str) -> StoredRecord {
    StoredRecord {
        id: id.to_string(),
        labels_raw: labels_raw.to_string(),
        kind: AccountKind::Local,
        login: format!("user-{id}"),
        password: format!("pw-{id}"),
    }
}

/// Seed a memory medium with `records` and open a store over it. The
/// returned handle shares entries with the store's medium.
pub fn open_with(records: &[StoredRecord]) -> (AccountStore, MemoryStorage) {
    let content = serde_json::to_string(records).expect("fixture records serialize");
    let storage = MemoryStorage::with_entry(STORAGE_KEY, &content);
    (AccountStore::open(storage.clone()), storage)
}

/// A medium where every call fails.
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io(std::io::Error::other("medium unavailable")))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("medium unavailable")))
    }
}
