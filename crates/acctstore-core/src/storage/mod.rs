//! Key-value storage media the account store persists into.
//!
//! The store only ever needs two calls, `get` and `set`, addressed by a
//! single fixed key. Two media are provided:
//! - [`MemoryStorage`] keeps entries in a shared in-process map.
//! - [`FileStorage`] keeps one JSON file per key inside a directory.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// A synchronous string key-value medium.
///
/// `get` returns `Ok(None)` when the key has never been written. `set`
/// overwrites any previous value for the key.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
