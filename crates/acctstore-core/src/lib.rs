pub mod accounts;
pub mod error;
pub mod storage;

#[cfg(test)]
mod test_util;

pub use accounts::{AccountField, AccountKind, AccountStore, DerivedRecord, StoredRecord};
pub use error::StorageError;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
