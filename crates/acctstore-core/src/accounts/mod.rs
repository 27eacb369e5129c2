//! Account records for the form editor.
//!
//! Records are persisted with their labels packed into one `;`-separated
//! string and read back through a derived view where the labels are a
//! list. [`AccountStore`] owns the collection and keeps the persisted
//! snapshot in step with it.

mod labels;
mod snapshot;
mod store;
mod types;

pub use labels::{join_labels, parse_labels, LABEL_DELIMITER};
pub use store::{AccountStore, STORAGE_KEY};
pub use types::{AccountField, AccountKind, DerivedRecord, Label, StoreError, StoredRecord};
