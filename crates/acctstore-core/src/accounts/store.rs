//! `AccountStore` — the in-memory account collection and its persistence
//! bridge.
//!
//! The store owns the ordered list of [`StoredRecord`]s and the storage
//! medium they are persisted into. It loads the snapshot once when opened
//! and writes a full snapshot after every mutation, before the mutating
//! call returns. Readers get the derived view, with labels split out, or
//! the raw records for binding form inputs directly.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::storage::KeyValueStorage;

use super::snapshot::{decode_records, encode_records, encode_records_pretty};
use super::types::{AccountField, DerivedRecord, StoreError, StoredRecord};

/// Fixed key the snapshot lives under.
pub const STORAGE_KEY: &str = "accounts_store";

const ID_SUFFIX_LEN: usize = 5;

pub struct AccountStore {
    storage: Box<dyn KeyValueStorage>,
    records: Vec<StoredRecord>,
    synced: bool,
}

impl AccountStore {
    /// Open a store over `storage`, loading whatever snapshot it holds.
    ///
    /// Never fails: a missing, unreadable or malformed snapshot leaves the
    /// store empty.
    pub fn open(storage: impl KeyValueStorage + 'static) -> Self {
        let storage: Box<dyn KeyValueStorage> = Box::new(storage);
        let records = load_records(&*storage);
        Self {
            storage,
            records,
            synced: true,
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// The raw records, in collection order.
    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&StoredRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The derived view of every record, in collection order. The result is
    /// a snapshot; later mutations do not affect it.
    pub fn accounts(&self) -> Vec<DerivedRecord> {
        self.records.iter().map(DerivedRecord::from).collect()
    }

    pub fn account(&self, id: &str) -> Option<DerivedRecord> {
        self.record(id).map(DerivedRecord::from)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a blank `Local` record with a fresh id and persist.
    pub fn add_account(&mut self) -> StoredRecord {
        let record = StoredRecord::empty(self.generate_id());
        self.records.push(record.clone());
        tracing::debug!(id = %record.id, "added account");
        self.persist();
        record
    }

    /// Replace one field of the record with `id` and persist.
    ///
    /// Returns `false` without writing anything when no record has `id`.
    /// `kind` values are not validated; unknown literals are stored as-is.
    pub fn update_field(
        &mut self,
        id: &str,
        field: AccountField,
        value: impl Into<String>,
    ) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(id, %field, "update for unknown account ignored");
            return false;
        };

        let value: String = value.into();
        match field {
            AccountField::LabelsRaw => record.labels_raw = value,
            AccountField::Kind => record.kind = value.into(),
            AccountField::Login => record.login = value,
            AccountField::Password => record.password = value,
        }

        self.persist();
        true
    }

    /// Remove the record with `id`, keeping the order of the rest, and
    /// persist. Returns `false` without writing when no record has `id`.
    pub fn remove_account(&mut self, id: &str) -> bool {
        let Some(idx) = self.records.iter().position(|r| r.id == id) else {
            tracing::debug!(id, "removal of unknown account ignored");
            return false;
        };

        self.records.remove(idx);
        tracing::debug!(id, "removed account");
        self.persist();
        true
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Whether the last snapshot write succeeded.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Write the current snapshot if the last automatic write failed.
    ///
    /// Mutations never report storage failures themselves; a caller that
    /// needs durability calls this afterwards to get the error.
    pub fn sync(&mut self) -> Result<(), StoreError> {
        if self.synced {
            return Ok(());
        }
        self.write_snapshot()?;
        self.synced = true;
        Ok(())
    }

    /// The current collection as pretty-printed snapshot JSON.
    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(encode_records_pretty(&self.records)?)
    }

    fn persist(&mut self) {
        match self.write_snapshot() {
            Ok(()) => {
                self.synced = true;
                tracing::debug!(records = self.records.len(), "persisted account snapshot");
            }
            Err(err) => {
                self.synced = false;
                tracing::error!(
                    error = %err,
                    key = STORAGE_KEY,
                    "failed to persist account snapshot"
                );
            }
        }
    }

    fn write_snapshot(&mut self) -> Result<(), StoreError> {
        let content = encode_records(&self.records)?;
        self.storage.set(STORAGE_KEY, &content)?;
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// `<unix millis>_<5 base-36 chars>`, regenerated until unused.
    fn generate_id(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| std::char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
                .collect();
            let id = format!("{millis}_{suffix}");
            if self.record(&id).is_none() {
                return id;
            }
        }
    }
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("records", &self.records.len())
            .field("synced", &self.synced)
            .finish_non_exhaustive()
    }
}

fn load_records(storage: &dyn KeyValueStorage) -> Vec<StoredRecord> {
    let content = match storage.get(STORAGE_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => {
            tracing::debug!(key = STORAGE_KEY, "no persisted accounts, starting empty");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(
                key = STORAGE_KEY,
                error = %err,
                "could not read persisted accounts, starting empty"
            );
            return Vec::new();
        }
    };

    // An empty value counts as never written.
    if content.trim().is_empty() {
        return Vec::new();
    }

    match decode_records(&content) {
        Ok(records) => {
            tracing::debug!(records = records.len(), "loaded persisted accounts");
            records
        }
        Err(err) => {
            tracing::warn!(
                key = STORAGE_KEY,
                error = %err,
                "persisted accounts are malformed, starting empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountKind;
    use crate::storage::MemoryStorage;
    use crate::test_util::{open_with, record, FailingStorage};

    fn label_texts(store: &AccountStore, id: &str) -> Vec<String> {
        store
            .account(id)
            .expect("account should exist")
            .labels
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    fn persisted(storage: &MemoryStorage) -> Vec<StoredRecord> {
        let content = storage.entry(STORAGE_KEY).expect("snapshot should be written");
        serde_json::from_str(&content).expect("snapshot should be valid JSON")
    }

    // -- initialization -------------------------------------------------------

    #[test]
    fn opens_empty_without_persisted_state() {
        let storage = MemoryStorage::new();
        let store = AccountStore::open(storage.clone());
        assert!(store.is_empty());
        assert_eq!(storage.entry(STORAGE_KEY), None, "opening must not write");
    }

    #[test]
    fn opens_with_persisted_records_in_order() {
        let (store, _) = open_with(&[record("a", "x"), record("b", "y"), record("c", "")]);
        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn malformed_snapshot_falls_back_to_empty() {
        for content in ["not json at all", "{", r#"{"id":"1"}"#, "[1, 2]", "null"] {
            let store = AccountStore::open(MemoryStorage::with_entry(STORAGE_KEY, content));
            assert!(store.is_empty(), "content {content:?} should load as empty");
        }
    }

    #[test]
    fn record_with_extra_alternate_field_names_does_not_drop_collection() {
        let content = r#"[
            {"id":"1","labelsRaw":"a","labelsStr":"b","kind":"Local","login":"x","password":""},
            {"id":"2","labelsRaw":"c","kind":"Other","login":"y","password":""}
        ]"#;
        let store = AccountStore::open(MemoryStorage::with_entry(STORAGE_KEY, content));

        assert_eq!(store.len(), 2);
        assert_eq!(store.record("1").map(|r| r.labels_raw.as_str()), Some("a"));
        assert_eq!(store.record("2").map(|r| r.kind.clone()), Some(AccountKind::Other));
    }

    #[test]
    fn blank_snapshot_loads_as_empty() {
        let store = AccountStore::open(MemoryStorage::with_entry(STORAGE_KEY, ""));
        assert!(store.is_empty());
    }

    #[test]
    fn unreadable_storage_falls_back_to_empty() {
        let store = AccountStore::open(FailingStorage);
        assert!(store.is_empty());
    }

    // -- derived view ---------------------------------------------------------

    #[test]
    fn derived_view_matches_collection_length_and_order() {
        let (store, _) = open_with(&[record("1", "a;b"), record("2", ""), record("3", " c ")]);
        let view = store.accounts();
        assert_eq!(view.len(), store.len());
        for (derived, stored) in view.iter().zip(store.records()) {
            assert_eq!(derived.id, stored.id);
        }
        assert_eq!(label_texts(&store, "3"), ["c"]);
    }

    #[test]
    fn derived_view_is_stable_without_mutation() {
        let (store, _) = open_with(&[record("1", "x; y"), record("2", ";;z")]);
        assert_eq!(store.accounts(), store.accounts());
    }

    #[test]
    fn derived_view_is_a_snapshot() {
        let (mut store, _) = open_with(&[record("1", "old")]);
        let before = store.accounts();
        store.update_field("1", AccountField::LabelsRaw, "new");
        assert_eq!(before[0].labels[0].text, "old");
        assert_eq!(label_texts(&store, "1"), ["new"]);
    }

    // -- add ------------------------------------------------------------------

    #[test]
    fn add_appends_blank_local_record_and_persists() {
        let (mut store, storage) = open_with(&[record("existing", "x")]);

        let added = store.add_account();

        assert_eq!(store.len(), 2);
        assert_ne!(added.id, "existing");
        assert_eq!(added.labels_raw, "");
        assert_eq!(added.login, "");
        assert_eq!(added.password, "");
        assert_eq!(added.kind, AccountKind::Local);
        assert_eq!(store.records().last(), Some(&added));
        assert_eq!(persisted(&storage), store.records());
    }

    #[test]
    fn add_generates_distinct_ids_within_same_instant() {
        let mut store = AccountStore::open(MemoryStorage::new());
        let ids: std::collections::HashSet<_> = (0..200).map(|_| store.add_account().id).collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(store.len(), 200);
    }

    #[test]
    fn generated_id_is_millis_and_base36_suffix() {
        let mut store = AccountStore::open(MemoryStorage::new());
        let id = store.add_account().id;
        let (millis, suffix) = id.split_once('_').expect("id should contain '_'");
        assert!(millis.parse::<u128>().is_ok());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    // -- update ---------------------------------------------------------------

    #[test]
    fn update_replaces_only_the_named_field() {
        let (mut store, storage) = open_with(&[record("1", "a"), record("2", "b")]);
        let before = store.record("2").cloned().expect("record 2");

        assert!(store.update_field("2", AccountField::Login, "alice"));

        let after = store.record("2").expect("record 2");
        assert_eq!(after.login, "alice");
        assert_eq!(after.labels_raw, before.labels_raw);
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.password, before.password);
        assert_eq!(store.records()[1].id, "2", "position must not change");
        assert_eq!(persisted(&storage), store.records());
    }

    #[test]
    fn update_kind_accepts_unrecognized_literal() {
        let (mut store, storage) = open_with(&[record("1", "")]);

        assert!(store.update_field("1", AccountField::Kind, "Kerberos"));

        assert_eq!(
            store.record("1").map(|r| r.kind.clone()),
            Some(AccountKind::Unrecognized("Kerberos".into()))
        );
        let raw = storage.entry(STORAGE_KEY).expect("snapshot written");
        assert!(raw.contains(r#""kind":"Kerberos""#));
    }

    #[test]
    fn update_kind_keeps_localized_literal_verbatim() {
        let storage = MemoryStorage::new();
        let mut store = AccountStore::open(storage.clone());
        let id = store.add_account().id;

        assert!(store.update_field(&id, AccountField::Kind, "Локальная"));

        let raw = storage.entry(STORAGE_KEY).expect("snapshot written");
        assert!(raw.contains(r#""kind":"Локальная""#));
        let reopened = AccountStore::open(storage);
        assert_eq!(
            reopened.record(&id).map(|r| r.kind.as_str()),
            Some("Локальная")
        );
    }

    #[test]
    fn update_unknown_id_is_a_silent_no_op() {
        let (mut store, storage) = open_with(&[record("1", "a")]);
        let before = store.records().to_vec();
        let snapshot_before = storage.entry(STORAGE_KEY);

        assert!(!store.update_field("missing", AccountField::Password, "pw"));

        assert_eq!(store.records(), before.as_slice());
        assert_eq!(storage.entry(STORAGE_KEY), snapshot_before);
    }

    #[test]
    fn update_with_identical_value_still_persists() {
        let (mut store, mut storage) = open_with(&[record("1", "a")]);
        storage.set(STORAGE_KEY, "stale").expect("seed stale value");

        assert!(store.update_field("1", AccountField::LabelsRaw, "a"));

        assert_eq!(persisted(&storage), store.records());
    }

    #[test]
    fn labels_scenario_from_empty_store() {
        let mut store = AccountStore::open(MemoryStorage::new());
        let id = store.add_account().id;
        let field = "labelsStr".parse().expect("alternate field name");

        store.update_field(&id, field, "work; home ;;  vpn ");

        assert_eq!(label_texts(&store, &id), ["work", "home", "vpn"]);
    }

    // -- remove ---------------------------------------------------------------

    #[test]
    fn remove_drops_record_and_keeps_order() {
        let (mut store, storage) = open_with(&[record("1", ""), record("2", ""), record("3", "")]);

        assert!(store.remove_account("2"));

        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(persisted(&storage), store.records());

        assert!(!store.remove_account("2"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_unknown_id_does_not_write() {
        let (mut store, storage) = open_with(&[record("1", "")]);
        let snapshot_before = storage.entry(STORAGE_KEY);

        assert!(!store.remove_account("nope"));

        assert_eq!(store.len(), 1);
        assert_eq!(storage.entry(STORAGE_KEY), snapshot_before);
    }

    // -- persistence ----------------------------------------------------------

    #[test]
    fn reopening_restores_collection() {
        let storage = MemoryStorage::new();
        let mut store = AccountStore::open(storage.clone());
        let first = store.add_account().id;
        let second = store.add_account().id;
        store.update_field(&first, AccountField::Kind, "LDAP");
        store.update_field(&second, AccountField::LabelsRaw, "x;y");
        store.update_field(&second, AccountField::Password, "hunter2");

        let reopened = AccountStore::open(storage);
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn failed_write_is_reported_by_sync() {
        let mut store = AccountStore::open(FailingStorage);
        store.add_account();

        assert!(!store.is_synced());
        assert!(matches!(store.sync(), Err(StoreError::Storage(_))));
        assert_eq!(store.len(), 1, "in-memory state survives a failed write");
    }

    #[test]
    fn sync_is_a_no_op_after_successful_writes() {
        let (mut store, _) = open_with(&[]);
        store.add_account();
        assert!(store.is_synced());
        store.sync().expect("nothing to retry");
    }

    #[test]
    fn export_matches_persisted_schema() {
        let (store, _) = open_with(&[record("1", "a;b")]);
        let exported = store.export_json().expect("export");
        let parsed: Vec<StoredRecord> = serde_json::from_str(&exported).expect("valid JSON");
        assert_eq!(parsed, store.records());
        assert!(exported.contains("\"labelsRaw\""));
    }
}
