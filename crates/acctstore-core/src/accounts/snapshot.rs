//! JSON encoding of the persisted account snapshot: an array of
//! [`StoredRecord`] objects, with no version tag.

use std::collections::HashSet;

use super::types::StoredRecord;

/// Decode a snapshot. Duplicate ids are kept but logged as warnings.
pub(super) fn decode_records(content: &str) -> Result<Vec<StoredRecord>, serde_json::Error> {
    let records: Vec<StoredRecord> = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        if !seen.insert(record.id.as_str()) {
            tracing::warn!(
                index,
                id = %record.id,
                "persisted snapshot contains a duplicate account id"
            );
        }
    }
    Ok(records)
}

pub(super) fn encode_records(records: &[StoredRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

pub(super) fn encode_records_pretty(records: &[StoredRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}
