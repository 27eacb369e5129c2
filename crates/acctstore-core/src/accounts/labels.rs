//! Conversion between the `;`-separated label string persisted on a record
//! and the structured label list shown in the view.

use super::types::{DerivedRecord, Label, StoredRecord};

pub const LABEL_DELIMITER: char = ';';

/// Split a raw label string into labels. Segments are trimmed and empty
/// segments dropped; order is preserved.
pub fn parse_labels(raw: &str) -> Vec<Label> {
    raw.split(LABEL_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| Label {
            text: segment.to_string(),
        })
        .collect()
}

/// Join labels back into the raw form, `"; "`-separated. Blank labels are
/// skipped. A label whose text contains `;` comes back as several labels
/// from [`parse_labels`].
pub fn join_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| label.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<&StoredRecord> for DerivedRecord {
    fn from(record: &StoredRecord) -> Self {
        Self {
            id: record.id.clone(),
            labels: parse_labels(&record.labels_raw),
            kind: record.kind.clone(),
            login: record.login.clone(),
            password: record.password.clone(),
        }
    }
}

impl From<&DerivedRecord> for StoredRecord {
    fn from(record: &DerivedRecord) -> Self {
        Self {
            id: record.id.clone(),
            labels_raw: join_labels(&record.labels),
            kind: record.kind.clone(),
            login: record.login.clone(),
            password: record.password.clone(),
        }
    }
}
