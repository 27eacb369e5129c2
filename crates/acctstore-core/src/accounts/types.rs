//! Account record types: the persisted form, the derived view form, and
//! store error definitions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

// ==============================================================================
// Account Kind
// ==============================================================================

/// Directory an account authenticates against.
///
/// Unknown literals are carried verbatim in `Unrecognized` rather than
/// rejected, so whatever a caller writes is persisted unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountKind {
    #[default]
    Local,
    Ldap,
    Other,
    Unrecognized(String),
}

impl AccountKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "Local",
            Self::Ldap => "LDAP",
            Self::Other => "Other",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for AccountKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Local" => Self::Local,
            "LDAP" => Self::Ldap,
            "Other" => Self::Other,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<&str> for AccountKind {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<AccountKind> for String {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Records
// ==============================================================================

/// An account as persisted. `labels_raw` holds every label in one
/// `;`-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: String,
    pub labels_raw: String,
    pub kind: AccountKind,
    pub login: String,
    pub password: String,
}

impl StoredRecord {
    /// A blank record of kind `Local`.
    pub fn empty(id: String) -> Self {
        Self {
            id,
            labels_raw: String::new(),
            kind: AccountKind::Local,
            login: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

/// The view form of an account, with labels split out. Always computed
/// from a [`StoredRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub id: String,
    pub labels: Vec<Label>,
    pub kind: AccountKind,
    pub login: String,
    pub password: String,
}

// ==============================================================================
// Editable Fields
// ==============================================================================

/// The fields `update_field` may replace. `id` is never editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    LabelsRaw,
    Kind,
    Login,
    Password,
}

impl AccountField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LabelsRaw => "labelsRaw",
            Self::Kind => "kind",
            Self::Login => "login",
            Self::Password => "password",
        }
    }
}

impl FromStr for AccountField {
    type Err = StoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "labelsRaw" | "labelsStr" => Ok(Self::LabelsRaw),
            "kind" | "type" => Ok(Self::Kind),
            "login" => Ok(Self::Login),
            "password" => Ok(Self::Password),
            _ => Err(StoreError::UnknownField(name.to_string())),
        }
    }
}

impl std::fmt::Display for AccountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Errors
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown account field: {0}")]
    UnknownField(String),

    #[error("failed to encode account snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
