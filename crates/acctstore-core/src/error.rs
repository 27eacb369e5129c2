#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key `{0}`: only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
