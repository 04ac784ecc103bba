use thiserror::Error;

/// User-correctable list operation failure. Surfaced as a plain notice,
/// never a crash; the list is left untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    #[error("position {index} is out of range (list has {len} items)")]
    InvalidPosition { index: usize, len: usize },
}

/// Failure to commit the state record to disk. Corrupt *reads* are not
/// errors: the store recovers to an empty record on load.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write state file: {0}")]
    Write(#[from] std::io::Error),
}
