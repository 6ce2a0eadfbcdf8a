use std::path::PathBuf;

/// Rejected user input. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Amount is not a number: '{0}'")]
    InvalidAmount(String),
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Amount has more than {max} decimal places: '{value}'")]
    TooManyDecimals { value: String, max: u32 },
    #[error("Amount is too large: '{0}'")]
    AmountTooLarge(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReadFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed data file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum WriteFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("could not encode data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to read {}: {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: ReadFailure,
    },
    #[error("Failed to save {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: WriteFailure,
    },
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
