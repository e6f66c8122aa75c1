use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage read failed: {message}")]
    StorageRead { message: String },

    #[error("storage write failed: {message}")]
    StorageWrite { message: String },

    #[error("import rejected: {message}")]
    ImportParse { message: String },

    #[error("no week found with label {label:?}")]
    WeekNotFound { label: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn storage_read(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "engine::storage", %message, "storage read failed");
        AppError::StorageRead { message }
    }

    pub fn storage_write(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "engine::storage", %message, "storage write failed");
        AppError::StorageWrite { message }
    }

    pub fn import_parse(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "engine::import", %message, "import payload rejected");
        AppError::ImportParse { message }
    }

    pub fn week_not_found(label: impl Into<String>) -> Self {
        let label = label.into();
        warn!(target: "engine::export", %label, "requested week not in history");
        AppError::WeekNotFound { label }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "engine::other", %message, "unexpected error");
        AppError::Other(message)
    }
}
