use thiserror::Error;

#[derive(Debug, Error)]
pub enum VouchError {
    #[error("failed to read {key}: {message}")]
    StorageRead { key: String, message: String },
    #[error("failed to write {key}: {message}")]
    StorageWrite { key: String, message: String },
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VouchError {
    pub fn read(key: &str, message: impl ToString) -> Self {
        VouchError::StorageRead {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn write(key: &str, message: impl ToString) -> Self {
        VouchError::StorageWrite {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}
