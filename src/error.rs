use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridlinkError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Job has no backend binding")]
    NoBackend,
}

pub type Result<T> = std::result::Result<T, GridlinkError>;
