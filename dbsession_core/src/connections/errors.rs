use thiserror::Error;

/// A central error enum for connection-related errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("session manager is not initialized")]
    NotInitialized,

    #[error("no suitable driver found for '{url}'")]
    NoSuitableDriver { url: String },

    #[error("connection is closed")]
    Closed,

    #[error("connection refused: {0}")]
    Refused(String),
}
