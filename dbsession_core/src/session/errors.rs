use thiserror::Error;

use crate::config::ConfigError;
use crate::connections::ConnectionError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Wrong number of arguments to `initialize`. Never wrapped.
    #[error("invalid parameters: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("driver '{name}' not found in the process or thread context registry")]
    DriverNotFound { name: String },

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Any failure inside `initialize`, after best-effort teardown.
    #[error("session manager initialization failed")]
    Initialization(#[source] Box<SessionError>),
}

impl SessionError {
    /// The wrapped failure for `Initialization`, otherwise `self`.
    pub fn root_cause(&self) -> &SessionError {
        match self {
            SessionError::Initialization(inner) => inner.root_cause(),
            other => other,
        }
    }
}
