use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while locating or reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{name}' not found")]
    NotFound { name: String },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {path:?}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("{path:?} line {line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("no 'url' property in {path:?}")]
    MissingUrl { path: PathBuf },
}
