use std::path::PathBuf;

use thiserror::Error;

/// Rejected queue operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("invalid service duration {duration} for customer {name:?}: must be finite and non-negative")]
    InvalidArgument { name: String, duration: f64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
