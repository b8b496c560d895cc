//! Error types for point-octree

use std::collections::TryReserveError;

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected input: negative radius, zero leaf size, non-finite points.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
