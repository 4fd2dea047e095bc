//! Error types for storage and configuration
//!
//! The simulation itself is total; only I/O and untrusted input at the edges
//! can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid maze: {0}")]
    InvalidMaze(String),
}

pub type Result<T> = std::result::Result<T, Error>;
