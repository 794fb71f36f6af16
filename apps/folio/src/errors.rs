#![allow(dead_code)]

use thiserror::Error;

/// Application-level error type.
///
/// Network and content failures are normally absorbed by the loader's
/// fallback chain; storage failures are absorbed at the coordinator
/// boundary (operation continues with in-memory state); export failures are
/// surfaced to whoever initiated the export.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Content failure: {0}")]
    Content(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Export failure: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
