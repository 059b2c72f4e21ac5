use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the record store, the detector boundary and the scan
/// orchestrator. All of them are terminal for the operation that raised them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("record store has not been initialized")]
    StorageNotInitialized,

    #[error("failed to initialize record store: {0:#}")]
    StorageInit(anyhow::Error),

    #[error("storage operation failed: {0:#}")]
    Storage(anyhow::Error),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("detector unavailable: {0}")]
    DetectionUnavailable(String),

    #[error("detection did not complete within {0:?}")]
    DetectionTimeout(Duration),

    #[error("scan {scan_id} could not be persisted: {cause:#}")]
    ScanPersistenceFailed {
        scan_id: String,
        cause: anyhow::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
