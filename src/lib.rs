//! Surgical kit conformity tracking.
//!
//! The crate records reference kit compositions, reconciles detector output
//! against them, scores the outcome and keeps the results in a local SQLite
//! record store. Capture, rendering and navigation live in the host shell,
//! which drives everything through [`RecordStore`] and [`ScanOrchestrator`].

pub mod config;
pub mod db;
pub mod error;
pub mod reconciliation;
pub mod scan;
mod utils;

pub use config::{ScanConfig, DATABASE_NAME};
pub use db::{
    BoundingBox, Instrument, InstrumentDefinition, InstrumentStatus, Kit, Language, RecordStore,
    ScanResult, Settings, StoreLocation, Verdict,
};
pub use error::{Error, Result};
pub use reconciliation::{reconcile, score, verdict, ConformityLevel, InstrumentTally};
pub use scan::{render_report, Detection, Detector, FixedDetector, ScanOrchestrator};
pub use utils::logging::init_logging;
