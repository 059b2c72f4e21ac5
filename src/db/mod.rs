pub mod connection;
pub mod helpers;
mod migrations;
pub mod models;
pub mod repositories;
mod seed;

pub use connection::{RecordStore, StoreLocation};
pub use models::{
    BoundingBox, Instrument, InstrumentDefinition, InstrumentStatus, Kit, Language, ScanResult,
    Settings, Verdict,
};
pub use seed::MASTER_INSTRUMENTS;
