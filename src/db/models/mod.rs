pub mod instrument;
pub mod kit;
pub mod scan_result;
pub mod settings;

pub use instrument::{BoundingBox, Instrument, InstrumentDefinition, InstrumentStatus};
pub use kit::Kit;
pub use scan_result::{ScanResult, Verdict};
pub use settings::{Language, Settings};
