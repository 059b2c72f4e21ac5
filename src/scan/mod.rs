pub mod detector;
pub mod orchestrator;
pub mod report;

pub use detector::{Detection, Detector, FixedDetector};
pub use orchestrator::ScanOrchestrator;
pub use report::render_report;
