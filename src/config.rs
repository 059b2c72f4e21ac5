use std::time::Duration;

/// File name of the SQLite database inside the application data directory.
pub const DATABASE_NAME: &str = "steriscan.db";

/// Tunables for one scan pass.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Upper bound on a single detector call before the scan fails with a timeout
    pub max_detection_time: Duration,

    /// Detections reported below this confidence are discarded before reconciliation
    pub min_confidence: f64,

    pub model_version: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_detection_time: Duration::from_millis(5_000),
            min_confidence: 0.7,
            model_version: "1.0".into(),
        }
    }
}
