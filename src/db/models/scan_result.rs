//! Scan result data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Instrument;

/// Minimum present ratio, in tenths, for a `Conforming` verdict.
pub const CONFORMING_RATIO_TENTHS: usize = 9;
/// Minimum present ratio, in tenths, for a `Partial` verdict.
pub const PARTIAL_RATIO_TENTHS: usize = 7;

/// Tri-state conformity verdict, derived once when the scan is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Conforming,
    Partial,
    NonConforming,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Conforming => "conforming",
            Verdict::Partial => "partial",
            Verdict::NonConforming => "non-conforming",
        }
    }

    /// Classify a raw present ratio against the verdict boundaries.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= CONFORMING_RATIO_TENTHS as f64 / 10.0 {
            Verdict::Conforming
        } else if ratio >= PARTIAL_RATIO_TENTHS as f64 / 10.0 {
            Verdict::Partial
        } else {
            Verdict::NonConforming
        }
    }
}

/// Outcome of one detection pass, annotated by reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub id: String,
    pub kit_id: String,
    pub image_uri: String,
    pub detected_instruments: Vec<Instrument>,
    /// Integer percentage in [0, 100].
    pub conformity_score: u8,
    pub timestamp: DateTime<Utc>,
    pub status: Verdict,
}

impl ScanResult {
    /// Id of the first instrument that was never annotated by reconciliation.
    pub fn unannotated_instrument(&self) -> Option<&str> {
        self.detected_instruments
            .iter()
            .find(|instrument| instrument.status.is_none())
            .map(|instrument| instrument.id.as_str())
    }
}
