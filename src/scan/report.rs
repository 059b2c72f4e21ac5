use std::fmt;

use crate::{
    db::models::ScanResult,
    reconciliation::{tally, ConformityLevel},
};

/// Plain-text export of a scan, suitable for sharing.
pub fn render_report(result: &ScanResult) -> String {
    ScanReport(result).to_string()
}

struct ScanReport<'a>(&'a ScanResult);

impl fmt::Display for ScanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let counts = tally(&result.detected_instruments);
        let level = match ConformityLevel::from_score(result.conformity_score) {
            ConformityLevel::High => "high",
            ConformityLevel::Medium => "medium",
            ConformityLevel::Low => "low",
        };

        writeln!(f, "SteriScan report - {}", result.timestamp.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f)?;
        writeln!(f, "Kit ID: {}", result.kit_id)?;
        writeln!(f, "Conformity score: {}% ({level})", result.conformity_score)?;
        writeln!(f, "Status: {}", result.status.as_str())?;
        writeln!(
            f,
            "Present: {}, missing: {}, extra: {}",
            counts.present, counts.missing, counts.extra
        )?;
        writeln!(f)?;
        writeln!(f, "Instruments:")?;
        for instrument in &result.detected_instruments {
            let status = instrument.status.map_or("unknown", |status| status.as_str());
            writeln!(
                f,
                "- {}: {} ({}%)",
                instrument.name,
                status,
                (instrument.confidence * 100.0).round()
            )?;
        }
        Ok(())
    }
}
