use anyhow::{anyhow, Context};
use rusqlite::{params, OptionalExtension, Row};

use crate::{
    db::{
        connection::RecordStore,
        helpers::{
            conversion_error, decode_instruments, encode_instruments, ensure_finite_instruments,
            format_datetime, parse_datetime, parse_verdict, to_score,
        },
        models::ScanResult,
    },
    error::{Error, Result},
};

const SCAN_COLUMNS: &str =
    "id, kit_id, image_uri, detected_instruments, conformity_score, timestamp, status";

fn row_to_scan_result(row: &Row) -> Result<ScanResult, rusqlite::Error> {
    let instruments: String = row.get("detected_instruments")?;
    let timestamp: String = row.get("timestamp")?;
    let status: String = row.get("status")?;

    let result = ScanResult {
        id: row.get("id")?,
        kit_id: row.get("kit_id")?,
        image_uri: row.get("image_uri")?,
        detected_instruments: decode_instruments(&instruments, "detected_instruments")
            .map_err(|e| conversion_error(3, e))?,
        conformity_score: to_score(row.get("conformity_score")?)
            .map_err(|e| conversion_error(4, e))?,
        timestamp: parse_datetime(&timestamp, "timestamp").map_err(|e| conversion_error(5, e))?,
        status: parse_verdict(&status).map_err(|e| conversion_error(6, e))?,
    };

    if let Some(instrument_id) = result.unannotated_instrument() {
        return Err(conversion_error(
            3,
            anyhow!("instrument {instrument_id} in scan {} has no status", result.id),
        ));
    }

    Ok(result)
}

fn validate_scan_result(result: &ScanResult) -> Result<()> {
    if let Some(instrument_id) = result.unannotated_instrument() {
        return Err(Error::InvalidRecord(format!(
            "instrument {instrument_id} in scan {} has not been reconciled",
            result.id
        )));
    }
    ensure_finite_instruments(&result.detected_instruments, &format!("scan {}", result.id))?;
    if result.conformity_score > 100 {
        return Err(Error::InvalidRecord(format!(
            "conformity score {} of scan {} exceeds 100",
            result.conformity_score, result.id
        )));
    }
    Ok(())
}

impl RecordStore {
    /// Insert a scan result, replacing any existing row with the same id.
    pub async fn save_scan_result(&self, result: &ScanResult) -> Result<()> {
        validate_scan_result(result)?;

        let record = result.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO scan_results (id, kit_id, image_uri, detected_instruments, conformity_score, timestamp, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.kit_id,
                    record.image_uri,
                    encode_instruments(&record.detected_instruments)?,
                    record.conformity_score,
                    format_datetime(&record.timestamp),
                    record.status.as_str(),
                ],
            )
            .with_context(|| format!("failed to save scan result {}", record.id))?;
            Ok(())
        })
        .await
    }

    pub async fn get_scan_result(&self, id: &str) -> Result<Option<ScanResult>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SCAN_COLUMNS} FROM scan_results WHERE id = ?1"
            ))?;
            let result = stmt
                .query_row(params![id], row_to_scan_result)
                .optional()
                .with_context(|| format!("failed to load scan result {id}"))?;
            Ok(result)
        })
        .await
    }

    /// All scan results, newest first.
    pub async fn list_scan_results(&self) -> Result<Vec<ScanResult>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SCAN_COLUMNS} FROM scan_results ORDER BY timestamp DESC, id ASC"
            ))?;

            let results = stmt
                .query_map([], row_to_scan_result)?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to list scan results")?;

            Ok(results)
        })
        .await
    }

    /// Scan history of a single kit, newest first.
    pub async fn list_scan_results_for_kit(&self, kit_id: &str) -> Result<Vec<ScanResult>> {
        let kit_id = kit_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SCAN_COLUMNS} FROM scan_results
                 WHERE kit_id = ?1
                 ORDER BY timestamp DESC, id ASC"
            ))?;

            let results = stmt
                .query_map(params![kit_id], row_to_scan_result)?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("failed to list scan results for kit {kit_id}"))?;

            Ok(results)
        })
        .await
    }
}
