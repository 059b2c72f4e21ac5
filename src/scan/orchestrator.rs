use std::time::Instant;

use chrono::Utc;
use tokio::time;
use uuid::Uuid;

use super::detector::Detector;
use crate::{
    config::ScanConfig,
    db::{
        models::{Instrument, ScanResult},
        RecordStore,
    },
    error::{Error, Result},
    log_error, log_info, log_warn,
    reconciliation::{reconcile, score, tally, verdict},
};

const ENABLE_LOGS: bool = true;

/// Sequences one scan: detect, reconcile, score, persist.
#[derive(Clone)]
pub struct ScanOrchestrator {
    store: RecordStore,
    config: ScanConfig,
}

impl ScanOrchestrator {
    pub fn new(store: RecordStore, config: ScanConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run a full scan of `image_ref` against `reference`.
    ///
    /// With `autoSave` enabled the result is returned only once it is durably
    /// stored; otherwise it is returned unsaved and persisting it is left to
    /// the caller. Nothing is retried.
    pub async fn perform_scan<D: Detector>(
        &self,
        kit_id: &str,
        image_ref: &str,
        detector: &D,
        reference: &[Instrument],
    ) -> Result<ScanResult> {
        let settings = self.store.get_settings().await?;

        if !detector.is_ready() {
            log_warn!("scan of kit {} aborted: detector not ready", kit_id);
            return Err(Error::DetectionUnavailable("detector model is not loaded".into()));
        }

        log_info!(
            "scanning kit {} from {} (model {})",
            kit_id,
            image_ref,
            self.config.model_version
        );
        let started = Instant::now();
        let detection = match time::timeout(self.config.max_detection_time, detector.detect(image_ref)).await {
            Ok(result) => result?,
            Err(_) => {
                log_warn!(
                    "detection for kit {} exceeded {:?}",
                    kit_id,
                    self.config.max_detection_time
                );
                return Err(Error::DetectionTimeout(self.config.max_detection_time));
            }
        };
        log_info!(
            "detected {} instruments in {} ms (mean confidence {:.2})",
            detection.instruments.len(),
            started.elapsed().as_millis(),
            detection.confidence
        );

        let detected: Vec<Instrument> = detection
            .instruments
            .into_iter()
            .filter(|instrument| instrument.confidence >= self.config.min_confidence)
            .collect();

        let reconciled = reconcile(reference, &detected);
        let conformity_score = score(&reconciled, reference.len());
        let status = verdict(&reconciled, reference.len());
        let counts = tally(&reconciled);

        let result = ScanResult {
            id: format!("scan-{}", Uuid::new_v4()),
            kit_id: kit_id.to_string(),
            image_uri: image_ref.to_string(),
            detected_instruments: reconciled,
            conformity_score,
            timestamp: Utc::now(),
            status,
        };

        log_info!(
            "scan {}: {} present, {} missing, {} extra, score {}%, {}",
            result.id,
            counts.present,
            counts.missing,
            counts.extra,
            result.conformity_score,
            result.status.as_str()
        );

        if settings.auto_save {
            match self.store.save_scan_result(&result).await {
                Ok(()) => {}
                Err(Error::StorageNotInitialized) => return Err(Error::StorageNotInitialized),
                Err(Error::Storage(cause)) => {
                    log_error!("failed to persist scan {}: {cause:#}", result.id);
                    return Err(Error::ScanPersistenceFailed {
                        scan_id: result.id,
                        cause,
                    });
                }
                Err(other) => {
                    log_error!("failed to persist scan {}: {other}", result.id);
                    return Err(Error::ScanPersistenceFailed {
                        scan_id: result.id,
                        cause: anyhow::Error::new(other),
                    });
                }
            }
        }

        Ok(result)
    }
}
