use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    db::models::Instrument,
    error::{Error, Result},
};

/// Output of one detector pass over a captured image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub instruments: Vec<Instrument>,
    /// Mean confidence over `instruments`, 0 when nothing was detected.
    pub confidence: f64,
}

impl Detection {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let confidence = if instruments.is_empty() {
            0.0
        } else {
            instruments.iter().map(|i| i.confidence).sum::<f64>() / instruments.len() as f64
        };
        Self {
            instruments,
            confidence,
        }
    }
}

/// Capability that turns an image reference into identified instruments.
///
/// Readiness is part of the handle rather than hidden global state: the
/// orchestrator refuses to call a detector that reports it is not ready.
pub trait Detector {
    fn is_ready(&self) -> bool;

    /// May fail with `DetectionUnavailable`; the caller bounds it in time.
    fn detect(&self, image_ref: &str) -> impl Future<Output = Result<Detection>> + Send;
}

/// Detector that replays a fixed list of instruments.
#[derive(Debug, Clone)]
pub struct FixedDetector {
    instruments: Vec<Instrument>,
    ready: bool,
    latency: Option<Duration>,
}

impl FixedDetector {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self {
            instruments,
            ready: true,
            latency: None,
        }
    }

    /// A detector whose model never loaded.
    pub fn unloaded() -> Self {
        Self {
            ready: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

impl Detector for FixedDetector {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn detect(&self, _image_ref: &str) -> Result<Detection> {
        if !self.ready {
            return Err(Error::DetectionUnavailable("model not loaded".into()));
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(Detection::new(self.instruments.clone()))
    }
}
