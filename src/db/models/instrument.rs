//! Instrument data models.
//!
//! An `Instrument` is used both as an expected entry of a reference kit and as
//! a detected (then reconciled) entry of a scan result.

use serde::{Deserialize, Serialize};

/// Reconciliation outcome for a single instrument.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentStatus {
    Present,
    Missing,
    Extra,
}

impl InstrumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentStatus::Present => "present",
            InstrumentStatus::Missing => "missing",
            InstrumentStatus::Extra => "extra",
        }
    }
}

/// Bounding box in image coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Classification label used as the primary matching key.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `None` until the reconciliation engine annotates the instrument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstrumentStatus>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BoundingBox>,
}

impl Instrument {
    /// An expected instrument as listed in a reference kit.
    pub fn expected(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: Some(kind.into()),
            status: None,
            confidence: 0.0,
            position: None,
        }
    }

    /// A detector observation, not yet reconciled.
    pub fn detected(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        confidence: f64,
        position: Option<BoundingBox>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: Some(kind.into()),
            status: None,
            confidence,
            position,
        }
    }

    /// Matching key, ignoring blank labels.
    pub fn type_key(&self) -> Option<&str> {
        self.kind.as_deref().filter(|kind| !kind.trim().is_empty())
    }

    /// Fallback matching key, ignoring blank names.
    pub fn name_key(&self) -> Option<&str> {
        Some(self.name.as_str()).filter(|name| !name.trim().is_empty())
    }

    /// First numeric field that JSON cannot carry (NaN or infinite).
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.confidence.is_finite() {
            return Some("confidence");
        }
        let position = self.position?;
        [
            ("position.x", position.x),
            ("position.y", position.y),
            ("position.width", position.width),
            ("position.height", position.height),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }

    pub fn with_status(mut self, status: InstrumentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Entry of the seeded master list of known instrument definitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub created_at: String, // ISO 8601 datetime
}

impl From<InstrumentDefinition> for Instrument {
    fn from(definition: InstrumentDefinition) -> Self {
        Instrument::expected(definition.id, definition.name, definition.kind)
    }
}
