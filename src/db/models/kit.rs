//! Kit data models.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Instrument;

/// A named reference composition of expected instruments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instruments: Vec<Instrument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_reference: bool,
}

impl Kit {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruments: Vec<Instrument>,
        is_reference: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("kit-{}", Uuid::new_v4()),
            name: name.into(),
            description: description.into(),
            instruments,
            created_at: now,
            updated_at: now,
            is_reference,
        }
    }

    /// First instrument id that appears more than once, if any.
    pub fn duplicate_instrument_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.instruments
            .iter()
            .map(|instrument| instrument.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_duplicate_instrument_ids() {
        let kit = Kit::new(
            "Laparotomie",
            "",
            vec![
                Instrument::expected("INST-001", "Ciseaux de Mayo", "scissors"),
                Instrument::expected("INST-002", "Pince Hémostatique", "clamp"),
                Instrument::expected("INST-001", "Ciseaux de Mayo", "scissors"),
            ],
            true,
        );

        assert_eq!(kit.duplicate_instrument_id(), Some("INST-001"));
    }

    #[test]
    fn new_kit_has_matching_timestamps() {
        let kit = Kit::new("Petite chirurgie", "Base kit", Vec::new(), false);
        assert!(kit.id.starts_with("kit-"));
        assert_eq!(kit.created_at, kit.updated_at);
        assert_eq!(kit.duplicate_instrument_id(), None);
    }
}
