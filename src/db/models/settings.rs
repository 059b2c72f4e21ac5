//! Settings data models.
//!
//! A single process-wide row; every write replaces all six fields together.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    Sw,
    Ha,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Sw => "sw",
            Language::Ha => "ha",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fr" => Some(Language::Fr),
            "sw" => Some(Language::Sw),
            "ha" => Some(Language::Ha),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    pub language: Language,
    pub offline_mode: bool,
    pub sms_alerts: bool,
    // `deserialize_with` keeps the key mandatory even though the value may be null.
    #[serde(deserialize_with = "Option::deserialize")]
    pub phone_number: Option<String>,
    pub auto_save: bool,
    pub ai_confidence_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::Fr,
            offline_mode: true,
            sms_alerts: false,
            phone_number: None,
            auto_save: true,
            ai_confidence_threshold: 0.95,
        }
    }
}

impl Settings {
    /// Parse a full settings payload from the shell. Unknown or missing keys are rejected.
    pub fn from_json(payload: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(payload)
            .map_err(|err| Error::InvalidRecord(format!("settings payload: {err}")))?;
        validation::validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Validation functions for settings data
pub mod validation {
    use super::Settings;
    use crate::error::{Error, Result};

    pub fn validate_threshold(threshold: f64) -> Result<()> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidRecord(format!(
                "aiConfidenceThreshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(())
    }

    pub fn validate_phone_number(phone_number: Option<&str>) -> Result<()> {
        match phone_number {
            Some(number) if number.trim().is_empty() => Err(Error::InvalidRecord(
                "phoneNumber must not be blank when provided".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn validate_settings(settings: &Settings) -> Result<()> {
        validate_threshold(settings.ai_confidence_threshold)?;
        validate_phone_number(settings.phone_number.as_deref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_payload() {
        let payload = r#"{
            "language": "sw",
            "offlineMode": false,
            "smsAlerts": true,
            "phoneNumber": "+255700000000",
            "autoSave": false,
            "aiConfidenceThreshold": 0.85
        }"#;

        let settings = Settings::from_json(payload).unwrap();
        assert_eq!(settings.language, Language::Sw);
        assert!(settings.sms_alerts);
        assert_eq!(settings.phone_number.as_deref(), Some("+255700000000"));
        assert!(!settings.auto_save);
        assert_eq!(settings.ai_confidence_threshold, 0.85);
    }

    #[test]
    fn accepts_null_phone_number() {
        let payload = r#"{"language":"fr","offlineMode":true,"smsAlerts":false,"phoneNumber":null,"autoSave":true,"aiConfidenceThreshold":0.95}"#;
        assert_eq!(Settings::from_json(payload).unwrap(), Settings::default());
    }

    #[test]
    fn rejects_missing_key() {
        let payload = r#"{"language":"fr","offlineMode":true,"smsAlerts":false,"autoSave":true,"aiConfidenceThreshold":0.95}"#;
        assert!(matches!(
            Settings::from_json(payload),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn rejects_unknown_key() {
        let payload = r#"{"language":"fr","offlineMode":true,"smsAlerts":false,"phoneNumber":null,"autoSave":true,"aiConfidenceThreshold":0.95,"theme":"dark"}"#;
        assert!(matches!(
            Settings::from_json(payload),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn rejects_blank_phone_number() {
        let payload = r#"{"language":"ha","offlineMode":true,"smsAlerts":true,"phoneNumber":"  ","autoSave":true,"aiConfidenceThreshold":0.95}"#;
        assert!(matches!(
            Settings::from_json(payload),
            Err(Error::InvalidRecord(_))
        ));
        assert!(validation::validate_phone_number(Some("")).is_err());
        assert!(validation::validate_phone_number(Some("+2348000000000")).is_ok());
        assert!(validation::validate_phone_number(None).is_ok());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        assert!(validation::validate_threshold(1.2).is_err());
        assert!(validation::validate_threshold(f64::NAN).is_err());
        assert!(validation::validate_threshold(0.0).is_ok());
        assert!(validation::validate_threshold(1.0).is_ok());
    }

    #[test]
    fn language_round_trips_through_strings() {
        for language in [Language::Fr, Language::Sw, Language::Ha] {
            assert_eq!(Language::parse(language.as_str()), Some(language));
        }
        assert_eq!(Language::parse("en"), None);
    }
}
