use anyhow::{anyhow, Context};
use rusqlite::{params, OptionalExtension, Row};

use crate::{
    db::{
        connection::RecordStore,
        helpers::conversion_error,
        models::{settings::validation, Language, Settings},
    },
    error::Result,
};

fn row_to_settings(row: &Row) -> Result<Settings, rusqlite::Error> {
    let language: String = row.get("language")?;

    Ok(Settings {
        language: Language::parse(&language)
            .ok_or_else(|| conversion_error(0, anyhow!("unknown language {language}")))?,
        offline_mode: row.get("offline_mode")?,
        sms_alerts: row.get("sms_alerts")?,
        phone_number: row.get("phone_number")?,
        auto_save: row.get("auto_save")?,
        ai_confidence_threshold: row.get("ai_confidence_threshold")?,
    })
}

impl RecordStore {
    /// The single settings row seeded by `initialize`.
    pub async fn get_settings(&self) -> Result<Settings> {
        self.execute(|conn| {
            let settings = conn
                .query_row(
                    "SELECT language, offline_mode, sms_alerts, phone_number, auto_save, ai_confidence_threshold
                     FROM settings
                     WHERE id = 1",
                    [],
                    row_to_settings,
                )
                .optional()
                .context("failed to load settings")?;

            settings.ok_or_else(|| anyhow!("settings row is missing"))
        })
        .await
    }

    /// Overwrite every field of the settings row.
    pub async fn update_settings(&self, settings: &Settings) -> Result<()> {
        validation::validate_settings(settings)?;

        let record = settings.clone();
        self.execute(move |conn| {
            let rows_affected = conn
                .execute(
                    "UPDATE settings
                     SET language = ?1,
                         offline_mode = ?2,
                         sms_alerts = ?3,
                         phone_number = ?4,
                         auto_save = ?5,
                         ai_confidence_threshold = ?6
                     WHERE id = 1",
                    params![
                        record.language.as_str(),
                        record.offline_mode,
                        record.sms_alerts,
                        record.phone_number,
                        record.auto_save,
                        record.ai_confidence_threshold,
                    ],
                )
                .context("failed to update settings")?;

            if rows_affected == 0 {
                return Err(anyhow!("settings row is missing"));
            }
            Ok(())
        })
        .await
    }
}
