use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use rusqlite::{params, Connection};

use super::{helpers::format_datetime, models::Settings};

/// Known instrument definitions seeded into an empty master list: (id, name, type).
pub const MASTER_INSTRUMENTS: [(&str, &str, &str); 5] = [
    ("INST-001", "Ciseaux de Mayo", "scissors"),
    ("INST-002", "Pince Hémostatique", "clamp"),
    ("INST-003", "Scalpel #10", "scalpel"),
    ("INST-004", "Pince Anatomique", "forceps"),
    ("INST-005", "Porte-aiguille", "needle_holder"),
];

/// Insert the default settings row and the master instrument list when absent.
pub fn seed_defaults(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to open seed transaction")?;

    let settings_count: i64 = tx.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
    if settings_count == 0 {
        let defaults = Settings::default();
        tx.execute(
            "INSERT INTO settings (id, language, offline_mode, sms_alerts, phone_number, auto_save, ai_confidence_threshold)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                defaults.language.as_str(),
                defaults.offline_mode,
                defaults.sms_alerts,
                defaults.phone_number,
                defaults.auto_save,
                defaults.ai_confidence_threshold,
            ],
        )
        .context("failed to insert default settings")?;
        info!("Seeded default settings");
    }

    let master_count: i64 =
        tx.query_row("SELECT COUNT(*) FROM instruments_master", [], |row| row.get(0))?;
    if master_count == 0 {
        let now = format_datetime(&Utc::now());
        for (id, name, kind) in MASTER_INSTRUMENTS {
            tx.execute(
                "INSERT INTO instruments_master (id, name, type, description, created_at)
                 VALUES (?1, ?2, ?3, '', ?4)",
                params![id, name, kind, now],
            )
            .with_context(|| format!("failed to insert master instrument {id}"))?;
        }
        info!("Seeded {} master instrument definitions", MASTER_INSTRUMENTS.len());
    }

    tx.commit().context("failed to commit seed data")?;
    Ok(())
}
