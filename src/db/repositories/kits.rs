use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::{
    db::{
        connection::RecordStore,
        helpers::{
            conversion_error, decode_instruments, encode_instruments, ensure_finite_instruments,
            format_datetime, parse_datetime,
        },
        models::Kit,
    },
    error::{Error, Result},
};

const KIT_COLUMNS: &str =
    "id, name, description, instruments, created_at, updated_at, is_reference";

fn row_to_kit(row: &Row) -> Result<Kit, rusqlite::Error> {
    let instruments: String = row.get("instruments")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Kit {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        instruments: decode_instruments(&instruments, "instruments")
            .map_err(|e| conversion_error(3, e))?,
        created_at: parse_datetime(&created_at, "created_at").map_err(|e| conversion_error(4, e))?,
        updated_at: parse_datetime(&updated_at, "updated_at").map_err(|e| conversion_error(5, e))?,
        is_reference: row.get("is_reference")?,
    })
}

impl RecordStore {
    /// Insert or fully replace a kit.
    ///
    /// `updated_at` is refreshed on every save; the stored kit is returned so
    /// callers hold exactly what `get_kit` will read back.
    pub async fn save_kit(&self, mut kit: Kit) -> Result<Kit> {
        if let Some(duplicate) = kit.duplicate_instrument_id() {
            return Err(Error::InvalidRecord(format!(
                "kit {} lists instrument {duplicate} more than once",
                kit.id
            )));
        }

        ensure_finite_instruments(&kit.instruments, &format!("kit {}", kit.id))?;

        kit.updated_at = Utc::now().max(kit.created_at);
        let record = kit.clone();

        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kits (id, name, description, instruments, created_at, updated_at, is_reference)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.name,
                    record.description,
                    encode_instruments(&record.instruments)?,
                    format_datetime(&record.created_at),
                    format_datetime(&record.updated_at),
                    record.is_reference,
                ],
            )
            .with_context(|| format!("failed to save kit {}", record.id))?;
            Ok(())
        })
        .await?;

        Ok(kit)
    }

    pub async fn get_kit(&self, id: &str) -> Result<Option<Kit>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("SELECT {KIT_COLUMNS} FROM kits WHERE id = ?1"))?;
            let kit = stmt
                .query_row(params![id], row_to_kit)
                .optional()
                .with_context(|| format!("failed to load kit {id}"))?;
            Ok(kit)
        })
        .await
    }

    /// All kits, most recently updated first.
    pub async fn list_kits(&self) -> Result<Vec<Kit>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {KIT_COLUMNS} FROM kits ORDER BY updated_at DESC, id ASC"
            ))?;

            let kits = stmt
                .query_map([], row_to_kit)?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to list kits")?;

            Ok(kits)
        })
        .await
    }
}
