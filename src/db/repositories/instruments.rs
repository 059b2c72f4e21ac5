use anyhow::Context;
use rusqlite::Row;

use crate::{
    db::{
        connection::RecordStore,
        models::{Instrument, InstrumentDefinition},
    },
    error::Result,
};

fn row_to_definition(row: &Row) -> Result<InstrumentDefinition, rusqlite::Error> {
    Ok(InstrumentDefinition {
        id: row.get("id")?,
        name: row.get("name")?,
        kind: row.get("type")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

impl RecordStore {
    /// Known instrument definitions, ordered by id.
    pub async fn list_master_instruments(&self) -> Result<Vec<InstrumentDefinition>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, type, description, created_at
                 FROM instruments_master
                 ORDER BY id ASC",
            )?;

            let definitions = stmt
                .query_map([], row_to_definition)?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to list master instruments")?;

            Ok(definitions)
        })
        .await
    }

    /// The master list as an expected composition, usable as a default reference.
    pub async fn master_reference(&self) -> Result<Vec<Instrument>> {
        Ok(self
            .list_master_instruments()
            .await?
            .into_iter()
            .map(Instrument::from)
            .collect())
    }
}
