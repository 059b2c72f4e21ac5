use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

use crate::{
    db::models::{Instrument, Verdict},
    error::Error,
};

/// Fixed-width RFC 3339 so that lexical `ORDER BY` matches chronological order.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn encode_instruments(instruments: &[Instrument]) -> Result<String> {
    serde_json::to_string(instruments).context("failed to serialize instruments")
}

/// Reject instruments whose measurements would be written as `null`.
pub fn ensure_finite_instruments(
    instruments: &[Instrument],
    owner: &str,
) -> Result<(), Error> {
    match instruments
        .iter()
        .find_map(|instrument| instrument.non_finite_field().map(|field| (instrument, field)))
    {
        Some((instrument, field)) => Err(Error::InvalidRecord(format!(
            "instrument {} in {owner} has a non-finite {field}",
            instrument.id
        ))),
        None => Ok(()),
    }
}

pub fn decode_instruments(blob: &str, field: &str) -> Result<Vec<Instrument>> {
    serde_json::from_str(blob).with_context(|| format!("failed to deserialize {field}"))
}

pub fn parse_verdict(value: &str) -> Result<Verdict> {
    match value {
        "conforming" => Ok(Verdict::Conforming),
        "partial" => Ok(Verdict::Partial),
        "non-conforming" => Ok(Verdict::NonConforming),
        other => Err(anyhow!("unknown scan status {other}")),
    }
}

pub fn to_score(value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| anyhow!("conformity_score {value} is outside [0, 100]"))
}

/// Wrap a decode failure so it can be returned from a `rusqlite` row mapper.
pub fn conversion_error(column: usize, err: anyhow::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err.into())
}
