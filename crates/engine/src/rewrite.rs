//! Result rewriting and type coercion
//!
//! Raw hits come back keyed by physical column name, with dates and
//! timestamps as epoch milliseconds and binary columns as base64 text.
//! This module renames columns into the caller's namespace and converts
//! values per the view's declared schema.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use plumage_core::error::{Error, Result};
use plumage_core::types::FeatureKind;
use plumage_core::value::{Row, Value};
use plumage_core::view::TrainingDatasetFeature;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// Rename every column of a result or key map
///
/// Fails on any column absent from the mapping: an unexpected column means
/// the query and the index disagree about the schema, and dropping it
/// silently would hide that.
pub fn rewrite_keys<I>(
    columns: I,
    mapping: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, JsonValue>>
where
    I: IntoIterator<Item = (String, JsonValue)>,
{
    let mut renamed = BTreeMap::new();
    for (column, value) in columns {
        match mapping.get(&column) {
            Some(new_name) => {
                renamed.insert(new_name.clone(), value);
            }
            None => return Err(Error::ColumnNotFound { column }),
        }
    }
    Ok(renamed)
}

/// Convert raw index columns into typed values per the view's schema
///
/// Columns are matched to schema features by final name. Nulls pass
/// through, as do columns without a schema entry. Complex-typed columns are
/// stored base64-encoded except embedding vectors, which the index keeps as
/// plain arrays; `embedding_columns` names those by final column name.
pub fn coerce_row(
    columns: BTreeMap<String, JsonValue>,
    schema: &[TrainingDatasetFeature],
    embedding_columns: &BTreeSet<String>,
) -> Result<Row> {
    let mut kinds: BTreeMap<&str, FeatureKind> = BTreeMap::new();
    for feature in schema {
        kinds.insert(feature.name.as_str(), feature.kind());
    }

    let mut row = Row::new();
    for (name, raw) in columns {
        if raw.is_null() {
            row.insert(name, Value::Null);
            continue;
        }
        let value = match kinds.get(name.as_str()) {
            Some(FeatureKind::Date) => coerce_date(&name, &raw)?,
            Some(FeatureKind::Timestamp) => coerce_timestamp(&name, &raw)?,
            Some(FeatureKind::Binary) => coerce_binary(&name, &raw)?,
            Some(FeatureKind::Complex) if !embedding_columns.contains(&name) => {
                coerce_binary(&name, &raw)?
            }
            _ => Value::from(raw),
        };
        row.insert(name, value);
    }
    Ok(row)
}

fn coerce_date(column: &str, raw: &JsonValue) -> Result<Value> {
    let millis = epoch_millis(column, raw)?;
    Ok(Value::Date(datetime_from_millis(column, millis)?.date_naive()))
}

fn coerce_timestamp(column: &str, raw: &JsonValue) -> Result<Value> {
    let millis = epoch_millis(column, raw)?;
    Ok(Value::Timestamp(
        datetime_from_millis(column, millis)?.naive_utc(),
    ))
}

fn epoch_millis(column: &str, raw: &JsonValue) -> Result<i64> {
    raw.as_i64().ok_or_else(|| Error::InvalidValue {
        column: column.to_string(),
        reason: format!("expected epoch milliseconds, got {raw}"),
    })
}

fn datetime_from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    // Floor division keeps pre-epoch values on the correct second.
    DateTime::from_timestamp(millis.div_euclid(1000), 0).ok_or_else(|| Error::InvalidValue {
        column: column.to_string(),
        reason: format!("epoch milliseconds {millis} are out of range"),
    })
}

fn coerce_binary(column: &str, raw: &JsonValue) -> Result<Value> {
    let text = raw.as_str().ok_or_else(|| Error::InvalidValue {
        column: column.to_string(),
        reason: format!("expected base64 text, got {raw}"),
    })?;
    let bytes = BASE64.decode(text).map_err(|err| Error::InvalidValue {
        column: column.to_string(),
        reason: format!("invalid base64: {err}"),
    })?;
    Ok(Value::Bytes(bytes))
}
