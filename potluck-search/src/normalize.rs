//! Maps a source's raw JSON payload onto canonical [`Recipe`] records.
//!
//! An empty payload (`null`, or an empty or `null` record array) yields no
//! records. Anything that is not record-shaped is reported as
//! [`SearchError::Upstream`] naming the source.

use serde_json::Value;

use crate::config::FieldMapping;
use crate::error::SearchError;
use crate::types::Recipe;

/// Normalise one source's payload using its field mapping.
///
/// Record order within the payload is preserved.
///
/// # Errors
///
/// Returns [`SearchError::Upstream`] if the records key is missing, the
/// records are not an array, or any record lacks a usable name or servings.
pub fn normalize(
    source: &str,
    payload: &Value,
    mapping: &FieldMapping,
) -> Result<Vec<Recipe>, SearchError> {
    let records = match (mapping.records.as_deref(), payload) {
        (_, Value::Null) => return Ok(Vec::new()),
        (None, records) => records,
        (Some(key), Value::Object(fields)) => fields.get(key).ok_or_else(|| {
            SearchError::upstream(source, format!("payload has no `{key}` field"))
        })?,
        (Some(key), other) => {
            return Err(SearchError::upstream(
                source,
                format!("expected an object holding `{key}`, got {}", kind(other)),
            ))
        }
    };

    let items = match records {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(SearchError::upstream(
                source,
                format!("records are not a list (got {})", kind(other)),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_record(source, index, item, mapping))
        .collect()
}

fn normalize_record(
    source: &str,
    index: usize,
    item: &Value,
    mapping: &FieldMapping,
) -> Result<Recipe, SearchError> {
    let Value::Object(fields) = item else {
        return Err(SearchError::upstream(
            source,
            format!("record {index} is not an object (got {})", kind(item)),
        ));
    };

    let name = match fields.get(&mapping.name) {
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(SearchError::upstream(
                source,
                format!("record {index} field `{}` is {}, not a string", mapping.name, kind(other)),
            ))
        }
        None => {
            return Err(SearchError::upstream(
                source,
                format!("record {index} is missing `{}`", mapping.name),
            ))
        }
    };

    let raw_servings = fields.get(&mapping.servings).ok_or_else(|| {
        SearchError::upstream(
            source,
            format!("record {index} is missing `{}`", mapping.servings),
        )
    })?;
    let servings = parse_servings(raw_servings).ok_or_else(|| {
        SearchError::upstream(
            source,
            format!(
                "record {index} field `{}` is not a serving count: {raw_servings}",
                mapping.servings
            ),
        )
    })?;

    Ok(Recipe { name, servings })
}

/// Accepts a non-negative integer, an integral float, or a string holding one.
fn parse_servings(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => {
            if let Some(whole) = number.as_u64() {
                return u32::try_from(whole).ok();
            }
            let float = number.as_f64()?;
            let in_range = float >= 0.0 && float <= f64::from(u32::MAX);
            (in_range && float.fract() == 0.0).then_some(float as u32)
        }
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
