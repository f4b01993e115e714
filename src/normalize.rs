//! Cell value normalization.
//!
//! Spreadsheet cells arrive as raw strings. Empty cells, whitespace and the
//! literal `None` placeholder all mean "no value" and normalize to `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Placeholder the sheets use for an intentionally empty cell.
pub const PLACEHOLDER: &str = "None";

fn meaningful(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse a cell as an integer.
///
/// Returns `None` for blank or placeholder cells and for text that is not
/// an integer.
pub fn ensure_int(value: &str) -> Option<i64> {
    meaningful(value)?.parse().ok()
}

/// Parse a cell as a finite float.
pub fn ensure_float(value: &str) -> Option<f64> {
    meaningful(value)?
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Strip surrounding quotes and whitespace from a cell.
///
/// # Example
///
/// ```
/// use pokedata::normalize::ensure_string;
///
/// assert_eq!(ensure_string("\"Darkvision\" "), Some("Darkvision".to_string()));
/// assert_eq!(ensure_string("None"), None);
/// ```
pub fn ensure_string(value: &str) -> Option<String> {
    let stripped = value.trim().trim_matches('"').trim();
    meaningful(stripped).map(str::to_string)
}

/// Split a cell on `sep` and normalize every piece with [`ensure_string`].
///
/// Absent pieces are dropped. Returns `None` when nothing is left.
pub fn ensure_list(value: &str, sep: char) -> Option<Vec<String>> {
    meaningful(value)?;

    let items: Vec<String> = value.split(sep).filter_map(ensure_string).collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Remove empty and placeholder entries in place.
pub fn clean_object(items: &mut Vec<String>) {
    items.retain(|item| !item.is_empty() && item != PLACEHOLDER);
}

/// Return a copy of `value` with every `null` object field removed.
///
/// Recurses through nested objects only. Arrays and scalars are returned as
/// they are, and nested objects that end up empty are kept.
pub fn clean_dict(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), clean_dict(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Serde helper for non-optional fields: a JSON `null` yields the default.
///
/// Lets an override clear a list or object field with `null`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
