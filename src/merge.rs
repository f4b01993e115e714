//! Deep merge and structural diff over JSON objects.
//!
//! Override data is layered onto derived records with [`merge`]; variant
//! records are stored as the [`diff`] against their default record.

use serde_json::{Map, Value};

/// Merge `overlay` into `base` in place and return `base`.
///
/// Keys missing from `base` are inserted, nested objects are merged
/// recursively, and any other differing value is replaced by the overlay's.
/// Conflicts never fail.
///
/// # Example
///
/// ```
/// use pokedata::merge::merge;
/// use serde_json::json;
///
/// let mut base = json!({"a": 1, "b": {"x": 1}});
/// let overlay = json!({"b": {"y": 2}, "c": 3});
/// merge(base.as_object_mut().unwrap(), overlay.as_object().unwrap());
/// assert_eq!(base, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
/// ```
pub fn merge<'a>(base: &'a mut Map<String, Value>, overlay: &Map<String, Value>) -> &'a mut Map<String, Value> {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                merge(existing, nested);
            }
            (Some(existing), _) => {
                if existing != value {
                    *existing = value.clone();
                }
            }
            (None, _) => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
    base
}

/// Compute the fields of `other` that are new or different from `base`.
///
/// Nested objects are compared recursively and only kept when their own
/// diff is non-empty. Keys present only in `base` are not reported.
pub fn diff(base: &Map<String, Value>, other: &Map<String, Value>) -> Map<String, Value> {
    let mut delta = Map::new();

    for (key, value) in other {
        match (base.get(key), value) {
            (None, _) => {
                delta.insert(key.clone(), value.clone());
            }
            (Some(Value::Object(base_nested)), Value::Object(other_nested)) => {
                let inner = diff(base_nested, other_nested);
                if !inner.is_empty() {
                    delta.insert(key.clone(), Value::Object(inner));
                }
            }
            (Some(existing), _) if existing != value => {
                delta.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }

    delta
}
