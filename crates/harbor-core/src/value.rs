//! Helpers over decoded configuration documents.
//!
//! Every source, whether parsed from YAML on disk or emitted as JSON by the
//! decoder, ends up as a [`Mapping`] of string keys to `serde_json::Value`.

use serde_json::Value;

pub type Mapping = serde_json::Map<String, Value>;

const MASK: &str = "******";

/// Walk a dotted path (`ssh.create_at`) through nested mappings.
///
/// Returns `None` as soon as a segment is missing or an intermediate value is
/// not a mapping. An explicit `null` counts as absent.
pub fn lookup<'a>(mapping: &'a Mapping, dotted: &str) -> Option<&'a Value> {
    let mut segments = dotted.split('.');
    let first = segments.next()?;
    let mut current = mapping.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Like [`lookup`] but only yields non-empty strings.
pub fn lookup_str<'a>(mapping: &'a Mapping, dotted: &str) -> Option<&'a str> {
    lookup(mapping, dotted)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Copy of `mapping` with the value of every key containing `password`
/// (case-insensitive) replaced by a mask, at any depth.
pub fn mask_passwords(mapping: &Mapping) -> Mapping {
    mapping
        .iter()
        .map(|(key, value)| {
            let masked = if key.to_lowercase().contains("password") {
                match value {
                    Value::Object(inner) => Value::Object(mask_passwords(inner)),
                    Value::Null => Value::Null,
                    _ => Value::String(MASK.to_string()),
                }
            } else {
                mask_value(value)
            };
            (key.clone(), masked)
        })
        .collect()
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::Object(inner) => Value::Object(mask_passwords(inner)),
        Value::Array(items) => Value::Array(items.iter().map(mask_value).collect()),
        other => other.clone(),
    }
}
