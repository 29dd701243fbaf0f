//! Snapshot record encoding.
//!
//! Records are stored as pretty-printed JSON (2-space indentation) so that
//! versions can be diffed by eye.
//!
//! Decoding is lenient below the top level: a light entry without a usable
//! `name`/`type`, or a single value of an unknown shape, is dropped and
//! noted in [`SnapshotRecord::issues`] while the rest of the record loads.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use super::schema::{AttrValue, AttributeMap, DecodeIssue, LightEntry, SnapshotRecord};
use crate::error::{Result, RigError};

/// File extension of stored records.
pub const RECORD_EXTENSION: &str = "json";

/// Stamp publish metadata onto `record` and serialize it.
///
/// `_published` is set to the current local time and `_asset_name` to
/// `asset`, overwriting any previous values.
pub fn encode(record: &mut SnapshotRecord, asset: &str) -> Result<Vec<u8>> {
    encode_at(record, asset, Local::now())
}

/// Same as [`encode`] with an explicit publish time.
#[instrument(skip(record), fields(lights = record.lights.len()))]
pub fn encode_at(
    record: &mut SnapshotRecord,
    asset: &str,
    published: DateTime<Local>,
) -> Result<Vec<u8>> {
    // serde_json writes NaN and infinities as `null`, which would not
    // decode again.
    if let Some((light, attr)) = record.first_non_finite() {
        return Err(RigError::Encode(format!("{light}.{attr} is not a finite number")));
    }
    record.stamp(asset, published);
    let bytes =
        serde_json::to_vec_pretty(record).map_err(|e| RigError::Encode(e.to_string()))?;
    trace!(bytes = bytes.len(), "Encoded snapshot record");
    Ok(bytes)
}

/// Parse a stored record.
///
/// Fails only when the document is not JSON or its top level is not a
/// record; problems inside `lights` end up in `issues`.
pub fn decode(bytes: &[u8]) -> Result<SnapshotRecord> {
    let decode_error = |e: serde_json::Error| RigError::Decode {
        path: None,
        reason: e.to_string(),
    };

    let mut document: Map<String, Value> =
        serde_json::from_slice(bytes).map_err(decode_error)?;
    let lights = document.remove("lights");
    let mut record: SnapshotRecord =
        serde_json::from_value(Value::Object(document)).map_err(decode_error)?;

    match lights {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.into_iter().enumerate() {
                if let Some(light) = decode_light(index, entry, &mut record.issues) {
                    record.lights.push(light);
                }
            }
        }
        Some(other) => record.issues.push(DecodeIssue {
            light: "lights".to_string(),
            attribute: None,
            reason: format!("expected a list of lights, found {}", kind_of(&other)),
        }),
    }

    if !record.issues.is_empty() {
        debug!(dropped = record.issues.len(), "Record decoded with dropped parts");
    }
    Ok(record)
}

fn decode_light(
    index: usize,
    entry: Value,
    issues: &mut Vec<DecodeIssue>,
) -> Option<LightEntry> {
    let placeholder = format!("#{index}");
    let mut fields = match entry {
        Value::Object(fields) => fields,
        other => {
            issues.push(DecodeIssue {
                light: placeholder,
                attribute: None,
                reason: format!("expected a light entry, found {}", kind_of(&other)),
            });
            return None;
        }
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) => name,
        other => {
            issues.push(DecodeIssue {
                light: placeholder,
                attribute: None,
                reason: format!("light has no name ({})", describe(other.as_ref())),
            });
            return None;
        }
    };
    let light_type = match fields.remove("type") {
        Some(Value::String(light_type)) => light_type,
        other => {
            issues.push(DecodeIssue {
                light: name,
                attribute: None,
                reason: format!("light has no type ({})", describe(other.as_ref())),
            });
            return None;
        }
    };

    let mut light = LightEntry::new(name, light_type);
    light.attributes = decode_values(&light.name, fields.remove("attributes"), issues);
    light.transform = decode_values(&light.name, fields.remove("transform"), issues);
    Some(light)
}

fn decode_values(
    light: &str,
    values: Option<Value>,
    issues: &mut Vec<DecodeIssue>,
) -> AttributeMap {
    let mut decoded = AttributeMap::new();
    let values = match values {
        None | Some(Value::Null) => return decoded,
        Some(Value::Object(values)) => values,
        Some(other) => {
            issues.push(DecodeIssue {
                light: light.to_string(),
                attribute: None,
                reason: format!("expected an attribute map, found {}", kind_of(&other)),
            });
            return decoded;
        }
    };

    for (attr, value) in values {
        match serde_json::from_value::<AttrValue>(value) {
            Ok(value) => {
                decoded.insert(attr, value);
            }
            Err(_) => issues.push(DecodeIssue {
                light: light.to_string(),
                attribute: Some(attr),
                reason: "unsupported value".to_string(),
            }),
        }
    }
    decoded
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| format!("found {}", kind_of(v)))
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
