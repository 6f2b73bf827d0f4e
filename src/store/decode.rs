//! Tolerant decoding of per-day snapshot documents.
//!
//! External documents are loosely typed: unit numbers arrive as strings or
//! integers, `diff` may be null or absent, flags may hold values outside the
//! vocabulary. Everything is coerced into [`RawUnitRecord`] here, at the
//! store boundary, so the aggregation engine only ever sees well-formed
//! records. Entries missing a unit number or model name are dropped, never
//! propagated as errors.

use serde_json::{json, Map, Value};

use crate::models::{Flag, RawUnitRecord};

/// Decode one day's `data` map into records, dropping malformed entries.
pub fn decode_day(data: &Value) -> Vec<RawUnitRecord> {
    let Some(entries) = data.as_object() else {
        log::warn!("snapshot document data is not an object, ignoring");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(key, entry)| decode_entry(key, entry))
        .collect()
}

fn decode_entry(unit_key: &str, entry: &Value) -> Option<RawUnitRecord> {
    let obj = entry.as_object()?;

    let unit_number = coerce_label(obj.get("machineNumber")?)?;
    let model_name = obj.get("name").and_then(Value::as_str)?.to_string();
    if unit_number.is_empty() || model_name.is_empty() {
        log::debug!("dropping snapshot entry '{unit_key}' with empty identity");
        return None;
    }

    let diff = obj.get("diff").and_then(Value::as_i64);

    // Out-of-vocabulary flag values degrade to "unflagged" rather than
    // poisoning the record.
    let flag = obj
        .get("flag")
        .and_then(Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|v| Flag::try_from(v).ok());

    Some(RawUnitRecord {
        unit_key: unit_key.to_string(),
        unit_number,
        model_name,
        diff,
        flag,
    })
}

/// Unit labels arrive as JSON strings or integers depending on the writer.
fn coerce_label(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Encode records back into the day document's `data` map shape.
pub fn encode_day(records: &[RawUnitRecord]) -> Value {
    let mut data = Map::new();
    for rec in records {
        let mut entry = json!({
            "machineNumber": rec.unit_number,
            "name": rec.model_name,
        });
        if let Some(diff) = rec.diff {
            entry["diff"] = json!(diff);
        }
        if let Some(flag) = rec.flag {
            entry["flag"] = json!(u8::from(flag));
        }
        data.insert(rec.unit_key.clone(), entry);
    }
    Value::Object(data)
}
