//! Lenient deserializers for analytics API payloads.
//!
//! The API is not consistent about numeric fields: the same counter may
//! arrive as `3`, `3.0`, `"3"` or `null` depending on the endpoint.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Any numeric-looking value → `f64`; null, missing or garbage → `0.0`.
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0))
}

/// Like [`f64_or_zero`], with negative amounts clamped to `0.0`.
pub fn non_negative_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64_or_zero(deserializer).map(|v| v.max(0.0))
}

/// Any numeric-looking value → `u64` (truncated, negatives → 0).
pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(clamp_to_u64)),
        Some(other) => value_to_f64(&other).map(clamp_to_u64),
        None => None,
    };
    Ok(parsed.unwrap_or(0))
}

/// Same as [`u64_or_zero`], saturating at `u32::MAX`.
pub fn u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    u64_or_zero(deserializer).map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Null-tolerant string.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn clamp_to_u64(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.trunc() as u64
    } else {
        0
    }
}
