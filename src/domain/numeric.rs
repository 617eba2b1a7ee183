// Numeric extraction - absent or mistyped numbers read as zero
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn number_or_zero(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `deserialize_with` helper for numeric payload fields.
///
/// Pair with `#[serde(default)]` so a missing field also reads as zero.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_or_zero(value.as_ref()))
}

/// Integer counterpart of [`lenient_f64`]; fractions truncate toward zero.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_or_zero(value.as_ref()) as i64)
}

/// Counters never go below zero.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_or_zero(value.as_ref()).max(0.0) as u64)
}

/// Numeric arrays such as bounding boxes. `null` or a non-array reads as
/// empty; each element goes through [`number_or_zero`].
pub fn lenient_f64_seq<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().map(|v| number_or_zero(Some(v))).collect(),
        _ => Vec::new(),
    })
}

/// Flags arrive as `0`/`1` or as booleans depending on the model service.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}
