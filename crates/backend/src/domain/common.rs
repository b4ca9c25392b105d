//! Lenient field readers for the rows of the remote API.
//!
//! The remote system exports spreadsheet-like rows: numbers sometimes arrive
//! as strings with a comma decimal separator, codes arrive as numbers or
//! strings, and any field may be `null`. A bad field degrades to its empty
//! value instead of failing the whole batch.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a decimal written as `1234.5`, `1.234,5` or `1,234.5`.
///
/// With both separators present the last one is the decimal point; a lone
/// comma is read as the decimal point.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if dot > comma => s.replace(',', ""),
        (Some(_), _) => s.replace('.', "").replace(',', "."),
        _ => s.to_string(),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_decimal(&s).unwrap_or(0.0),
        _ => 0.0,
    })
}

pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| parse_decimal(s).map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    })
}

/// Text field, trimmed; numbers are rendered, `null` becomes empty
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
