use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a timestamp: integer Unix milliseconds or an RFC3339 string
pub fn timestamp_from_value(value: &Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| "invalid timestamp".to_string())?;
            DateTime::from_timestamp_millis(ms).ok_or_else(|| "timestamp out of range".to_string())
        }
        Value::String(s) => s
            .parse::<DateTime<Utc>>()
            .map_err(|e| format!("invalid RFC3339 timestamp: {}", e)),
        _ => Err("timestamp must be a number or string".to_string()),
    }
}

/// Custom deserializer for timestamp that accepts both integers (ms) and RFC3339 strings
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    timestamp_from_value(&value).map_err(Error::custom)
}

/// Treat empty strings as absent
pub fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
