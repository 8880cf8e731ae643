// Field-level decoding that isolates malformed sections of a payload
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(
                error = %e,
                field = std::any::type_name::<T>(),
                "Skipping malformed payload field"
            );
            None
        }
    }
}

/// A malformed value decodes as `None`.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode(Value::deserialize(deserializer)?))
}

/// A malformed value decodes as `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(decode(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Malformed entries are dropped; the rest keep their order.
pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(decode).collect()),
        other => Ok(decode::<Vec<T>>(other).unwrap_or_default()),
    }
}
