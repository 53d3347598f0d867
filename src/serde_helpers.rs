//! Deserialization of API responses.
//!
//! With the `tracing` feature, fields the response types do not know about are reported as
//! warnings instead of being dropped silently, and a failed deserialization logs the JSON
//! path that broke it. This is how backend schema drift shows up in the logs.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A `serde_as` type for timestamps that may lack an offset.
///
/// The backend serializes database timestamps both as RFC 3339 (`2025-03-01T10:00:00Z`) and
/// as naive ISO 8601 (`2025-03-01T10:00:00.123456`). Naive values are taken as UTC.
/// Serializes as RFC 3339.
///
/// Use with `#[serde_as(as = "Option<LenientDateTime>")]`.
pub struct LenientDateTime;

impl<'de> serde_with::DeserializeAs<'de, DateTime<Utc>> for LenientDateTime {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize as _;
        use serde::de::Error as _;

        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }

        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|e| D::Error::custom(format!("invalid timestamp `{raw}`: {e}")))
    }
}

impl serde_with::SerializeAs<DateTime<Utc>> for LenientDateTime {
    fn serialize_as<S>(source: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&source.to_rfc3339())
    }
}

/// Deserialize `value` into `T`, warning about unknown fields.
///
/// Unknown fields never fail the call; missing or mistyped required fields do.
///
/// ```ignore
/// let user: User = deserialize_with_warnings(json!({"id": "1", "shoe_size": 44}))?;
/// // WARN unknown field in API response type_name=User field=shoe_size value=44
/// ```
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(type_name = %type_name::<T>(), json = %value, "deserializing JSON");

    let original = value.clone();
    let mut unknown: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| unknown.push(path.to_string()))
        .inspect_err(|_| {
            let path_result: Result<T, _> = serde_path_to_error::deserialize(&original);
            if let Err(e) = path_result {
                let path = e.path().to_string();
                tracing::error!(
                    type_name = %type_name::<T>(),
                    path = %path,
                    value = %describe(lookup_value(&original, &path)),
                    error = %e.inner(),
                    "deserialization failed"
                );
            }
        })?;

    for path in unknown {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %path,
            value = %describe(lookup_value(&original, &path)),
            "unknown field in API response"
        );
    }

    Ok(result)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Find the value at a `serde_ignored` / `serde_path_to_error` path such as
/// `badges[0].name`, `?.user.id` or `items.3`. `?` segments mark `Option` layers and are
/// skipped.
#[cfg(feature = "tracing")]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty() && *segment != "?")
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

#[cfg(feature = "tracing")]
fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unable to retrieve>".to_owned(), Value::to_string)
}
