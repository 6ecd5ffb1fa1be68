use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer};

/// Deserializes a string-backed value, treating `null` and `""` as `None`.
///
/// The core service emits empty strings for unset enum columns.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => T::deserialize(s.into_deserializer()).map(Some),
        None => Ok(None),
    }
}
