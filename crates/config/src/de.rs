//! Lenient deserialization helpers shared by the schema types.
//!
//! Hand-edited documents often spell an empty section as a bare key
//! (`api_keys:`), which YAML reads as `null`, and write numeric-looking
//! credentials without quotes. These helpers absorb both.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// Deserialize `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize any scalar (string, number, boolean) as its textual form.
/// `null` reads as the empty string.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    ScalarString::deserialize(deserializer).map(|s| s.0)
}

/// A string that also accepts numbers and booleans.
pub(crate) struct ScalarString(pub(crate) String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl Visitor<'_> for ScalarVisitor {
    type Value = ScalarString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ScalarString(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarString(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarString(String::new()))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
        #[serde(deserialize_with = "scalar_string")]
        key: String,
    }

    #[test]
    fn null_list_becomes_empty() {
        let probe: Probe = serde_json::from_str(r#"{"items": null, "key": "k"}"#).unwrap();
        assert!(probe.items.is_empty());
    }

    #[test]
    fn numeric_key_is_stringified() {
        let probe: Probe = serde_json::from_str(r#"{"key": 123456}"#).unwrap();
        assert_eq!(probe.key, "123456");
    }

    #[test]
    fn nested_value_is_not_a_scalar() {
        let err = serde_json::from_str::<Probe>(r#"{"key": ["a"]}"#).unwrap_err();
        assert!(err.to_string().contains("a string, number or boolean"));
    }
}
