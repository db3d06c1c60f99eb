//! Serde helpers that trim string input before validation runs.
//!
//! Use with `#[serde(deserialize_with = "...")]`; optional fields also
//! need `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

/// Trim a required string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Trim an optional string; `null` stays `None`.
pub fn option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "super::string")]
        title: String,
        #[serde(default, deserialize_with = "super::option")]
        branch: Option<String>,
    }

    #[test]
    fn test_trims_required_and_optional() {
        let p: Payload = serde_json::from_str(r#"{"title":"  Rent ","branch":" North "}"#).unwrap();
        assert_eq!(p.title, "Rent");
        assert_eq!(p.branch.as_deref(), Some("North"));
    }

    #[test]
    fn test_missing_optional_is_none() {
        let p: Payload = serde_json::from_str(r#"{"title":"Rent"}"#).unwrap();
        assert!(p.branch.is_none());

        let p: Payload = serde_json::from_str(r#"{"title":"Rent","branch":null}"#).unwrap();
        assert!(p.branch.is_none());
    }
}
