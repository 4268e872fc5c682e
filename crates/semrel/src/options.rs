//! Host-supplied plugin options and their validation.
//!
//! The options schema is permissive in the sense that every key is
//! optional — an empty object (or no options at all) is valid. Validation
//! still reports unknown keys and wrong-typed values, since its whole job
//! is catching configuration typos before a release runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option keys this plugin understands.
const KNOWN_KEYS: &[&str] = &["publishScript"];

/// Host-supplied options for the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginOptions {
    /// Script that executes release pipeline stages, invoked as
    /// `<script> release <remote> <branch>` during the publish step.
    pub publish_script: Option<String>,
}

impl PluginOptions {
    /// Deserialize options from the host-supplied JSON value.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

/// Validate a host-supplied options value against the schema.
///
/// Returns human-readable findings; an empty result means valid.
pub fn validate(options: &Value) -> Vec<String> {
    let mut findings = Vec::new();

    match options {
        Value::Null => {}
        Value::Object(fields) => {
            for (key, value) in fields {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    findings.push(format!("unknown option {key:?}"));
                } else if key == "publishScript" && !value.is_string() {
                    findings.push(format!(
                        "option \"publishScript\" must be a string, got {value}"
                    ));
                }
            }
        }
        other => findings.push(format!("options must be an object, got {other}")),
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_valid() {
        assert!(validate(&json!({})).is_empty());
    }

    #[test]
    fn null_options_are_valid() {
        assert!(validate(&Value::Null).is_empty());
    }

    #[test]
    fn publish_script_string_is_valid() {
        assert!(validate(&json!({ "publishScript": "./release.sh" })).is_empty());
    }

    #[test]
    fn unknown_key_is_reported() {
        let findings = validate(&json!({ "publishScripts": "./release.sh" }));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("publishScripts"));
    }

    #[test]
    fn wrong_type_is_reported() {
        let findings = validate(&json!({ "publishScript": 7 }));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("must be a string"));
    }

    #[test]
    fn non_object_is_reported() {
        let findings = validate(&json!("release.sh"));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("must be an object"));
    }

    #[test]
    fn options_deserialize_from_value() {
        let options =
            PluginOptions::from_value(&json!({ "publishScript": "./release.sh" })).unwrap();
        assert_eq!(options.publish_script.as_deref(), Some("./release.sh"));
    }

    #[test]
    fn absent_keys_deserialize_to_defaults() {
        let options = PluginOptions::from_value(&json!({})).unwrap();
        assert_eq!(options, PluginOptions::default());
    }
}
