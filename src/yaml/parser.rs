//! YAML and JSON parsing with error handling

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into a typed value with nice error messages
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Parse JSON content into a typed value with nice error messages
pub fn parse_json<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_json::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_json_error(&e, content, filename))
    })
}
