//! Text → [`Configuration`].
//!
//! Parsing happens in two steps. [`parse_value`] only checks syntax and
//! produces a generic JSON value (YAML is converted), so both formats share
//! one structural path. [`from_value`] then reads the three top-level keys
//! through the schema's serde definitions. Unknown keys are dropped there;
//! the `validate` module reports them.

use {
    serde_json::{Map, Value},
    thiserror::Error,
    tracing::debug,
};

use crate::{format::DocumentFormat, schema::Configuration};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not valid in the selected format.
    #[error("{format} syntax error: {message}")]
    Syntax {
        format: DocumentFormat,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// The text is well-formed but a value has a shape the schema cannot
    /// read, such as a model entry with two keys.
    #[error("invalid configuration structure: {message}")]
    Structure { message: String },
}

impl ParseError {
    #[must_use]
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Parse `text` in `format` into a [`Configuration`].
pub fn parse(text: &str, format: DocumentFormat) -> Result<Configuration, ParseError> {
    let value = parse_value(text, format)?;
    let config = from_value(value)?;
    debug!(
        %format,
        providers = config.providers.len(),
        api_keys = config.api_keys.len(),
        "parsed configuration"
    );
    Ok(config)
}

/// Syntax-only parse into a generic value.
///
/// A blank YAML document is an empty mapping.
pub fn parse_value(text: &str, format: DocumentFormat) -> Result<Value, ParseError> {
    match format {
        DocumentFormat::Yaml => {
            if text.trim().is_empty() {
                return Ok(Value::Object(Map::new()));
            }
            let yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| {
                let location = e.location();
                ParseError::Syntax {
                    format,
                    message: e.to_string(),
                    line: location.as_ref().map(|l| l.line()),
                    column: location.as_ref().map(|l| l.column()),
                }
            })?;
            serde_json::to_value(yaml).map_err(|e| ParseError::structure(e.to_string()))
        },
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| ParseError::Syntax {
            format,
            message: e.to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
        }),
    }
}

/// Structural normalization of a generic value into a [`Configuration`].
///
/// Absent or `null` sections become empty; a top level that is not a
/// mapping is rejected.
pub fn from_value(value: Value) -> Result<Configuration, ParseError> {
    let value = match value {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => value,
        other => {
            return Err(ParseError::structure(format!(
                "expected a mapping with `providers`, `api_keys` and `preferences` at the top \
                 level, found {}",
                value_kind(&other)
            )));
        },
    };
    serde_json::from_value(value).map_err(|e| ParseError::structure(e.to_string()))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
