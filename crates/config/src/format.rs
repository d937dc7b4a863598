use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Textual forms a [`Configuration`](crate::schema::Configuration) can be
/// rendered to and parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Block-structured YAML markup. This is the downloadable form.
    #[default]
    Yaml,
    /// Plain nested JSON.
    Json,
}

impl DocumentFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Yaml => "text/yaml",
            Self::Json => "application/json",
        }
    }

    /// The other format, for two-way toggles.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Yaml => Self::Json,
            Self::Json => Self::Yaml,
        }
    }

    /// Pick the format from a file extension (`.yaml`, `.yml`, `.json`).
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        ext.parse()
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(Error::unsupported_format(other)),
        }
    }
}
