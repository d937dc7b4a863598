use thiserror::Error;

use crate::{edit::EditError, format::DocumentFormat, parse::ParseError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("failed to render {format} document: {message}")]
    Render {
        format: DocumentFormat,
        message: String,
    },

    #[error("unsupported config format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// I/O failure, prefixed with what was being done.
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn render(format: DocumentFormat, source: impl std::fmt::Display) -> Self {
        Self::Render {
            format,
            message: source.to_string(),
        }
    }

    #[must_use]
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }
}

impl gatecfg_common::FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

gatecfg_common::impl_context!();
