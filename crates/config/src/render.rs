//! [`Configuration`] → text.

use tracing::debug;

use crate::{
    error::{Error, Result},
    format::DocumentFormat,
    schema::Configuration,
};

/// Render `config` in the given format.
///
/// Output is deterministic: field order follows the schema declarations,
/// list and mapping entries keep their in-memory order, and unset values are
/// omitted. Both forms end with a newline.
pub fn render(config: &Configuration, format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| Error::render(format, e))?
        },
        DocumentFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(config).map_err(|e| Error::render(format, e))?;
            text.push('\n');
            text
        },
    };
    debug!(%format, bytes = text.len(), "rendered configuration");
    Ok(text)
}
