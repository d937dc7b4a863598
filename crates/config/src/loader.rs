use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    error::{Context, Result},
    format::DocumentFormat,
    parse::parse,
    render::render,
    schema::Configuration,
};

/// Standard config file names, checked in order.
pub const CONFIG_FILENAMES: &[&str] = &["api.yaml", "api.yml", "api.json"];

/// File name of the downloadable artifact.
pub const DOWNLOAD_FILE_NAME: &str = "api.yaml";

/// Load config from the given path; the format follows the extension.
pub fn load_config(path: &Path) -> Result<Configuration> {
    let format = DocumentFormat::from_path(path)?;
    let raw = read(path)?;
    Ok(parse(&raw, format)?)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./api.{yaml,yml,json}` (project-local)
/// 2. `~/.config/gatecfg/api.{yaml,yml,json}` (user-global)
///
/// Returns [`Configuration::new_session`] if no config file is found or it
/// cannot be read.
pub fn discover_and_load() -> Configuration {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    Configuration::new_session()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new("."), config_dir().as_deref())
}

fn find_config_file_in(local: &Path, global: Option<&Path>) -> Option<PathBuf> {
    std::iter::once(local)
        .chain(global)
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/gatecfg/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gatecfg").map(|d| d.config_dir().to_path_buf())
}

/// Returns the path of an existing config file, or the default YAML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DOWNLOAD_FILE_NAME)
}

/// Render `config` in the format named by `path`'s extension and write it.
///
/// Creates parent directories if needed.
pub fn save_config(config: &Configuration, path: &Path) -> Result<()> {
    let format = DocumentFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let text = render(config, format)?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), %format, "saved config");
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
