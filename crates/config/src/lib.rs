//! Gateway configuration model and its two text forms.
//!
//! A [`Configuration`] renders to YAML (`api.yaml`) or JSON and parses back
//! from either; `parse(render(c, f), f)` is equivalent to `c`. Form-level
//! changes go through [`Edit`] actions, and [`validate`] explains what the
//! parser would drop or the gateway would reject.
//!
//! Config files: `api.yaml`, `api.yml` or `api.json`, searched in `./` then
//! `~/.config/gatecfg/`.

mod de;
pub mod edit;
pub mod error;
pub mod format;
pub mod loader;
pub mod parse;
pub mod ratelimit;
pub mod render;
pub mod schema;
pub mod validate;

pub use {
    edit::{Edit, EditError, ModelScope, MoveDirection},
    error::{Error, Result},
    format::DocumentFormat,
    loader::{
        CONFIG_FILENAMES, DOWNLOAD_FILE_NAME, config_dir, discover_and_load, find_config_file,
        find_or_default_config_path, load_config, save_config,
    },
    parse::{ParseError, parse},
    ratelimit::{RateLimit, RateLimitError, RatePeriod, parse_rate_limits},
    render::render,
    schema::{
        ApiKey, ApiKeyPreferences, AutoRetry, Configuration, Credentials, KeySchedule,
        ModelEntry, Preferences, Provider, ProviderKind, ProviderPreferences, ProviderSchedule,
        Role,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_str},
};
