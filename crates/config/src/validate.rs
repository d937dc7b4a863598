//! Diagnostics for gateway configuration documents.
//!
//! Checks `api.yaml` / `api.json` text against the known schema, reports
//! keys the parser would silently drop (with "did you mean" hints), and
//! flags values the gateway would reject or misuse at runtime.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use {serde_json::Value, tracing::debug};

use crate::{
    format::DocumentFormat,
    parse::{from_value, parse_value},
    ratelimit::{RateLimit, parse_rate_limits},
    schema::{Configuration, KNOWN_PROVIDERS, ProviderKind},
};

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// One finding, anchored at a document path.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "type-error", "unknown-field", "unknown-provider",
    /// "rate-limit", "credentials", "provider-fields", "model-scope",
    /// "file-ref"
    pub category: &'static str,
    /// Path into the document, e.g. "providers[0].api[1]"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration document.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Whether the document would fail to load.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Known keys ──────────────────────────────────────────────────────────────

/// Represents the expected shape of the document.
enum KnownKeys {
    /// Fixed field names, as on `Provider`.
    Struct(HashMap<&'static str, KnownKeys>),
    /// A map keyed by model name or header name.
    Map(Box<KnownKeys>),
    /// An array of typed items.
    Array(Box<KnownKeys>),
    /// Anything not walked further.
    Leaf,
}

/// Every key `render` can emit, arranged as the document nests them.
fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Array, Leaf, Map, Struct};

    let provider_preferences = Struct(HashMap::from([
        ("api_key_rate_limit", Leaf),
        ("api_key_cooldown_period", Leaf),
        ("api_key_schedule_algorithm", Leaf),
        ("model_timeout", Map(Box::new(Leaf))),
        ("keepalive_interval", Map(Box::new(Leaf))),
        ("proxy", Leaf),
        ("headers", Map(Box::new(Leaf))),
    ]));

    let provider = Struct(HashMap::from([
        ("provider", Leaf),
        ("base_url", Leaf),
        ("api", Leaf),
        ("model", Leaf),
        ("tools", Leaf),
        ("project_id", Leaf),
        ("private_key", Leaf),
        ("client_email", Leaf),
        ("cf_account_id", Leaf),
        ("notes", Leaf),
        ("engine", Leaf),
        ("preferences", provider_preferences),
    ]));

    let api_key = Struct(HashMap::from([
        ("api", Leaf),
        ("model", Leaf),
        ("role", Leaf),
        (
            "preferences",
            Struct(HashMap::from([
                ("SCHEDULING_ALGORITHM", Leaf),
                ("AUTO_RETRY", Leaf),
                ("rate_limit", Leaf),
                ("ENABLE_MODERATION", Leaf),
            ])),
        ),
    ]));

    let preferences = Struct(HashMap::from([
        ("model_timeout", Map(Box::new(Leaf))),
        ("cooldown_period", Leaf),
        ("rate_limit", Leaf),
        ("keepalive_interval", Map(Box::new(Leaf))),
        ("error_triggers", Leaf),
        ("proxy", Leaf),
    ]));

    Struct(HashMap::from([
        ("providers", Array(Box::new(provider))),
        ("api_keys", Array(Box::new(api_key))),
        ("preferences", preferences),
    ]))
}

// ── Suggestions ─────────────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb {
                0
            } else {
                1
            };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest candidate within `max_distance` edits, ignoring exact matches.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for &candidate in candidates {
        let d = levenshtein(needle, candidate);
        if d > 0 && d <= max_distance && best.as_ref().is_none_or(|(_, bd)| d < *bd) {
            best = Some((candidate, d));
        }
    }
    best.map(|(s, _)| s)
}

// ── Entry points ────────────────────────────────────────────────────────────

/// Check the file at `path`, or the discovered `api.yaml` when `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = if let Some(p) = path {
        Some(p.to_path_buf())
    } else {
        crate::loader::find_config_file()
    };

    let Some(ref actual_path) = config_path else {
        return ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Info,
                "file-ref",
                "",
                "no config file found; a new session starts from defaults",
            )],
            config_path: None,
        };
    };

    let format = match DocumentFormat::from_path(actual_path) {
        Ok(format) => format,
        Err(e) => {
            return ValidationResult {
                diagnostics: vec![Diagnostic::new(
                    Severity::Error,
                    "file-ref",
                    "",
                    e.to_string(),
                )],
                config_path: Some(actual_path.clone()),
            };
        },
    };

    match std::fs::read_to_string(actual_path) {
        Ok(content) => {
            let mut result = validate_str(&content, format);
            result.config_path = Some(actual_path.clone());
            result
        },
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("failed to read config file: {e}"),
            )],
            config_path: Some(actual_path.clone()),
        },
    }
}

/// Validate document text without touching the file system.
#[must_use]
pub fn validate_str(text: &str, format: DocumentFormat) -> ValidationResult {
    let mut diagnostics = Vec::new();

    // 1. Syntax
    let value = match parse_value(text, format) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                e.to_string(),
            ));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    // 2. Unknown fields: walk the value tree against KnownKeys
    let schema = build_schema_map();
    check_unknown_fields(&value, &schema, "", &mut diagnostics);

    // 3. Structure: the same path the parser takes
    let config = match from_value(value) {
        Ok(config) => config,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "type-error",
                "",
                e.to_string(),
            ));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    // 4. Semantic checks on the parsed configuration
    check_provider_kinds(&config, &mut diagnostics);
    check_provider_fields(&config, &mut diagnostics);
    check_credentials(&config, &mut diagnostics);
    check_rate_limits(&config, &mut diagnostics);
    check_model_scopes(&config, &mut diagnostics);

    debug!(
        %format,
        errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count(),
        total = diagnostics.len(),
        "validated configuration"
    );

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Walk the value tree against the schema tree and flag unknown keys.
fn check_unknown_fields(
    value: &Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match (value, schema) {
        (Value::Object(object), KnownKeys::Struct(fields)) => {
            let mut known_keys: Vec<&str> = fields.keys().copied().collect();
            known_keys.sort_unstable();
            for (key, child_value) in object {
                let path = child_path(prefix, key);
                if let Some(child_schema) = fields.get(key.as_str()) {
                    check_unknown_fields(child_value, child_schema, &path, diagnostics);
                } else {
                    let level = if prefix.is_empty() {
                        "at top level "
                    } else {
                        ""
                    };
                    let msg = if let Some(s) = suggest(key, &known_keys, 3) {
                        format!("unknown field {level}is ignored (did you mean \"{s}\"?)")
                    } else {
                        format!("unknown field {level}is ignored")
                    };
                    diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        "unknown-field",
                        path,
                        msg,
                    ));
                }
            }
        },
        (Value::Object(object), KnownKeys::Map(value_schema)) => {
            for (key, child_value) in object {
                let path = child_path(prefix, key);
                check_unknown_fields(child_value, value_schema, &path, diagnostics);
            }
        },
        (Value::Array(items), KnownKeys::Array(item_schema)) => {
            for (i, item) in items.iter().enumerate() {
                let path = format!("{prefix}[{i}]");
                check_unknown_fields(item, item_schema, &path, diagnostics);
            }
        },
        // scalars and shape mismatches are the type pass's job
        _ => {},
    }
}

/// Hint at provider types that look like typos of a built-in one.
fn check_provider_kinds(config: &Configuration, diagnostics: &mut Vec<Diagnostic>) {
    for (i, provider) in config.providers.iter().enumerate() {
        let ProviderKind::Custom(name) = &provider.provider else {
            continue;
        };
        let path = format!("providers[{i}].provider");
        if name.is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "provider-fields",
                path,
                "provider type is empty",
            ));
            continue;
        }
        let lower = name.to_ascii_lowercase();
        let hint = KNOWN_PROVIDERS
            .iter()
            .copied()
            .find(|known| *known == lower)
            .or_else(|| suggest(&lower, KNOWN_PROVIDERS, 2));
        if let Some(s) = hint {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "unknown-provider",
                path,
                format!("unknown provider type (did you mean \"{s}\"?)"),
            ));
        } else {
            diagnostics.push(Diagnostic::new(
                Severity::Info,
                "unknown-provider",
                path,
                "custom provider type; the gateway treats it as OpenAI-compatible",
            ));
        }
    }
}

fn check_provider_fields(config: &Configuration, diagnostics: &mut Vec<Diagnostic>) {
    for (i, provider) in config.providers.iter().enumerate() {
        if provider.base_url.trim().is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "provider-fields",
                format!("providers[{i}].base_url"),
                "base_url is empty",
            ));
        }

        let required: Vec<(&str, &Option<String>)> = match provider.provider {
            ProviderKind::Vertex => vec![
                ("project_id", &provider.project_id),
                ("private_key", &provider.private_key),
                ("client_email", &provider.client_email),
            ],
            ProviderKind::Cloudflare => vec![("cf_account_id", &provider.cf_account_id)],
            _ => Vec::new(),
        };
        for (field, value) in required {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                diagnostics.push(Diagnostic::new(
                    Severity::Warning,
                    "provider-fields",
                    format!("providers[{i}].{field}"),
                    format!("{} providers need `{field}`", provider.provider),
                ));
            }
        }
    }
}

fn check_credentials(config: &Configuration, diagnostics: &mut Vec<Diagnostic>) {
    for (i, provider) in config.providers.iter().enumerate() {
        let keys: Vec<&str> = provider.credential_keys().collect();
        if keys.iter().all(|k| k.trim().is_empty()) {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "credentials",
                format!("providers[{i}].api"),
                "provider has no credentials",
            ));
            continue;
        }
        if provider.api.as_ref().is_some_and(|api| api.is_list()) {
            for (j, key) in keys.iter().enumerate() {
                if key.trim().is_empty() {
                    diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        "credentials",
                        format!("providers[{i}].api[{j}]"),
                        "blank credential in list",
                    ));
                }
            }
        }
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, key) in config.api_keys.iter().enumerate() {
        let path = format!("api_keys[{i}].api");
        if key.api.trim().is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "credentials",
                path,
                "API key is blank",
            ));
        } else if let Some(first) = seen.get(key.api.as_str()) {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "credentials",
                path,
                format!("duplicate of api_keys[{first}].api"),
            ));
        } else {
            seen.insert(&key.api, i);
        }
    }
}

fn check_rate_limits(config: &Configuration, diagnostics: &mut Vec<Diagnostic>) {
    let mut limits: Vec<(String, &str)> = Vec::new();
    if !config.preferences.rate_limit.is_empty() {
        limits.push((
            "preferences.rate_limit".into(),
            config.preferences.rate_limit.as_str(),
        ));
    }
    for (i, provider) in config.providers.iter().enumerate() {
        if let Some(limit) = provider
            .preferences
            .as_ref()
            .and_then(|p| p.api_key_rate_limit.as_deref())
            .filter(|s| !s.is_empty())
        {
            limits.push((
                format!("providers[{i}].preferences.api_key_rate_limit"),
                limit,
            ));
        }
    }
    for (i, key) in config.api_keys.iter().enumerate() {
        if let Some(limit) = key
            .preferences
            .as_ref()
            .and_then(|p| p.rate_limit.as_deref())
            .filter(|s| !s.is_empty())
        {
            limits.push((format!("api_keys[{i}].preferences.rate_limit"), limit));
        }
    }

    for (path, limit) in limits {
        match parse_rate_limits(limit) {
            Ok(parsed) => check_shadowed_limits(&parsed, &path, diagnostics),
            Err(e) => diagnostics.push(Diagnostic::new(
                Severity::Error,
                "rate-limit",
                path,
                e.to_string(),
            )),
        }
    }
}

/// A limit over a short window never binds when a longer window allows no
/// more requests in total.
fn check_shadowed_limits(limits: &[RateLimit], path: &str, diagnostics: &mut Vec<Diagnostic>) {
    for short in limits {
        let stricter = limits.iter().find(|long| {
            long.period.seconds() > short.period.seconds() && long.count <= short.count
        });
        if let Some(long) = stricter {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "rate-limit",
                path,
                format!("`{short}` never applies: `{long}` is at least as strict"),
            ));
        }
    }
}

/// API keys scoped to models no provider serves can never be used.
fn check_model_scopes(config: &Configuration, diagnostics: &mut Vec<Diagnostic>) {
    let catalog = config.model_catalog();
    let catalog: HashSet<&str> = catalog.iter().map(String::as_str).collect();
    for (i, key) in config.api_keys.iter().enumerate() {
        for (j, entry) in key.model.iter().enumerate() {
            if !catalog.contains(entry.model()) {
                diagnostics.push(Diagnostic::new(
                    Severity::Warning,
                    "model-scope",
                    format!("api_keys[{i}].model[{j}]"),
                    format!("no provider serves model \"{}\"", entry.model()),
                ));
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {indexmap::IndexMap, rstest::rstest};

    use super::*;
    use crate::schema::{
        ApiKey, ApiKeyPreferences, AutoRetry, Credentials, KeySchedule, ModelEntry, Preferences,
        Provider, ProviderPreferences, ProviderSchedule, Role,
    };

    fn yaml(text: &str) -> ValidationResult {
        validate_str(text, DocumentFormat::Yaml)
    }

    fn find<'a>(result: &'a ValidationResult, category: &str, path: &str) -> &'a Diagnostic {
        result
            .diagnostics
            .iter()
            .find(|d| d.category == category && d.path == path)
            .unwrap_or_else(|| {
                panic!(
                    "expected {category} diagnostic at {path}, got: {:?}",
                    result.diagnostics
                )
            })
    }

    #[test]
    fn levenshtein_identical() {
        assert_eq!(levenshtein("openai", "openai"), 0);
    }

    #[test]
    fn levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", ""), 0);
    }

    #[rstest]
    #[case("base_url", "base_ur", 1)]
    #[case("gemini", "gemeni", 1)]
    #[case("apiKeys", "api_keys", 2)]
    #[case("modèle", "model", 2)]
    fn levenshtein_edits(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
    }

    #[test]
    fn suggest_finds_close_match() {
        let candidates = &["providers", "api_keys", "preferences"];
        assert_eq!(suggest("apiKeys", candidates, 3), Some("api_keys"));
        assert_eq!(suggest("provders", candidates, 3), Some("providers"));
        assert_eq!(suggest("xxxxxxxxx", candidates, 3), None);
    }

    #[test]
    fn empty_document_is_valid() {
        let result = yaml("");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn camel_case_api_keys_warned_with_suggestion() {
        let result = yaml("apiKeys:\n  - api: sk-x\n");
        let d = find(&result, "unknown-field", "apiKeys");
        assert_eq!(d.severity, Severity::Warning);
        assert!(d.message.contains("\"api_keys\""), "{}", d.message);
        assert!(!result.has_errors());
    }

    #[test]
    fn unknown_nested_key_with_suggestion() {
        let text = "\
providers:
  - provider: openai
    base_url: https://api.openai.com/v1
    api: sk-a
    preferences:
      api_key_rate_limt: 15/min
";
        let result = yaml(text);
        let d = find(
            &result,
            "unknown-field",
            "providers[0].preferences.api_key_rate_limt",
        );
        assert!(d.message.contains("api_key_rate_limit"));
    }

    #[test]
    fn model_timeout_keys_are_free_form() {
        let text = "preferences:\n  model_timeout:\n    gpt-4o: 10\n    default: 30\n";
        let result = yaml(text);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn syntax_error_stops_validation() {
        let result = yaml("providers: [,,,");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].category, "syntax");
        assert!(result.has_errors());
    }

    #[test]
    fn type_error_reported() {
        let result = yaml("preferences:\n  cooldown_period: soon\n");
        let d = find(&result, "type-error", "");
        assert_eq!(d.severity, Severity::Error);
    }

    #[test]
    fn misspelled_provider_type_warned() {
        let text = "providers:\n  - provider: antropic\n    base_url: https://x\n    api: k\n";
        let result = yaml(text);
        let d = find(&result, "unknown-provider", "providers[0].provider");
        assert_eq!(d.severity, Severity::Warning);
        assert!(d.message.contains("anthropic"));
    }

    #[test]
    fn custom_provider_type_is_informational() {
        let text = "providers:\n  - provider: my-local-llm\n    base_url: http://localhost:8000\n    api: k\n";
        let result = yaml(text);
        let d = find(&result, "unknown-provider", "providers[0].provider");
        assert_eq!(d.severity, Severity::Info);
    }

    #[test]
    fn vertex_requires_service_account_fields() {
        let text = "\
providers:
  - provider: vertex
    base_url: https://us-east5-aiplatform.googleapis.com
    project_id: my-project
    api: unused
";
        let result = yaml(text);
        find(&result, "provider-fields", "providers[0].private_key");
        find(&result, "provider-fields", "providers[0].client_email");
        assert!(
            !result
                .diagnostics
                .iter()
                .any(|d| d.path == "providers[0].project_id")
        );
    }

    #[test]
    fn cloudflare_requires_account_id() {
        let text = "providers:\n  - provider: cloudflare\n    base_url: https://x\n    api: k\n";
        let result = yaml(text);
        find(&result, "provider-fields", "providers[0].cf_account_id");
    }

    #[test]
    fn credential_problems() {
        let text = "\
providers:
  - provider: openai
    base_url: https://api.openai.com/v1
  - provider: groq
    base_url: https://api.groq.com/openai/v1
    api:
      - gsk-1
      - ''
api_keys:
  - api: sk-gw
  - api: ''
  - api: sk-gw
";
        let result = yaml(text);
        find(&result, "credentials", "providers[0].api");
        find(&result, "credentials", "providers[1].api[1]");
        find(&result, "credentials", "api_keys[1].api");
        let dup = find(&result, "credentials", "api_keys[2].api");
        assert!(dup.message.contains("api_keys[0]"));
    }

    #[rstest]
    #[case("preferences:\n  rate_limit: 15/fortnight\n", "preferences.rate_limit")]
    #[case(
        "api_keys:\n  - api: sk\n    preferences:\n      rate_limit: 0/min\n",
        "api_keys[0].preferences.rate_limit"
    )]
    #[case(
        "providers:\n  - provider: openai\n    base_url: u\n    api: k\n    preferences:\n      api_key_rate_limit: lots\n",
        "providers[0].preferences.api_key_rate_limit"
    )]
    fn malformed_rate_limits_are_errors(#[case] text: &str, #[case] path: &str) {
        let result = yaml(text);
        let d = find(&result, "rate-limit", path);
        assert_eq!(d.severity, Severity::Error);
    }

    #[test]
    fn shorter_window_under_a_stricter_longer_one_is_flagged() {
        let result = yaml("preferences:\n  rate_limit: 100/min,50/hour\n");
        let d = find(&result, "rate-limit", "preferences.rate_limit");
        assert_eq!(d.severity, Severity::Warning);
        assert!(d.message.contains("`100/min` never applies"), "{}", d.message);

        let result = yaml("preferences:\n  rate_limit: 15/min,100/day\n");
        assert!(
            !result.diagnostics.iter().any(|d| d.category == "rate-limit"),
            "{:?}",
            result.diagnostics
        );
    }

    #[test]
    fn model_scope_checked_against_catalog() {
        let text = "\
providers:
  - provider: anthropic
    base_url: https://api.anthropic.com/v1/messages
    api: sk-ant
    model:
      - claude-3-5-sonnet: claude35
api_keys:
  - api: sk-gw
    model:
      - claude35
      - anthropic/*
      - gpt-4o
";
        let result = yaml(text);
        let scope: Vec<&str> = result
            .diagnostics
            .iter()
            .filter(|d| d.category == "model-scope")
            .map(|d| d.path.as_str())
            .collect();
        assert_eq!(scope, ["api_keys[0].model[2]"]);
    }

    #[test]
    fn json_documents_are_validated_too() {
        let result = validate_str(r#"{"preferences": {"proxi": "socks5://x"}}"#, DocumentFormat::Json);
        let d = find(&result, "unknown-field", "preferences.proxi");
        assert!(d.message.contains("proxy"));
    }

    #[test]
    fn validate_reads_file_and_tags_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        std::fs::write(&path, "providers: [,,,").unwrap();
        let result = validate(Some(&path));
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
        assert!(result.has_errors());
    }

    #[test]
    fn validate_rejects_unknown_extension() {
        let result = validate(Some(Path::new("api.toml")));
        assert_eq!(result.diagnostics[0].category, "file-ref");
        assert!(result.has_errors());
    }

    /// Every key a fully populated configuration serializes must be known to
    /// `build_schema_map()`, or valid documents would be flagged.
    #[test]
    fn schema_drift_guard() {
        let config = Configuration {
            providers: vec![Provider {
                project_id: Some("p".into()),
                private_key: Some("k".into()),
                client_email: Some("e".into()),
                cf_account_id: Some("c".into()),
                notes: Some("n".into()),
                engine: Some("e".into()),
                preferences: Some(ProviderPreferences {
                    api_key_rate_limit: Some("1/s".into()),
                    api_key_cooldown_period: Some(5),
                    api_key_schedule_algorithm: Some(ProviderSchedule::Random),
                    model_timeout: IndexMap::from([("m".into(), 1)]),
                    keepalive_interval: IndexMap::from([("m".into(), 1)]),
                    proxy: Some("http://proxy".into()),
                    headers: IndexMap::from([("X-Test".into(), "1".into())]),
                }),
                ..Provider::new("vertex", "https://x")
                    .with_credentials(Credentials::Multiple(vec!["a".into()]))
                    .with_models([ModelEntry::alias("m", "a")])
            }],
            api_keys: vec![ApiKey {
                model: vec![ModelEntry::name("m")],
                role: Some(Role::User),
                preferences: Some(ApiKeyPreferences {
                    scheduling_algorithm: Some(KeySchedule::Lottery),
                    auto_retry: Some(AutoRetry::Attempts(3)),
                    rate_limit: Some("1/s".into()),
                    enable_moderation: Some(true),
                }),
                ..ApiKey::new("sk")
            }],
            preferences: Preferences {
                model_timeout: IndexMap::from([("m".into(), 1)]),
                keepalive_interval: IndexMap::from([("m".into(), 1)]),
                error_triggers: vec!["t".into()],
                proxy: "http://proxy".into(),
                ..Preferences::session_defaults()
            },
        };
        let value = serde_json::to_value(&config).expect("serialize full config");
        let mut missing = Vec::new();
        collect_missing_keys(&value, &build_schema_map(), "", &mut missing);
        assert!(
            missing.is_empty(),
            "schema map is missing keys present in a full Configuration: {missing:?}\n\
             Update build_schema_map() in validate.rs to include these fields."
        );
    }

    /// Paths in `value` that `schema` does not list.
    fn collect_missing_keys(
        value: &Value,
        schema: &KnownKeys,
        prefix: &str,
        missing: &mut Vec<String>,
    ) {
        match (value, schema) {
            (Value::Object(object), KnownKeys::Struct(fields)) => {
                for (key, child_value) in object {
                    let path = child_path(prefix, key);
                    if let Some(child_schema) = fields.get(key.as_str()) {
                        collect_missing_keys(child_value, child_schema, &path, missing);
                    } else {
                        missing.push(path);
                    }
                }
            },
            (Value::Object(object), KnownKeys::Map(value_schema)) => {
                for (key, child_value) in object {
                    let path = child_path(prefix, key);
                    collect_missing_keys(child_value, value_schema, &path, missing);
                }
            },
            (Value::Array(items), KnownKeys::Array(item_schema)) => {
                for (i, item) in items.iter().enumerate() {
                    let path = format!("{prefix}[{i}]");
                    collect_missing_keys(item, item_schema, &path, missing);
                }
            },
            _ => {},
        }
    }
}
