//! Configuration schema for the gateway's `api.yaml`.
//!
//! Field declaration order is the emission order of the serializer, so the
//! struct layouts below are part of the document contract.

use std::fmt;

use {
    indexmap::{IndexMap, IndexSet},
    serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{self, MapAccess, SeqAccess, Visitor},
        ser::SerializeMap,
    },
};

use crate::de::{ScalarString, null_as_default, scalar_string};

/// Channel cooldown seeded into a new editing session.
pub const DEFAULT_COOLDOWN_SECS: u64 = 300;

/// Global rate limit seeded into a new editing session.
pub const DEFAULT_RATE_LIMIT: &str = "999999/min";

/// Provider identifiers the gateway knows natively.
pub const KNOWN_PROVIDERS: &[&str] = &[
    "openai",
    "anthropic",
    "gemini",
    "vertex",
    "azure",
    "xai",
    "cohere",
    "groq",
    "cloudflare",
    "openrouter",
];

// ── Model entries ───────────────────────────────────────────────────────────

/// A model a provider serves, or a key is scoped to.
///
/// On the wire either a bare string or a single-entry `model: alias` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelEntry {
    Name(String),
    Alias { model: String, alias: String },
}

impl ModelEntry {
    pub fn name(model: impl Into<String>) -> Self {
        Self::Name(model.into())
    }

    pub fn alias(model: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Alias {
            model: model.into(),
            alias: alias.into(),
        }
    }

    /// Build an entry from form input. A blank alias yields a bare name.
    pub fn from_input(model: impl Into<String>, alias: Option<&str>) -> Self {
        match alias.map(str::trim).filter(|a| !a.is_empty()) {
            Some(alias) => Self::alias(model, alias),
            None => Self::name(model),
        }
    }

    /// The canonical upstream model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::Name(model) | Self::Alias { model, .. } => model,
        }
    }

    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Alias { alias, .. } => Some(alias),
        }
    }
}

impl fmt::Display for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(model) => f.write_str(model),
            Self::Alias { model, alias } => write!(f, "{model} → {alias}"),
        }
    }
}

impl Serialize for ModelEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Name(model) => serializer.serialize_str(model),
            Self::Alias { model, alias } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(model, alias)?;
                map.end()
            },
        }
    }
}

impl<'de> Deserialize<'de> for ModelEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ModelEntryVisitor)
    }
}

struct ModelEntryVisitor;

impl<'de> Visitor<'de> for ModelEntryVisitor {
    type Value = ModelEntry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a model name or a single `model: alias` mapping")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ModelEntry::name(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ModelEntry::Name(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ModelEntry::Name(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ModelEntry::Name(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ModelEntry::Name(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ModelEntry::Name(v.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some((ScalarString(model), ScalarString(alias))) =
            map.next_entry::<ScalarString, ScalarString>()?
        else {
            return Err(de::Error::custom("model entry mapping is empty"));
        };
        if let Some(ScalarString(extra)) = map.next_key::<ScalarString>()? {
            return Err(de::Error::custom(format!(
                "model entry `{model}` has more than one key (also `{extra}`); \
                 expected a single `model: alias` pair"
            )));
        }
        Ok(ModelEntry::Alias { model, alias })
    }
}

// ── Credentials ─────────────────────────────────────────────────────────────

/// Upstream credentials of a provider.
///
/// The list form enables per-key rotation under the provider's
/// `api_key_schedule_algorithm`. An empty list is the same as no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    Single(String),
    Multiple(Vec<String>),
}

impl Credentials {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(key) => key.is_empty(),
            Self::Multiple(keys) => keys.is_empty(),
        }
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let keys: &[String] = match self {
            Self::Single(key) => std::slice::from_ref(key),
            Self::Multiple(keys) => keys,
        };
        keys.iter().map(String::as_str)
    }
}

impl From<&str> for Credentials {
    fn from(key: &str) -> Self {
        Self::Single(key.to_owned())
    }
}

impl From<Vec<String>> for Credentials {
    fn from(keys: Vec<String>) -> Self {
        Self::Multiple(keys)
    }
}

impl<'de> Deserialize<'de> for Credentials {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CredentialsVisitor)
    }
}

struct CredentialsVisitor;

impl<'de> Visitor<'de> for CredentialsVisitor {
    type Value = Credentials;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a credential string or a list of credential strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Credentials::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Credentials::Single(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Credentials::Single(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Credentials::Single(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Credentials::Single(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Credentials::Single(v.to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut keys = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(ScalarString(key)) = seq.next_element::<ScalarString>()? {
            keys.push(key);
        }
        Ok(Credentials::Multiple(keys))
    }
}

// ── Enumerations ────────────────────────────────────────────────────────────

/// Provider type. Anything outside [`KNOWN_PROVIDERS`] is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Vertex,
    Azure,
    Xai,
    Cohere,
    Groq,
    Cloudflare,
    OpenRouter,
    Custom(String),
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Vertex => "vertex",
            Self::Azure => "azure",
            Self::Xai => "xai",
            Self::Cohere => "cohere",
            Self::Groq => "groq",
            Self::Cloudflare => "cloudflare",
            Self::OpenRouter => "openrouter",
            Self::Custom(name) => name,
        }
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Custom(String::new())
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProviderKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "openai" => Self::OpenAi,
            "anthropic" => Self::Anthropic,
            "gemini" => Self::Gemini,
            "vertex" => Self::Vertex,
            "azure" => Self::Azure,
            "xai" => Self::Xai,
            "cohere" => Self::Cohere,
            "groq" => Self::Groq,
            "cloudflare" => Self::Cloudflare,
            "openrouter" => Self::OpenRouter,
            _ => Self::Custom(name),
        }
    }
}

impl From<&str> for ProviderKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<ProviderKind> for String {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Custom(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

/// How a provider rotates through its own credential list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSchedule {
    #[default]
    RoundRobin,
    Random,
    FixedPriority,
}

/// How the gateway picks a provider for a request made with an API key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySchedule {
    #[default]
    FixedPriority,
    RoundRobin,
    WeightedRoundRobin,
    Lottery,
    Random,
}

/// Retry policy of an API key: on/off or an explicit attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoRetry {
    Enabled(bool),
    Attempts(u32),
}

impl AutoRetry {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        match self {
            Self::Enabled(enabled) => enabled,
            Self::Attempts(n) => n > 0,
        }
    }
}

impl Default for AutoRetry {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

// ── Providers ───────────────────────────────────────────────────────────────

/// Per-provider overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPreferences {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub api_key_rate_limit: Option<String>,
    /// Seconds a failing credential is benched. Zero means unset.
    #[serde(default, skip_serializing_if = "is_unset_secs")]
    pub api_key_cooldown_period: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_schedule_algorithm: Option<ProviderSchedule>,
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub model_timeout: IndexMap<String, u64>,
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub keepalive_interval: IndexMap<String, u64>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub proxy: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub headers: IndexMap<String, String>,
}

impl ProviderPreferences {
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            api_key_rate_limit: non_blank(&self.api_key_rate_limit),
            api_key_cooldown_period: self.api_key_cooldown_period.filter(|secs| *secs > 0),
            api_key_schedule_algorithm: self.api_key_schedule_algorithm,
            model_timeout: self.model_timeout.clone(),
            keepalive_interval: self.keepalive_interval.clone(),
            proxy: non_blank(&self.proxy),
            headers: self.headers.clone(),
        }
    }

    /// `true` when nothing in the block would be emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }
}

/// One upstream provider. Position in [`Configuration::providers`] is its
/// priority under `fixed_priority` scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default, deserialize_with = "null_as_default")]
    pub provider: ProviderKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "credentials_absent")]
    pub api: Option<Credentials>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub model: Vec<ModelEntry>,
    /// Always emitted: `false` is a meaningful state.
    #[serde(default = "default_true")]
    pub tools: bool,
    /// Vertex AI project.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub project_id: Option<String>,
    /// Vertex AI service-account private key.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub private_key: Option<String>,
    /// Vertex AI service-account email.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub client_email: Option<String>,
    /// Cloudflare Workers AI account.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub cf_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub notes: Option<String>,
    /// Execution engine hint for OpenAI-compatible upstreams.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "provider_preferences_absent")]
    pub preferences: Option<ProviderPreferences>,
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: String::new(),
            api: None,
            model: Vec::new(),
            tools: true,
            project_id: None,
            private_key: None,
            client_email: None,
            cf_account_id: None,
            notes: None,
            engine: None,
            preferences: None,
        }
    }
}

impl Provider {
    pub fn new(provider: impl Into<ProviderKind>, base_url: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, api: impl Into<Credentials>) -> Self {
        self.api = Some(api.into());
        self
    }

    #[must_use]
    pub fn with_models(mut self, models: impl IntoIterator<Item = ModelEntry>) -> Self {
        self.model = models.into_iter().collect();
        self
    }

    /// Credential strings in order; empty when none are set.
    pub fn credential_keys(&self) -> impl Iterator<Item = &str> {
        self.api.iter().flat_map(Credentials::keys)
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            base_url: self.base_url.clone(),
            api: self.api.clone().filter(|api| !api.is_empty()),
            model: self.model.clone(),
            tools: self.tools,
            project_id: non_blank(&self.project_id),
            private_key: non_blank(&self.private_key),
            client_email: non_blank(&self.client_email),
            cf_account_id: non_blank(&self.cf_account_id),
            notes: non_blank(&self.notes),
            engine: non_blank(&self.engine),
            preferences: self
                .preferences
                .as_ref()
                .map(ProviderPreferences::normalized)
                .filter(|p| *p != ProviderPreferences::default()),
        }
    }
}

// ── API keys ────────────────────────────────────────────────────────────────

/// Per-key gateway behaviour. Unset fields fall back to the gateway defaults
/// exposed by the `effective_*` accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyPreferences {
    #[serde(
        rename = "SCHEDULING_ALGORITHM",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduling_algorithm: Option<KeySchedule>,
    #[serde(rename = "AUTO_RETRY", default, skip_serializing_if = "Option::is_none")]
    pub auto_retry: Option<AutoRetry>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub rate_limit: Option<String>,
    #[serde(
        rename = "ENABLE_MODERATION",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_moderation: Option<bool>,
}

impl ApiKeyPreferences {
    #[must_use]
    pub fn effective_scheduling_algorithm(&self) -> KeySchedule {
        self.scheduling_algorithm.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_auto_retry(&self) -> AutoRetry {
        self.auto_retry.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_moderation(&self) -> bool {
        self.enable_moderation.unwrap_or(false)
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            rate_limit: non_blank(&self.rate_limit),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }
}

/// A credential handed to gateway clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(default, deserialize_with = "scalar_string")]
    pub api: String,
    /// Models this key may use. Empty means all models.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub model: Vec<ModelEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "api_key_preferences_absent")]
    pub preferences: Option<ApiKeyPreferences>,
}

impl ApiKey {
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            api: self.api.clone(),
            model: self.model.clone(),
            role: self.role,
            preferences: self
                .preferences
                .as_ref()
                .map(ApiKeyPreferences::normalized)
                .filter(|p| *p != ApiKeyPreferences::default()),
        }
    }
}

// ── Global preferences ──────────────────────────────────────────────────────

/// Gateway-wide settings. The default value is empty; see
/// [`Preferences::session_defaults`] for the values a new session starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub model_timeout: IndexMap<String, u64>,
    /// Seconds a failing channel is benched. Zero means unset.
    #[serde(
        default,
        skip_serializing_if = "is_zero",
        deserialize_with = "null_as_default"
    )]
    pub cooldown_period: u64,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub rate_limit: String,
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub keepalive_interval: IndexMap<String, u64>,
    /// A response containing any of these substrings counts as a failure.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub error_triggers: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub proxy: String,
}

impl Preferences {
    #[must_use]
    pub fn session_defaults() -> Self {
        Self {
            cooldown_period: DEFAULT_COOLDOWN_SECS,
            rate_limit: DEFAULT_RATE_LIMIT.into(),
            ..Self::default()
        }
    }
}

// ── Root ────────────────────────────────────────────────────────────────────

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, deserialize_with = "null_as_default")]
    pub providers: Vec<Provider>,
    /// Serialized as `api_keys`. The camel-case `apiKeys` spelling is not read.
    #[serde(rename = "api_keys", default, deserialize_with = "null_as_default")]
    pub api_keys: Vec<ApiKey>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferences: Preferences,
}

impl Configuration {
    /// The configuration a new editing session starts from.
    #[must_use]
    pub fn new_session() -> Self {
        Self {
            preferences: Preferences::session_defaults(),
            ..Self::default()
        }
    }

    /// Map every unset-equivalent value to its canonical absent form.
    ///
    /// This is what a render/parse round trip yields.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            providers: self.providers.iter().map(Provider::normalized).collect(),
            api_keys: self.api_keys.iter().map(ApiKey::normalized).collect(),
            preferences: self.preferences.clone(),
        }
    }

    /// Equality up to omission of unset values.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }

    /// Model identifiers an API key may be scoped to, in first-seen order.
    ///
    /// Every provider contributes `<provider>/*`, and each of its models
    /// contributes the model name and alias, bare and provider-prefixed.
    #[must_use]
    pub fn model_catalog(&self) -> Vec<String> {
        let mut catalog = IndexSet::new();
        for provider in &self.providers {
            let prefix = provider.provider.as_str();
            catalog.insert(format!("{prefix}/*"));
            for entry in &provider.model {
                catalog.insert(entry.model().to_owned());
                catalog.insert(format!("{prefix}/{}", entry.model()));
                if let Some(alias) = entry.alias_name() {
                    catalog.insert(alias.to_owned());
                    catalog.insert(format!("{prefix}/{alias}"));
                }
            }
        }
        catalog.into_iter().collect()
    }
}

// ── Serde predicates ────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn is_unset_secs(value: &Option<u64>) -> bool {
    value.is_none_or(|secs| secs == 0)
}

fn credentials_absent(value: &Option<Credentials>) -> bool {
    value.as_ref().is_none_or(Credentials::is_empty)
}

fn provider_preferences_absent(value: &Option<ProviderPreferences>) -> bool {
    value.as_ref().is_none_or(ProviderPreferences::is_empty)
}

fn api_key_preferences_absent(value: &Option<ApiKeyPreferences>) -> bool {
    value.as_ref().is_none_or(ApiKeyPreferences::is_empty)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_entry_reads_bare_name_and_alias() {
        let entries: Vec<ModelEntry> =
            serde_json::from_str(r#"["gpt-4o", {"claude-3-5-sonnet": "claude35"}]"#).unwrap();
        assert_eq!(entries, vec![
            ModelEntry::name("gpt-4o"),
            ModelEntry::alias("claude-3-5-sonnet", "claude35"),
        ]);
    }

    #[test]
    fn model_entry_rejects_multiple_keys() {
        let err = serde_json::from_str::<ModelEntry>(r#"{"a": "x", "b": "y"}"#).unwrap_err();
        assert!(err.to_string().contains("more than one key"), "{err}");
    }

    #[test]
    fn model_entry_rejects_empty_mapping() {
        let err = serde_json::from_str::<ModelEntry>("{}").unwrap_err();
        assert!(err.to_string().contains("mapping is empty"), "{err}");
    }

    #[test]
    fn model_entry_from_input_drops_blank_alias() {
        assert_eq!(
            ModelEntry::from_input("gpt-4o", Some("  ")),
            ModelEntry::name("gpt-4o")
        );
        assert_eq!(
            ModelEntry::from_input("gpt-4o", Some("4o")),
            ModelEntry::alias("gpt-4o", "4o")
        );
    }

    #[test]
    fn credentials_accept_numbers() {
        let single: Credentials = serde_json::from_str("12345").unwrap();
        assert_eq!(single, Credentials::from("12345"));
        let list: Credentials = serde_json::from_str(r#"["sk-a", 42]"#).unwrap();
        assert_eq!(
            list,
            Credentials::Multiple(vec!["sk-a".into(), "42".into()])
        );
    }

    #[test]
    fn provider_kind_keeps_custom_names() {
        assert_eq!(ProviderKind::from("openai"), ProviderKind::OpenAi);
        assert_eq!(
            ProviderKind::from("my-proxy"),
            ProviderKind::Custom("my-proxy".into())
        );
        assert_eq!(String::from(ProviderKind::OpenRouter), "openrouter");
    }

    #[test]
    fn every_known_provider_round_trips_through_its_name() {
        for name in KNOWN_PROVIDERS {
            let kind = ProviderKind::from(*name);
            assert!(!kind.is_custom(), "{name} should be a known provider");
            assert_eq!(kind.as_str(), *name);
        }
    }

    #[test]
    fn empty_credentials_normalize_to_absent() {
        let provider = Provider::new("openai", "https://api.openai.com/v1")
            .with_credentials(Vec::<String>::new());
        assert_eq!(provider.normalized().api, None);
    }

    #[test]
    fn zero_cooldown_preferences_are_empty() {
        let prefs = ProviderPreferences {
            api_key_cooldown_period: Some(0),
            proxy: Some(String::new()),
            ..ProviderPreferences::default()
        };
        assert!(prefs.is_empty());
    }

    #[test]
    fn explicit_false_moderation_is_not_empty() {
        let prefs = ApiKeyPreferences {
            enable_moderation: Some(false),
            ..ApiKeyPreferences::default()
        };
        assert!(!prefs.is_empty());
        assert!(!prefs.effective_moderation());
    }

    #[test]
    fn api_key_preference_defaults() {
        let prefs = ApiKeyPreferences::default();
        assert_eq!(
            prefs.effective_scheduling_algorithm(),
            KeySchedule::FixedPriority
        );
        assert_eq!(prefs.effective_auto_retry(), AutoRetry::Enabled(true));
        assert!(AutoRetry::Attempts(3).is_enabled());
        assert!(!AutoRetry::Attempts(0).is_enabled());
    }

    #[test]
    fn auto_retry_reads_flag_or_count() {
        let flag: AutoRetry = serde_json::from_str("false").unwrap();
        assert_eq!(flag, AutoRetry::Enabled(false));
        let count: AutoRetry = serde_json::from_str("3").unwrap();
        assert_eq!(count, AutoRetry::Attempts(3));
    }

    #[test]
    fn session_defaults_seed_cooldown_and_rate_limit() {
        let config = Configuration::new_session();
        assert_eq!(config.preferences.cooldown_period, DEFAULT_COOLDOWN_SECS);
        assert_eq!(config.preferences.rate_limit, DEFAULT_RATE_LIMIT);
        assert_eq!(Configuration::default().preferences, Preferences::default());
    }

    #[test]
    fn model_catalog_lists_names_aliases_and_wildcards() {
        let config = Configuration {
            providers: vec![
                Provider::new("openai", "https://api.openai.com/v1").with_models([
                    ModelEntry::name("gpt-4o"),
                    ModelEntry::alias("gpt-4o-mini", "mini"),
                ]),
                Provider::new("groq", "https://api.groq.com/openai/v1")
                    .with_models([ModelEntry::name("gpt-4o")]),
            ],
            ..Configuration::default()
        };
        assert_eq!(config.model_catalog(), vec![
            "openai/*",
            "gpt-4o",
            "openai/gpt-4o",
            "gpt-4o-mini",
            "openai/gpt-4o-mini",
            "mini",
            "openai/mini",
            "groq/*",
            "groq/gpt-4o",
        ]);
    }
}
