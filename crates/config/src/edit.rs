//! Form-level edit actions.
//!
//! Every action produces a new [`Configuration`]; the receiver is never
//! mutated. An action that addresses a missing row fails with
//! [`EditError`] and leaves nothing half-applied.

use thiserror::Error;

use crate::schema::{
    ApiKey, ApiKeyPreferences, Configuration, Credentials, ModelEntry, Preferences, Provider,
    ProviderPreferences,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{what} index {index} is out of range (have {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("model name must not be empty")]
    EmptyModelName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Which row a model list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelScope {
    Provider(usize),
    ApiKey(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddProvider,
    RemoveProvider(usize),
    MoveProvider {
        index: usize,
        direction: MoveDirection,
    },
    ReplaceProvider {
        index: usize,
        provider: Box<Provider>,
    },
    /// Switch a provider's credentials between the single and list forms.
    ToggleCredentialList { provider: usize },
    AddCredential { provider: usize },
    SetCredential {
        provider: usize,
        slot: usize,
        value: String,
    },
    RemoveCredential { provider: usize, slot: usize },
    AddModel {
        scope: ModelScope,
        model: String,
        alias: Option<String>,
    },
    RemoveModel { scope: ModelScope, index: usize },
    ReplaceProviderPreferences {
        provider: usize,
        preferences: Option<ProviderPreferences>,
    },
    AddApiKey,
    RemoveApiKey(usize),
    MoveApiKey {
        index: usize,
        direction: MoveDirection,
    },
    ReplaceApiKey { index: usize, api_key: ApiKey },
    ReplaceApiKeyPreferences {
        api_key: usize,
        preferences: Option<ApiKeyPreferences>,
    },
    ReplacePreferences(Preferences),
    SetModelTimeout { model: String, seconds: u64 },
    RemoveModelTimeout { model: String },
    SetKeepaliveInterval { model: String, seconds: u64 },
    RemoveKeepaliveInterval { model: String },
    AddErrorTrigger(String),
    RemoveErrorTrigger(usize),
}

impl Configuration {
    /// Apply one edit action, returning the updated configuration.
    pub fn apply(&self, edit: Edit) -> Result<Configuration, EditError> {
        let mut next = self.clone();
        match edit {
            Edit::AddProvider => next.providers.push(Provider {
                api: Some(Credentials::Single(String::new())),
                ..Provider::default()
            }),
            Edit::RemoveProvider(index) => {
                check(index, next.providers.len(), "provider")?;
                next.providers.remove(index);
            },
            Edit::MoveProvider { index, direction } => {
                move_row(&mut next.providers, index, direction, "provider")?;
            },
            Edit::ReplaceProvider { index, provider } => {
                *row(&mut next.providers, index, "provider")? = *provider;
            },
            Edit::ToggleCredentialList { provider } => {
                let provider = row(&mut next.providers, provider, "provider")?;
                provider.api = Some(toggle_credentials(provider.api.take()));
            },
            Edit::AddCredential { provider } => {
                let provider = row(&mut next.providers, provider, "provider")?;
                let mut keys = match provider.api.take() {
                    Some(Credentials::Multiple(keys)) => keys,
                    Some(Credentials::Single(key)) if !key.is_empty() => vec![key],
                    _ => Vec::new(),
                };
                keys.push(String::new());
                provider.api = Some(Credentials::Multiple(keys));
            },
            Edit::SetCredential {
                provider,
                slot,
                value,
            } => {
                let provider = row(&mut next.providers, provider, "provider")?;
                match &mut provider.api {
                    Some(Credentials::Multiple(keys)) => {
                        *row(keys, slot, "credential")? = value;
                    },
                    api => {
                        check(slot, 1, "credential")?;
                        *api = Some(Credentials::Single(value));
                    },
                }
            },
            Edit::RemoveCredential { provider, slot } => {
                let provider = row(&mut next.providers, provider, "provider")?;
                match &mut provider.api {
                    Some(Credentials::Multiple(keys)) => {
                        check(slot, keys.len(), "credential")?;
                        keys.remove(slot);
                    },
                    api => {
                        let len = usize::from(api.is_some());
                        check(slot, len, "credential")?;
                        *api = None;
                    },
                }
            },
            Edit::AddModel {
                scope,
                model,
                alias,
            } => {
                if model.trim().is_empty() {
                    return Err(EditError::EmptyModelName);
                }
                let entry = ModelEntry::from_input(model.trim(), alias.as_deref().map(str::trim));
                models(&mut next, scope)?.push(entry);
            },
            Edit::RemoveModel { scope, index } => {
                let models = models(&mut next, scope)?;
                check(index, models.len(), "model")?;
                models.remove(index);
            },
            Edit::ReplaceProviderPreferences {
                provider,
                preferences,
            } => {
                row(&mut next.providers, provider, "provider")?.preferences = preferences;
            },
            Edit::AddApiKey => next.api_keys.push(ApiKey::default()),
            Edit::RemoveApiKey(index) => {
                check(index, next.api_keys.len(), "api key")?;
                next.api_keys.remove(index);
            },
            Edit::MoveApiKey { index, direction } => {
                move_row(&mut next.api_keys, index, direction, "api key")?;
            },
            Edit::ReplaceApiKey { index, api_key } => {
                *row(&mut next.api_keys, index, "api key")? = api_key;
            },
            Edit::ReplaceApiKeyPreferences {
                api_key,
                preferences,
            } => {
                row(&mut next.api_keys, api_key, "api key")?.preferences = preferences;
            },
            Edit::ReplacePreferences(preferences) => next.preferences = preferences,
            Edit::SetModelTimeout { model, seconds } => {
                next.preferences.model_timeout.insert(model, seconds);
            },
            Edit::RemoveModelTimeout { model } => {
                next.preferences.model_timeout.shift_remove(&model);
            },
            Edit::SetKeepaliveInterval { model, seconds } => {
                next.preferences.keepalive_interval.insert(model, seconds);
            },
            Edit::RemoveKeepaliveInterval { model } => {
                next.preferences.keepalive_interval.shift_remove(&model);
            },
            Edit::AddErrorTrigger(trigger) => next.preferences.error_triggers.push(trigger),
            Edit::RemoveErrorTrigger(index) => {
                let triggers = &mut next.preferences.error_triggers;
                check(index, triggers.len(), "error trigger")?;
                triggers.remove(index);
            },
        }
        Ok(next)
    }
}

/// List → first entry (or blank); single → one-element list (empty when
/// blank).
fn toggle_credentials(api: Option<Credentials>) -> Credentials {
    match api {
        Some(Credentials::Multiple(keys)) => {
            Credentials::Single(keys.into_iter().next().unwrap_or_default())
        },
        Some(Credentials::Single(key)) if !key.is_empty() => Credentials::Multiple(vec![key]),
        _ => Credentials::Multiple(Vec::new()),
    }
}

fn models(config: &mut Configuration, scope: ModelScope) -> Result<&mut Vec<ModelEntry>, EditError> {
    match scope {
        ModelScope::Provider(index) => Ok(&mut row(&mut config.providers, index, "provider")?.model),
        ModelScope::ApiKey(index) => Ok(&mut row(&mut config.api_keys, index, "api key")?.model),
    }
}

fn check(index: usize, len: usize, what: &'static str) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::OutOfRange { what, index, len })
    }
}

fn row<'a, T>(items: &'a mut [T], index: usize, what: &'static str) -> Result<&'a mut T, EditError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(EditError::OutOfRange { what, index, len })
}

/// Swap with the neighbour; moving past either end does nothing.
fn move_row<T>(
    items: &mut [T],
    index: usize,
    direction: MoveDirection,
    what: &'static str,
) -> Result<(), EditError> {
    check(index, items.len(), what)?;
    match direction {
        MoveDirection::Up if index > 0 => items.swap(index, index - 1),
        MoveDirection::Down if index + 1 < items.len() => items.swap(index, index + 1),
        _ => {},
    }
    Ok(())
}
