use std::{fmt, sync::Arc};

use {
    gatecfg_config::{
        Configuration, DOWNLOAD_FILE_NAME, DocumentFormat, Edit, ParseError, parse, render,
    },
    tracing::{debug, info, warn},
};

use crate::{
    error::Result,
    notice::{Notice, SyncListener},
};

/// Whether the text buffer still matches the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Clean,
    /// The buffer holds keystrokes that have not been committed.
    Dirty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing to commit.
    Unchanged,
    Applied,
    /// The text did not parse and the buffer was restored.
    Reverted(ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Already in the requested format.
    Unchanged,
    Switched,
    /// The text did not parse; format and buffer are unchanged.
    Rejected(ParseError),
}

/// A downloadable rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Owns the configuration and its text view.
///
/// The configuration is replaced, never mutated: readers hold an
/// `Arc<Configuration>` snapshot that stays valid across updates.
pub struct SyncController {
    config: Arc<Configuration>,
    format: DocumentFormat,
    text: String,
    clean_text: String,
    state: EditState,
    listeners: Vec<Arc<dyn SyncListener>>,
}

impl SyncController {
    pub fn new(config: Configuration, format: DocumentFormat) -> Result<Self> {
        let text = render(&config, format)?;
        Ok(Self {
            config: Arc::new(config),
            format,
            clean_text: text.clone(),
            text,
            state: EditState::Clean,
            listeners: Vec::new(),
        })
    }

    /// A controller for a new editing session, in YAML.
    pub fn new_session() -> Result<Self> {
        Self::new(Configuration::new_session(), DocumentFormat::Yaml)
    }

    pub fn subscribe(&mut self, listener: Arc<dyn SyncListener>) {
        self.listeners.push(listener);
    }

    #[must_use]
    pub fn config(&self) -> Arc<Configuration> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    #[must_use]
    pub fn state(&self) -> EditState {
        self.state
    }

    /// Current buffer contents, committed or not.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Install a configuration built by a form.
    ///
    /// Uncommitted text is discarded.
    pub fn replace_config(&mut self, config: Configuration) -> Result<()> {
        if self.state == EditState::Dirty {
            debug!("discarding uncommitted text for form update");
        }
        self.install(Arc::new(config))
    }

    /// Apply a form edit to the current configuration.
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        let next = self.config.apply(edit)?;
        self.replace_config(next)
    }

    /// Record a keystroke. The configuration is untouched until [`commit`].
    ///
    /// [`commit`]: Self::commit
    pub fn edit_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.state = EditState::Dirty;
    }

    /// Parse pending text into the configuration.
    ///
    /// Unparseable text is thrown away: the buffer goes back to the last
    /// clean rendering and listeners get a notice.
    pub fn commit(&mut self) -> Result<CommitOutcome> {
        if self.state == EditState::Clean {
            return Ok(CommitOutcome::Unchanged);
        }
        match parse(&self.text, self.format) {
            Ok(config) => {
                self.install(Arc::new(config))?;
                Ok(CommitOutcome::Applied)
            },
            Err(error) => {
                warn!(format = %self.format, %error, "reverting unparseable text");
                self.text.clone_from(&self.clean_text);
                self.state = EditState::Clean;
                self.notify(&Notice::parse_failed(&error));
                Ok(CommitOutcome::Reverted(error))
            },
        }
    }

    /// Switch the text view to `format`, carrying pending edits over.
    ///
    /// Pending text that does not parse blocks the switch and is kept for
    /// the user to fix.
    pub fn switch_format(&mut self, format: DocumentFormat) -> Result<SwitchOutcome> {
        if format == self.format {
            return Ok(SwitchOutcome::Unchanged);
        }
        let config = match self.state {
            EditState::Clean => Arc::clone(&self.config),
            EditState::Dirty => match parse(&self.text, self.format) {
                Ok(config) => Arc::new(config),
                Err(error) => {
                    warn!(from = %self.format, to = %format, %error, "format switch rejected");
                    self.notify(&Notice::switch_rejected(&error));
                    return Ok(SwitchOutcome::Rejected(error));
                },
            },
        };
        let text = render(&config, format)?;
        let replaced = !Arc::ptr_eq(&config, &self.config);
        info!(from = %self.format, to = %format, "switched text format");
        self.format = format;
        self.config = config;
        self.clean_text.clone_from(&text);
        self.text = text;
        self.state = EditState::Clean;
        if replaced {
            self.broadcast();
        }
        Ok(SwitchOutcome::Switched)
    }

    /// Fresh rendering of the configuration in the current format, for the
    /// clipboard. Pending text is not included.
    pub fn export(&self) -> Result<String> {
        Ok(render(&self.config, self.format)?)
    }

    /// The `api.yaml` artifact, always YAML whatever the current format.
    pub fn download(&self) -> Result<Artifact> {
        let format = DocumentFormat::Yaml;
        Ok(Artifact {
            file_name: DOWNLOAD_FILE_NAME,
            mime_type: format.mime_type(),
            contents: render(&self.config, format)?,
        })
    }

    fn install(&mut self, config: Arc<Configuration>) -> Result<()> {
        let text = render(&config, self.format)?;
        self.config = config;
        self.clean_text.clone_from(&text);
        self.text = text;
        self.state = EditState::Clean;
        debug!(
            providers = self.config.providers.len(),
            api_keys = self.config.api_keys.len(),
            "configuration replaced"
        );
        self.broadcast();
        Ok(())
    }

    fn broadcast(&self) {
        for listener in &self.listeners {
            listener.config_replaced(&self.config);
        }
    }

    fn notify(&self, notice: &Notice) {
        for listener in &self.listeners {
            listener.notice(notice);
        }
    }
}

impl fmt::Debug for SyncController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncController")
            .field("format", &self.format)
            .field("state", &self.state)
            .field("providers", &self.config.providers.len())
            .field("api_keys", &self.config.api_keys.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
