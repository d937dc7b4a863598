use std::{fmt, sync::Arc};

use gatecfg_config::{Configuration, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Committed text did not parse.
    ParseFailed,
    /// A format switch was refused because the text did not parse.
    FormatSwitchRejected,
}

/// What happened to the text buffer when a notice was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferDisposition {
    /// Restored to the last clean rendering.
    Reverted,
    /// Left as typed so the user can fix it.
    Kept,
}

/// A user-visible report of rejected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub buffer: BufferDisposition,
}

impl Notice {
    pub(crate) fn parse_failed(error: &ParseError) -> Self {
        Self {
            kind: NoticeKind::ParseFailed,
            message: error.to_string(),
            buffer: BufferDisposition::Reverted,
        }
    }

    pub(crate) fn switch_rejected(error: &ParseError) -> Self {
        Self {
            kind: NoticeKind::FormatSwitchRejected,
            message: error.to_string(),
            buffer: BufferDisposition::Kept,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            NoticeKind::ParseFailed => "changes discarded",
            NoticeKind::FormatSwitchRejected => "format not switched",
        };
        write!(f, "{what}: {}", self.message)
    }
}

/// Observer of controller events. Both callbacks default to no-ops.
pub trait SyncListener: Send + Sync {
    /// A new configuration replaced the previous one.
    fn config_replaced(&self, _config: &Arc<Configuration>) {}

    fn notice(&self, _notice: &Notice) {}
}
