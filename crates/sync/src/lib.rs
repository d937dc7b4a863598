//! Keeps a [`Configuration`](gatecfg_config::Configuration) and its
//! editable text rendering in step.
//!
//! Forms push whole new configurations through [`SyncController`]; the text
//! view pushes keystrokes and commits them when it loses focus. Text that
//! does not parse never reaches the configuration.

pub mod controller;
pub mod error;
pub mod notice;

pub use {
    controller::{Artifact, CommitOutcome, EditState, SwitchOutcome, SyncController},
    error::{Error, Result},
    notice::{BufferDisposition, Notice, NoticeKind, SyncListener},
};
