//! Error plumbing shared by the gatecfg crates.

pub mod error;

pub use error::FromMessage;
