//! `gatecfg edit`: round-trip the configuration through a text editor.

use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use {
    anyhow::{Context, Result, bail},
    gatecfg_config::{
        Configuration, DocumentFormat, find_or_default_config_path, load_config, save_config,
    },
    gatecfg_sync::{CommitOutcome, Notice, SyncController, SyncListener},
    tracing::{debug, info},
};

/// Prints rejected-text notices for the user.
struct StderrNotices;

impl SyncListener for StderrNotices {
    fn notice(&self, notice: &Notice) {
        eprintln!("{notice}");
    }
}

pub fn edit(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(find_or_default_config_path);
    let format = DocumentFormat::from_path(&path)?;
    let config = if path.exists() {
        load_config(&path)?
    } else {
        Configuration::new_session()
    };

    let mut controller = SyncController::new(config, format)?;
    controller.subscribe(Arc::new(StderrNotices));

    let mut scratch = tempfile::Builder::new()
        .prefix("api-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()
        .context("failed to create scratch file")?;
    scratch.write_all(controller.text().as_bytes())?;
    scratch.flush()?;

    run_editor(&editor_command(), scratch.path())?;

    let edited = std::fs::read_to_string(scratch.path())
        .with_context(|| format!("failed to read {}", scratch.path().display()))?;
    if edited == controller.text() {
        eprintln!("No changes.");
        return Ok(());
    }

    controller.edit_text(edited);
    match controller.commit()? {
        CommitOutcome::Applied | CommitOutcome::Unchanged => {},
        CommitOutcome::Reverted(_) => bail!("{} left unchanged", path.display()),
    }

    save_config(&controller.config(), &path)?;
    info!(path = %path.display(), "saved edited configuration");
    eprintln!("Saved {}", path.display());
    Ok(())
}

/// `$VISUAL`, then `$EDITOR`, then `vi`.
fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".into())
}

/// Split an editor setting such as `code --wait` into program and arguments.
fn split_editor(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn run_editor(command: &str, file: &Path) -> Result<()> {
    let Some((program, args)) = split_editor(command) else {
        bail!("no editor configured");
    };
    debug!(program, file = %file.display(), "launching editor");
    let status = Command::new(program)
        .args(args)
        .arg(file)
        .status()
        .with_context(|| format!("failed to launch editor `{program}`"))?;
    if !status.success() {
        bail!("editor `{program}` exited with {status}");
    }
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_editor_with_arguments() {
        assert_eq!(
            split_editor("code --wait"),
            Some(("code", vec!["--wait"]))
        );
        assert_eq!(split_editor("vim"), Some(("vim", vec![])));
        assert_eq!(split_editor("   "), None);
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_is_reported() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let err = run_editor("false", temp.path()).unwrap_err();
        assert!(err.to_string().contains("exited with"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn noop_editor_succeeds() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        run_editor("true", temp.path()).unwrap();
    }
}
