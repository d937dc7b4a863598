use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result, bail},
    gatecfg_config::{
        Configuration, DOWNLOAD_FILE_NAME, DocumentFormat, find_config_file, load_config, render,
        save_config,
        validate::{self, Severity},
    },
    gatecfg_sync::{CommitOutcome, SwitchOutcome, SyncController},
    tracing::info,
};

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// The explicit path, or the first discovered config file.
pub fn resolve_existing(path: Option<PathBuf>) -> Result<PathBuf> {
    match path.or_else(find_config_file) {
        Some(path) => Ok(path),
        None => bail!("no config file found (looked for api.yaml, api.yml, api.json)"),
    }
}

pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DOWNLOAD_FILE_NAME));
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_config(&Configuration::new_session(), &path)?;
    info!(path = %path.display(), "initialised configuration");
    eprintln!("Wrote {}", path.display());
    Ok(())
}

pub fn render_file(path: Option<PathBuf>, to: Option<DocumentFormat>) -> Result<String> {
    let path = resolve_existing(path)?;
    let config = load_config(&path)?;
    let format = match to {
        Some(format) => format,
        None => DocumentFormat::from_path(&path)?,
    };
    Ok(render(&config, format)?)
}

/// Read `input`, carry it into `output`'s format through a controller, and
/// write the result. Without `output`, the input is written next to itself
/// in the other format.
pub fn convert(input: &Path, output: Option<&Path>) -> Result<()> {
    let from = DocumentFormat::from_path(input)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(from.toggled().extension()),
    };
    let output = output.as_path();
    let to = DocumentFormat::from_path(output)?;
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let mut controller = SyncController::new(Configuration::default(), from)?;
    controller.edit_text(raw);
    match controller.switch_format(to)? {
        SwitchOutcome::Switched => {},
        SwitchOutcome::Rejected(error) => bail!("{}: {error}", input.display()),
        SwitchOutcome::Unchanged => {
            if let CommitOutcome::Reverted(error) = controller.commit()? {
                bail!("{}: {error}", input.display());
            }
        },
    }

    save_config(&controller.config(), output)?;
    info!(input = %input.display(), output = %output.display(), %from, %to, "converted");
    eprintln!("Wrote {} ({to})", output.display());
    Ok(())
}

pub fn check(path: Option<PathBuf>, verbose: bool) -> Result<()> {
    let result = validate::validate(path.as_deref());

    // Print which file we're checking
    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found.\n");
    }

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
            Severity::Info => (CYAN, "info"),
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{label}{RESET} {}", d.message);
        } else {
            eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
