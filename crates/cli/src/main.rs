mod config_commands;
mod edit_command;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    gatecfg_config::DocumentFormat,
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "gatecfg",
    about = "gatecfg: build api.yaml for multi-provider API gateways"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info", env = "GATECFG_LOG_LEVEL")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new configuration with the session defaults.
    Init {
        /// Target file (default: ./api.yaml).
        path: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the canonical rendering of a configuration file.
    Render {
        /// Config file (default: discovered api.yaml/api.yml/api.json).
        path: Option<PathBuf>,
        /// Output format: yaml or json (default: the file's own format).
        #[arg(long, value_name = "FORMAT")]
        to: Option<DocumentFormat>,
    },
    /// Convert a configuration between YAML and JSON.
    Convert {
        input: PathBuf,
        /// Target file (default: INPUT with the other format's extension).
        output: Option<PathBuf>,
    },
    /// Validate a configuration file and report errors/warnings.
    Check {
        path: Option<PathBuf>,
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Open the configuration in $VISUAL / $EDITOR and apply the result.
    Edit { path: Option<PathBuf> },
}

/// Initialise tracing. Logs go to stderr so rendered documents on stdout
/// stay clean.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "gatecfg starting");

    match cli.command {
        Commands::Init { path, force } => config_commands::init(path, force),
        Commands::Render { path, to } => {
            print!("{}", config_commands::render_file(path, to)?);
            Ok(())
        },
        Commands::Convert { input, output } => {
            config_commands::convert(&input, output.as_deref())
        },
        Commands::Check { path, verbose } => config_commands::check(path, verbose),
        Commands::Edit { path } => edit_command::edit(path),
    }
}
