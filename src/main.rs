use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use console::style;
use ratescope::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ratescope::AppCommand {
    fn from(cmd: Commands) -> ratescope::AppCommand {
        match cmd {
            Commands::Currencies => ratescope::AppCommand::Currencies,
            Commands::Rates { currency, from, to } => {
                ratescope::AppCommand::Rates { currency, from, to }
            }
            Commands::Chart {
                currency,
                from,
                to,
                output,
            } => ratescope::AppCommand::Chart {
                currency,
                from,
                to,
                output,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List currency codes reported by the exchange rate service
    Currencies,
    /// Print exchange rates for a currency over a date range
    Rates {
        /// Currency code, e.g. USD
        currency: String,
        /// Start date (YYYY-MM-DD), defaults to 30 days before the end date
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to yesterday
        #[arg(long)]
        to: Option<String>,
    },
    /// Render an SVG chart of exchange rates over a date range
    Chart {
        /// Currency code, e.g. USD
        currency: String,
        /// Start date (YYYY-MM-DD), defaults to 30 days before the end date
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to yesterday
        #[arg(long)]
        to: Option<String>,
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => ratescope::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    if let Err(error) = result {
        // Full detail (upstream status, response body, source chain) stays in
        // the logs; the terminal line is the user-facing phrasing only.
        tracing::error!(error = ?error, "Application failed");
        eprintln!("{}", style(format!("Error: {error}")).red());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn setup() -> Result<()> {
    use anyhow::Context;

    let path = ratescope::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# All settings are optional; the values below are the built-in defaults.
providers:
  nbp:
    base_url: "https://api.nbp.pl"

# Longest request window in calendar days (the NBP API caps queries at 93).
max_range_days: 93

# Remote request timeout in seconds.
request_timeout_secs: 60

# Where the rate cache lives; defaults to the platform data directory.
#data_path: "/var/lib/ratescope"

# Default chart output path used when --output is not given.
#chart_path: "rates.svg"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    println!("Created default configuration at {}", path.display());
    Ok(())
}
