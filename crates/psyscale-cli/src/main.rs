use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use psyscale_catalog::DirectoryCatalog;

mod commands;
mod config;
mod state;

use commands::OutputFormat;
use config::LogFormat;
use state::Catalogs;

#[derive(Parser)]
#[command(name = "psyscale", version, about = "Validate and score psychometric scales")]
struct Cli {
    /// Directory of scale definitions, consulted before the built-in scales.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available scales
    List,
    /// Show one scale's definition
    Show { id: String },
    /// Check a scale definition for structural errors
    Validate {
        id: Option<String>,
        /// Validate a definition file instead of a catalog entry
        #[arg(long, conflicts_with = "id")]
        file: Option<PathBuf>,
    },
    /// Score a JSON array of responses against a scale
    Score { id: String, responses: PathBuf },
}

fn main() -> eyre::Result<ExitCode> {
    let cli = Cli::parse();
    let config = config::load_config()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
    // The subscriber's format comes from the config, so a migration that ran
    // while loading it is reported here.
    if let Some(from) = config.migrated_from {
        tracing::info!(from, to = config.config_version, "config migrated");
    }

    let directory = match cli.catalog.or(config.catalog_dir) {
        Some(root) => Some(DirectoryCatalog::open(root)?),
        None => None,
    };
    let catalogs = Catalogs::new(directory)?;

    let (output, ok) = match &cli.command {
        Command::List => (commands::list(&catalogs, cli.format)?, true),
        Command::Show { id } => (commands::show(&catalogs, id, cli.format)?, true),
        Command::Validate { id, file } => {
            commands::validate(&catalogs, id.as_deref(), file.as_deref(), cli.format)?
        }
        Command::Score { id, responses } => {
            (commands::score(&catalogs, id, responses, cli.format)?, true)
        }
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
