//! Point d'entrée CLI pour crnra-prep

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Préparer les données spatiales du tableau de bord #CRNRAgoal
#[derive(Parser)]
#[command(name = "crnra-prep")]
#[command(author, version)]
#[command(about = "Download the CRNRA trail and river datasets, merge the river and compute trail distances")]
#[command(long_about = "Prepares the spatial data of the #CRNRAgoal dashboard.\n\nWithout a subcommand, downloads both datasets, merges the Chattahoochee River into a single MultiLineString and writes the great-circle length of every trail.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config preset name (crnra) or path to a JSON config
    #[arg(long, default_value = crnra_prep::config::DEFAULT_PRESET, global = true)]
    config: String,

    /// Directory for relative output paths
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Save the run report as JSON
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Sous-commande (défaut: run)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let config = cli::load_config(&cli.config, cli.out_dir.as_deref())?;
    let report = cli.report.as_deref();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!(config = %cli.config, "Running all stages");
            cli::cmd_run(&config, report).await?;
        }
        Commands::Fetch => {
            info!(config = %cli.config, "Downloading datasets");
            cli::cmd_fetch(&config, report).await?;
        }
        Commands::MergeRiver { input, output } => {
            cli::cmd_merge_river(&config, input, output)?;
        }
        Commands::TrailDistances {
            input,
            output,
            segments,
            keep_empty,
            id_property,
            source_crs,
        } => {
            cli::cmd_trail_distances(
                &config,
                input,
                output,
                segments,
                keep_empty,
                id_property,
                source_crs,
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
