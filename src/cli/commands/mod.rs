//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod init;
mod match_cmd;
mod places;
mod prepare;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use placematch::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "placematch")]
#[command(about = "Link scraped municipal-code URLs to canonical U.S. places")]
#[command(version)]
pub struct Cli {
    /// Data directory holding placematch.db (overrides config file)
    #[arg(long, short = 'd', global = true)]
    data: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Manage canonical places
    Places {
        #[command(subcommand)]
        command: PlacesCommands,
    },

    /// Merge raw scraper output into a prepared sources file
    Prepare {
        /// Raw scraper CSV files (url,href,text[,source])
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Where to write the prepared sources CSV
        #[arg(short, long, default_value = "sources.csv")]
        output: PathBuf,
    },

    /// Match places to source links and write diagnostic CSVs
    Match {
        /// Prepared sources CSV (url,href,text,source,state_code)
        #[arg(short, long)]
        sources: PathBuf,
        /// Places CSV (defaults to places stored in the database)
        #[arg(short, long)]
        places: Option<PathBuf>,
        /// Directory for diagnostic CSVs (defaults to <data>/output)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Store usable matches in the sources table
        #[arg(long)]
        store: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum PlacesCommands {
    /// Import places from a CSV (gnis,place_name,class_code,state_code)
    Import {
        /// CSV file to import
        file: PathBuf,
    },
    /// Show how many places are stored
    Count,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved settings and where they came from
    Show,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
        data: cli.data,
    };
    let (settings, config) = load_settings_with_options(&options).await?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Places { command } => match command {
            PlacesCommands::Import { file } => places::cmd_places_import(&settings, &file).await,
            PlacesCommands::Count => places::cmd_places_count(&settings).await,
        },
        Commands::Prepare { files, output } => prepare::cmd_prepare(&files, &output).await,
        Commands::Match {
            sources,
            places,
            output_dir,
            store,
        } => {
            match_cmd::cmd_match(
                &settings,
                &sources,
                places.as_deref(),
                output_dir.as_deref(),
                store,
            )
            .await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&settings, &config).await,
        },
    }
}
