//! Configuration management commands.

use console::style;

use placematch::config::{Config, Settings};

/// Print the resolved settings and the config file they came from.
pub async fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => println!("{} Config file: {}", style("→").cyan(), path.display()),
        None => println!("{} No config file found, using defaults", style("!").yellow()),
    }

    println!("\n{}", style("Settings").bold());
    println!("{}", "-".repeat(60));
    println!("{:<12} {}", "Data dir", settings.data_dir.display());
    println!("{:<12} {}", "Database", settings.database_path().display());
    println!("{:<12} {}", "Output dir", settings.output_dir.display());

    if config.source_path.is_some() {
        println!("\n{}", style("File contents").bold());
        println!("{}", "-".repeat(60));
        println!("{}", serde_json::to_string_pretty(config)?);
    }

    Ok(())
}
