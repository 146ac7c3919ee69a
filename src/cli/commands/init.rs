//! Initialize command.

use console::style;

use placematch::config::Settings;
use placematch::repository::{PlaceRepository, SourceAssignmentRepository};

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let db_path = settings.database_path();
    let place_repo = PlaceRepository::new(&db_path)?;
    SourceAssignmentRepository::new(&db_path)?;

    let places = place_repo.count()?;
    if places == 0 {
        println!("{} No places stored yet", style("!").yellow());
        println!("  Run 'placematch places import <csv>' to load them");
    } else {
        println!("  {} {} places already stored", style("→").dim(), places);
    }

    println!(
        "{} Initialized placematch in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
