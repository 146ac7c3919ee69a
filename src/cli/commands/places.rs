//! Place management commands.

use std::path::Path;

use console::style;

use placematch::config::Settings;
use placematch::input::read_places_csv;
use placematch::repository::PlaceRepository;

/// Import canonical places from a CSV into the database.
pub async fn cmd_places_import(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let places = read_places_csv(file)?;
    if places.is_empty() {
        println!("{} No places found in {}", style("!").yellow(), file.display());
        return Ok(());
    }

    let unnamed = places.iter().filter(|p| p.place_name.is_none()).count();
    let counties = places.iter().filter(|p| p.is_county()).count();

    let repo = PlaceRepository::new(&settings.database_path())?;
    let saved = repo.save_all(&places)?;

    println!(
        "{} Imported {} places ({} cities, {} counties)",
        style("✓").green(),
        saved,
        places.len() - counties,
        counties
    );
    if unnamed > 0 {
        println!(
            "{} {} places have no name and will fail to match",
            style("!").yellow(),
            unnamed
        );
    }

    Ok(())
}

/// Show how many places are stored.
pub async fn cmd_places_count(settings: &Settings) -> anyhow::Result<()> {
    if !settings.database_exists() {
        println!(
            "{} No database found. Run 'placematch init' first.",
            style("!").yellow()
        );
        return Ok(());
    }

    let repo = PlaceRepository::new(&settings.database_path())?;
    println!("{} places stored", repo.count()?);

    Ok(())
}
