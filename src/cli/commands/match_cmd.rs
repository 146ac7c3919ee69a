//! Match command.

use std::path::Path;

use console::style;

use placematch::config::Settings;
use placematch::input::{read_links_csv, read_places_csv};
use placematch::matcher::{
    persist, CsvPartitionWriter, Matcher, MatcherError, Partition, Partitions, TracingReporter,
};
use placematch::repository::{PlaceRepository, SourceAssignmentRepository};
use placematch::wide;

use crate::cli::helpers::spinner;

/// Match places to source links, write the diagnostic CSVs, and optionally
/// store the usable matches.
pub async fn cmd_match(
    settings: &Settings,
    sources: &Path,
    places: Option<&Path>,
    output_dir: Option<&Path>,
    store: bool,
) -> anyhow::Result<()> {
    let links = read_links_csv(sources)?;
    let places = match places {
        Some(path) => read_places_csv(path)?,
        None => {
            if !settings.database_exists() {
                println!(
                    "{} No database found. Run 'placematch init' and 'placematch places import' first.",
                    style("!").yellow()
                );
                return Ok(());
            }
            PlaceRepository::new(&settings.database_path())?.get_all()?
        }
    };

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.output_dir.clone());

    let pb = spinner(format!(
        "Matching {} places against {} links...",
        places.len(),
        links.len()
    ));

    let writer_dir = output_dir.clone();
    let run = tokio::task::spawn_blocking(move || -> Result<_, MatcherError> {
        let reporter = TracingReporter;
        let matcher = Matcher::new(links, places, &reporter)?;
        let outcome = matcher.compute()?;
        let partitions = Partitions::from_outcome(&outcome);
        let report = persist(&partitions, &CsvPartitionWriter::new(writer_dir), &reporter);
        Ok((partitions, report))
    })
    .await?;
    pb.finish_and_clear();

    let (partitions, report) = match run {
        Ok(done) => done,
        Err(e) => {
            println!("{} Matching failed: {}", style("✗").red(), e);
            return Err(e.into());
        }
    };

    println!("\n{}", style("Match results").bold());
    println!("{}", "-".repeat(40));
    for partition in Partition::ALL {
        println!("{:<20} {:>8}", partition.as_str(), partitions.len(partition));
    }
    println!("{}", "-".repeat(40));

    for (partition, path) in &report.written {
        println!(
            "  {} {} -> {}",
            style("✓").green(),
            partition.file_name(),
            path.display()
        );
    }
    for (partition, reason) in &report.failed {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            partition.file_name(),
            reason
        );
    }

    let usable = partitions.usable();
    println!(
        "{} {} usable matches; diagnostics in {}",
        style("✓").green(),
        usable.len(),
        output_dir.display()
    );

    if store {
        settings.ensure_directories()?;
        let rows = wide::pivot(&usable);
        let repo = SourceAssignmentRepository::new(&settings.database_path())?;
        let stored = repo.upsert_all(&rows)?;
        println!(
            "{} Stored {} places in the sources table",
            style("✓").green(),
            stored
        );
    }

    Ok(())
}
