//! Link preparation command.

use std::path::{Path, PathBuf};

use console::style;

use placematch::input::write_links_csv;
use placematch::links::{merge_link_files, prepare_links};
use placematch::models::Publisher;

/// Merge raw scraper files, attribute publishers and states, and write the
/// prepared sources CSV.
pub async fn cmd_prepare(files: &[PathBuf], output: &Path) -> anyhow::Result<()> {
    let raw = merge_link_files(files)?;
    if raw.is_empty() {
        println!("{} No links found in the given files", style("!").yellow());
        return Ok(());
    }

    let links = prepare_links(raw);
    write_links_csv(output, &links)?;

    println!(
        "{} Wrote {} links to {}",
        style("✓").green(),
        links.len(),
        output.display()
    );
    for publisher in Publisher::ALL {
        let count = links
            .iter()
            .filter(|l| l.source == publisher.as_str())
            .count();
        if count > 0 {
            println!("  {} {:<20} {}", style("→").dim(), publisher.as_str(), count);
        }
    }

    let stateless = links.iter().filter(|l| l.state_code.is_none()).count();
    if stateless > 0 {
        println!(
            "{} {} links have no state and will not be matched",
            style("!").yellow(),
            stateless
        );
    }

    Ok(())
}
