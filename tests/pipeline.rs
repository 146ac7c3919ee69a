//! Raw scraper output through preparation, matching and storage.

use std::fs;
use std::path::Path;

use placematch::input::{read_links_csv, read_places_csv, write_links_csv};
use placematch::links::{merge_link_files, prepare_links};
use placematch::matcher::{Matcher, MemoryPartitionWriter, Partition, RecordingReporter};
use placematch::repository::{PlaceRepository, SourceAssignmentRepository};
use placematch::wide::pivot;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn raw_links_to_stored_sources() {
    let dir = tempfile::tempdir().unwrap();

    let municode = write(
        dir.path(),
        "municode.csv",
        "url,href,text\n\
         https://library.municode.com/al,/al/coker,Coker\n\
         https://library.municode.com/wy,/wy/pinedale,Pinedale\n",
    );
    let amlegal = write(
        dir.path(),
        "amlegal.csv",
        "url,href,text,source\n\
         https://codelibrary.amlegal.com/regions/wy,https://codelibrary.amlegal.com/regions/wy/codes/pinedale,Pinedale,\n",
    );
    let places_csv = write(
        dir.path(),
        "places.csv",
        "gnis,place_name,class_code,state_code\n\
         1,Town of Coker,C1,AL\n\
         2,Town of Pinedale,C1,WY\n\
         3,Sublette County,H1,WY\n",
    );

    // Missing files are skipped
    let raw = merge_link_files(&[
        municode,
        amlegal,
        dir.path().join("code_publishing.csv"),
    ])
    .unwrap();
    assert_eq!(raw.len(), 3);

    let prepared = prepare_links(raw);
    let sources_csv = dir.path().join("sources.csv");
    write_links_csv(&sources_csv, &prepared).unwrap();

    let links = read_links_csv(&sources_csv).unwrap();
    assert_eq!(links, prepared);
    assert_eq!(links[0].href.as_deref(), Some("https://library.municode.com/al/coker"));
    assert_eq!(links[2].source, "american_legal");
    assert_eq!(links[2].state_code.as_deref(), Some("WY"));

    // Places go through the database
    let db_path = dir.path().join("data").join("placematch.db");
    let place_repo = PlaceRepository::new(&db_path).unwrap();
    place_repo
        .save_all(&read_places_csv(&places_csv).unwrap())
        .unwrap();
    let places = place_repo.get_all().unwrap();
    assert_eq!(places.len(), 3);

    let reporter = RecordingReporter::new();
    let writer = MemoryPartitionWriter::new();
    let usable = Matcher::new(links, places, &reporter)
        .unwrap()
        .match_places(&writer)
        .unwrap();
    assert_eq!(usable.len(), 2);
    assert_eq!(writer.table(Partition::Unmatched).unwrap().rows.len(), 1);
    assert_eq!(writer.table(Partition::MultipleSources).unwrap().rows.len(), 1);

    let rows = pivot(&usable);
    let repo = SourceAssignmentRepository::new(&db_path).unwrap();
    assert_eq!(repo.upsert_all(&rows).unwrap(), 2);
    assert_eq!(repo.count().unwrap(), 2);

    let pinedale = repo.get(2).unwrap().unwrap();
    assert_eq!(
        pinedale.source_municode.as_deref(),
        Some("https://library.municode.com/wy/pinedale")
    );
    assert_eq!(
        pinedale.source_american_legal.as_deref(),
        Some("https://codelibrary.amlegal.com/codes/pinedale")
    );
    assert_eq!(pinedale.source_general_code, None);

    let coker = repo.get(1).unwrap().unwrap();
    assert_eq!(coker.place_name, "Town of Coker");
    assert!(repo.get(3).unwrap().is_none());
}
