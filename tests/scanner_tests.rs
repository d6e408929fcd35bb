//! Integration tests for library scanning.
//!
//! Tests cover:
//! - Source content discovery with parse failures skipped
//! - Destination listing with and without letter folders
//! - Video discovery inside content folders

use media_ingest::core::scanner::{
    destination_contents, source_movies, source_series, videos_in_path,
};
use media_ingest::models::library::{library_mappings, mapping_by_id, IngestConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_for(root: &Path) -> IngestConfig {
    IngestConfig {
        src_root: root.join("src"),
        dst_root: root.join("dst"),
        confirm: false,
        ignore_existing: false,
    }
}

fn setup_roots(config: &IngestConfig) {
    for mapping in library_mappings(config) {
        fs::create_dir_all(&mapping.source.root).unwrap();
        fs::create_dir_all(&mapping.dest.root).unwrap();
    }
}

#[test]
fn test_source_movies_skips_unparseable_folders() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);

    let mapping = mapping_by_id(&config, "movies").unwrap();
    fs::create_dir(mapping.source.root.join("Up (2009)")).unwrap();
    fs::create_dir(mapping.source.root.join("The Matrix (1999)")).unwrap();
    fs::create_dir(mapping.source.root.join("No Year Here")).unwrap();

    let mut skipped = Vec::new();
    let movies = source_movies(&mapping, |folder, _err| {
        skipped.push(folder.to_string());
    })
    .unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(skipped, vec!["No Year Here"]);

    // sorted by letter/destination folder: m/The Matrix before u/Up
    assert_eq!(movies[0].content.src_folder, "The Matrix (1999)");
    assert_eq!(movies[0].content.letter, "m");
    assert_eq!(movies[1].content.src_folder, "Up (2009)");
}

#[test]
fn test_source_series_parses_content() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);

    let mapping = mapping_by_id(&config, "tv").unwrap();
    fs::create_dir(mapping.source.root.join("Firefly (2002)")).unwrap();

    let series = source_series(&mapping, |_f, _e| {}).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].content.year, 2002);
    assert!(series[0].src_seasons.is_empty(), "seasons load on demand");
}

#[test]
fn test_destination_contents_with_letter_folders() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);

    let mapping = mapping_by_id(&config, "movies").unwrap();
    fs::create_dir_all(mapping.dest.root.join("u").join("Up (2009)")).unwrap();
    fs::create_dir_all(mapping.dest.root.join("m").join("The Matrix (1999)")).unwrap();

    let contents = destination_contents(&mapping.dest, |_f, _e| {}).unwrap();
    assert_eq!(contents.len(), 2);
    let names: Vec<&str> = contents
        .iter()
        .map(|(c, _)| c.src_folder.as_str())
        .collect();
    assert!(names.contains(&"Up (2009)"));
    assert!(names.contains(&"The Matrix (1999)"));
}

#[test]
fn test_destination_contents_flat_library() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);

    let mapping = mapping_by_id(&config, "documentary").unwrap();
    fs::create_dir(mapping.dest.root.join("Home (2009)")).unwrap();

    let contents = destination_contents(&mapping.dest, |_f, _e| {}).unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].0.src_folder, "Home (2009)");
}

#[test]
fn test_videos_in_path_finds_only_videos() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("movie.mkv"), b"fake video").unwrap();
    fs::write(temp.path().join("movie.en.srt"), b"subs").unwrap();
    fs::write(temp.path().join("movie.nfo"), b"meta").unwrap();

    let videos = videos_in_path(temp.path()).unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].ext, ".mkv");
    assert_eq!(videos[0].size_bytes, 10);
}

#[test]
fn test_videos_in_path_missing_folder_is_an_error() {
    assert!(videos_in_path(Path::new("/nonexistent/path")).is_err());
}
