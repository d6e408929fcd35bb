//! End-to-end import scenarios over real temp directories.
//!
//! The prompter is scripted, the command runner is real: mv/rm/rmdir run
//! against tempdirs, so these tests assert on the resulting trees.

use media_ingest::cli::commands::{movies, series};
use media_ingest::models::library::{library_mappings, mapping_by_id, IngestConfig};
use media_ingest::services::prompt::Prompter;
use media_ingest::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct ScriptedPrompter {
    keys: RefCell<VecDeque<char>>,
}

impl ScriptedPrompter {
    fn new(keys: &str) -> Self {
        ScriptedPrompter {
            keys: RefCell::new(keys.chars().collect()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, options: &[char]) -> Result<char> {
        loop {
            let c = self
                .keys
                .borrow_mut()
                .pop_front()
                .expect("prompt script exhausted");
            if options.contains(&c) {
                return Ok(c);
            }
        }
    }

    fn confirm(&self) -> Result<bool> {
        loop {
            match self
                .keys
                .borrow_mut()
                .pop_front()
                .expect("prompt script exhausted")
            {
                'y' | 'Y' => return Ok(true),
                'n' | 'N' => return Ok(false),
                _ => {}
            }
        }
    }
}

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
fn test_new_movie_moves_whole_folder() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "movies").unwrap();

    let src_movie = mapping.source.root.join("Up (2009)");
    fs::create_dir(&src_movie).unwrap();
    fs::write(src_movie.join("Up.mkv"), b"pixar").unwrap();
    // letter shelf must exist for the folder move to land
    fs::create_dir(mapping.dest.root.join("u")).unwrap();

    movies::process_movies(&mapping, &config, &ScriptedPrompter::new("")).unwrap();

    assert!(!src_movie.exists(), "source folder moved away");
    let moved = mapping.dest.root.join("u/Up (2009)/Up.mkv");
    assert!(moved.exists(), "video landed at the destination");
}

#[test]
fn test_identical_copy_is_deferred_then_deleted_on_yes() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "movies").unwrap();

    let src_movie = mapping.source.root.join("Up (2009)");
    let dst_movie = mapping.dest.root.join("u/Up (2009)");
    fs::create_dir(&src_movie).unwrap();
    fs::create_dir_all(&dst_movie).unwrap();
    fs::write(src_movie.join("Up.mkv"), b"same bytes").unwrap();
    fs::write(dst_movie.join("Up.mkv"), b"same bytes").unwrap();

    // final confirmation answered "y"
    movies::process_movies(&mapping, &config, &ScriptedPrompter::new("y")).unwrap();

    assert!(
        !src_movie.join("Up.mkv").exists(),
        "deferred delete executed after the confirming y"
    );
    assert!(dst_movie.join("Up.mkv").exists(), "destination untouched");
}

#[test]
fn test_identical_copy_survives_a_no() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "movies").unwrap();

    let src_movie = mapping.source.root.join("Up (2009)");
    let dst_movie = mapping.dest.root.join("u/Up (2009)");
    fs::create_dir(&src_movie).unwrap();
    fs::create_dir_all(&dst_movie).unwrap();
    fs::write(src_movie.join("Up.mkv"), b"same bytes").unwrap();
    fs::write(dst_movie.join("Up.mkv"), b"same bytes").unwrap();

    movies::process_movies(&mapping, &config, &ScriptedPrompter::new("n")).unwrap();

    assert!(src_movie.join("Up.mkv").exists(), "n leaves both files");
    assert!(dst_movie.join("Up.mkv").exists());
}

#[test]
fn test_multiple_sources_prompt_then_single_survivor_moves() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "movies").unwrap();

    let src_movie = mapping.source.root.join("Up (2009)");
    let dst_movie = mapping.dest.root.join("u/Up (2009)");
    fs::create_dir(&src_movie).unwrap();
    fs::create_dir_all(&dst_movie).unwrap();
    fs::write(src_movie.join("Up.a.mkv"), b"bigger copy").unwrap();
    fs::write(src_movie.join("Up.b.mkv"), b"small").unwrap();

    // pick candidate 1 to keep; no other prompts fire
    movies::process_movies(&mapping, &config, &ScriptedPrompter::new("1")).unwrap();

    assert!(
        dst_movie.join("Up.a.mkv").exists(),
        "kept candidate proceeded through the empty-destination move"
    );
    assert!(
        !src_movie.exists(),
        "non-picked file deleted immediately and folder cleaned up"
    );
}

#[test]
fn test_completed_import_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "movies").unwrap();

    let src_movie = mapping.source.root.join("Up (2009)");
    fs::create_dir(&src_movie).unwrap();
    fs::write(src_movie.join("Up.mkv"), b"pixar").unwrap();
    fs::create_dir(mapping.dest.root.join("u")).unwrap();

    movies::process_movies(&mapping, &config, &ScriptedPrompter::new("")).unwrap();

    // second pass finds nothing to do and needs no prompts at all
    movies::process_movies(&mapping, &config, &ScriptedPrompter::new("")).unwrap();
    assert!(mapping.dest.root.join("u/Up (2009)/Up.mkv").exists());
}

#[tokio::test]
async fn test_new_series_moves_whole_folder() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "tv").unwrap();

    let src_series = mapping.source.root.join("Firefly (2002)");
    let season = src_series.join("Firefly - s01");
    fs::create_dir_all(&season).unwrap();
    fs::write(season.join("Firefly - 1x01 - Serenity.mkv"), b"ep").unwrap();
    fs::create_dir(mapping.dest.root.join("f")).unwrap();

    series::process_series(&mapping, &config, &ScriptedPrompter::new(""))
        .await
        .unwrap();

    assert!(!src_series.exists());
    assert!(mapping
        .dest
        .root
        .join("f/Firefly (2002)/Firefly - s01/Firefly - 1x01 - Serenity.mkv")
        .exists());
}

#[tokio::test]
async fn test_missing_episode_moves_files_and_empties_clean_up() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "tv").unwrap();

    let src_season = mapping.source.root.join("Firefly (2002)/Firefly - s01");
    fs::create_dir_all(&src_season).unwrap();
    fs::write(src_season.join("Firefly - 1x02 - The Train Job.mkv"), b"ep2").unwrap();
    fs::write(src_season.join("Firefly - 1x02 - The Train Job.srt"), b"subs").unwrap();

    let dst_season = mapping
        .dest
        .root
        .join("f/Firefly (2002)/Firefly - s01");
    fs::create_dir_all(&dst_season).unwrap();
    fs::write(dst_season.join("Firefly - 1x01 - Serenity.mkv"), b"ep1").unwrap();

    series::process_series(&mapping, &config, &ScriptedPrompter::new(""))
        .await
        .unwrap();

    assert!(dst_season.join("Firefly - 1x02 - The Train Job.mkv").exists());
    assert!(dst_season.join("Firefly - 1x02 - The Train Job.srt").exists());
    assert!(
        !mapping.source.root.join("Firefly (2002)").exists(),
        "emptied season and series folders removed"
    );
}

#[tokio::test]
async fn test_identical_episode_deferred_then_folders_swept() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "tv").unwrap();

    let src_season = mapping.source.root.join("Firefly (2002)/Firefly - s01");
    fs::create_dir_all(&src_season).unwrap();
    fs::write(src_season.join("Firefly - 1x01 - Serenity.mkv"), b"same").unwrap();

    let dst_season = mapping
        .dest
        .root
        .join("f/Firefly (2002)/Firefly - s01");
    fs::create_dir_all(&dst_season).unwrap();
    fs::write(dst_season.join("Firefly - 1x01 - Serenity.mkv"), b"same").unwrap();

    series::process_series(&mapping, &config, &ScriptedPrompter::new("y"))
        .await
        .unwrap();

    assert!(dst_season.join("Firefly - 1x01 - Serenity.mkv").exists());
    assert!(
        !mapping.source.root.join("Firefly (2002)").exists(),
        "source file deleted on confirmation, then the empty folders"
    );
}

#[tokio::test]
async fn test_episode_review_delete_source_with_apply_all() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());
    setup_roots(&config);
    let mapping = mapping_by_id(&config, "tv").unwrap();

    let src_season = mapping.source.root.join("Firefly (2002)/Firefly - s01");
    fs::create_dir_all(&src_season).unwrap();
    fs::write(src_season.join("Firefly - 1x01 - Serenity.mkv"), b"longer source").unwrap();
    fs::write(src_season.join("Firefly - 1x02 - The Train Job.mkv"), b"other source").unwrap();

    let dst_season = mapping
        .dest
        .root
        .join("f/Firefly (2002)/Firefly - s01");
    fs::create_dir_all(&dst_season).unwrap();
    fs::write(dst_season.join("Firefly - 1x01 - Serenity.mkv"), b"a").unwrap();
    fs::write(dst_season.join("Firefly - 1x02 - The Train Job.mkv"), b"b").unwrap();

    // "D" answers the first episode and is remembered for the second;
    // the final "y" confirms the deferred deletes
    series::process_series(&mapping, &config, &ScriptedPrompter::new("Dy"))
        .await
        .unwrap();

    assert!(!mapping.source.root.join("Firefly (2002)").exists());
    assert!(dst_season.join("Firefly - 1x01 - Serenity.mkv").exists());
    assert!(dst_season.join("Firefly - 1x02 - The Train Job.mkv").exists());
}
