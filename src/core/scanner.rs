//! Library directory scanner.
//!
//! Builds content, season and episode models from the filesystem. Season
//! folders are probed in parallel (bounded fan-out, merged under a mutex,
//! first writer wins per season number); everything else is sequential.

use crate::models::content::{Content, ContentItem, Movie};
use crate::models::library::{Library, LibraryKind, LibraryMapping};
use crate::models::series::{Episode, Season, Series};
use crate::models::video::VideoFact;
use crate::services::ffprobe;
use crate::utils::fs::{is_video_file, list_files, list_folders, path_exists};
use crate::{Error, Result};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// How many season folders are probed at once.
const SEASON_SCAN_CONCURRENCY: usize = 8;

/// Probe every video file directly inside a folder.
pub fn videos_in_path(path: &Path) -> Result<Vec<VideoFact>> {
    let mut videos = Vec::new();
    for file in list_files(path)? {
        if is_video_file(&file) {
            videos.push(ffprobe::probe_video(&file)?);
        }
    }
    Ok(videos)
}

/// All content folders of a mapping's source library, parsed into the
/// shape the library kind dictates. Folders that fail to parse are
/// reported through `on_error` and skipped.
pub fn source_contents(
    mapping: &LibraryMapping,
    mut on_error: impl FnMut(&str, &Error),
) -> Result<Vec<ContentItem>> {
    let mut items = Vec::new();
    for folder in list_folders(&mapping.source.root)? {
        let name = folder_name(&folder);
        match Content::new(mapping.source.kind, &name) {
            Ok(content) => items.push(match mapping.source.kind {
                LibraryKind::Movies | LibraryKind::Standup => ContentItem::Movie(Movie {
                    content,
                    videos: Vec::new(),
                }),
                LibraryKind::Series => ContentItem::Series(Series::new(content)),
            }),
            Err(e) => on_error(&name, &e),
        }
    }
    Ok(items)
}

/// Source movies of a movie/standup mapping, sorted by shelving order.
pub fn source_movies(
    mapping: &LibraryMapping,
    on_error: impl FnMut(&str, &Error),
) -> Result<Vec<Movie>> {
    let mut movies: Vec<Movie> = source_contents(mapping, on_error)?
        .into_iter()
        .filter_map(|item| match item {
            ContentItem::Movie(m) => Some(m),
            ContentItem::Series(_) => None,
        })
        .collect();
    movies.sort_by_key(|m| format!("{}/{}", m.content.letter, m.content.dst_folder));
    Ok(movies)
}

/// Source series of a series mapping, sorted by shelving order.
pub fn source_series(
    mapping: &LibraryMapping,
    on_error: impl FnMut(&str, &Error),
) -> Result<Vec<Series>> {
    let mut series: Vec<Series> = source_contents(mapping, on_error)?
        .into_iter()
        .filter_map(|item| match item {
            ContentItem::Series(s) => Some(s),
            ContentItem::Movie(_) => None,
        })
        .collect();
    series.sort_by_key(|s| format!("{}/{}", s.content.letter, s.content.dst_folder));
    Ok(series)
}

/// Content folders of a destination library, letter shelving included.
/// Parse failures are reported and skipped like on the source side.
pub fn destination_contents(
    library: &Library,
    mut on_error: impl FnMut(&str, &Error),
) -> Result<Vec<(Content, PathBuf)>> {
    let mut contents = Vec::new();

    let content_folders = if library.letter_folders {
        let mut folders = Vec::new();
        for letter_folder in list_folders(&library.root)? {
            folders.extend(list_folders(&letter_folder)?);
        }
        folders
    } else {
        list_folders(&library.root)?
    };

    for folder in content_folders {
        let name = folder_name(&folder);
        match Content::new(library.kind, &name) {
            Ok(content) => contents.push((content, folder)),
            Err(e) => on_error(&name, &e),
        }
    }

    Ok(contents)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a season folder name into (season number, year); `None` when the
/// folder is not a season.
pub fn parse_season_folder(name: &str) -> Option<(u32, u16)> {
    let re = Regex::new(r".* - s(\d+)(?: \((\d*)\))?").expect("season pattern");
    let caps = re.captures(name)?;
    let number = caps[1].parse().ok()?;
    let year = caps
        .get(2)
        .map(|y| y.as_str())
        .filter(|y| !y.is_empty())
        .and_then(|y| y.parse().ok())
        .unwrap_or(0);
    Some((number, year))
}

/// Parse an episode file name into the list of episode numbers it
/// represents. "01x05-06" expands the range, "01x05+10" adds just the end
/// number.
pub fn parse_episode_numbers(name: &str) -> Option<Vec<u32>> {
    let re = Regex::new(r".* - (\d+)x(\d+)(?:([-+])(\d+))? - .*").expect("episode pattern");
    let caps = re.captures(name)?;

    let start: u32 = caps[2].parse().ok()?;
    let mut numbers = vec![start];

    if let (Some(sep), Some(end)) = (caps.get(3), caps.get(4)) {
        let end: u32 = end.as_str().parse().ok()?;
        if end > start {
            if sep.as_str() == "-" {
                numbers.extend(start + 1..=end);
            } else {
                numbers.push(end);
            }
        }
    }

    Some(numbers)
}

/// Load the episodes of one season folder.
fn load_episodes(season: &mut Season) -> Result<()> {
    let files = list_files(&season.path)?;

    for file in files {
        let name = folder_name(&file);
        let Some(numbers) = parse_episode_numbers(&name) else {
            continue;
        };

        let id = match season.find_episode_id(&numbers) {
            Some(id) => id,
            None => season.insert_episode(Episode {
                season: season.number,
                number: numbers[0],
                episode_numbers: numbers.clone(),
                videos: Vec::new(),
                other_files: Vec::new(),
            }),
        };

        if is_video_file(&file) {
            let fact = ffprobe::probe_video(&file)?;
            season.episode_by_id_mut(id).videos.push(fact);
        } else {
            season.episode_by_id_mut(id).other_files.push(file);
        }
    }

    Ok(())
}

fn scan_season_folder(folder: &Path) -> Result<Option<Season>> {
    let name = folder_name(folder);
    let Some((number, year)) = parse_season_folder(&name) else {
        println!(
            "    {} folder doesn't match season format: {}",
            "SKIP:".bright_black(),
            name
        );
        return Ok(None);
    };

    let mut season = Season::new(number, year, folder.to_path_buf());
    load_episodes(&mut season)?;
    Ok(Some(season))
}

/// Discover the seasons under a series folder, one probe task per season
/// candidate. The returned map is complete once this resolves.
pub async fn load_seasons(path: &Path) -> Result<BTreeMap<u32, Season>> {
    let folders = list_folders(path)?;

    let seasons: Arc<Mutex<BTreeMap<u32, Season>>> = Arc::new(Mutex::new(BTreeMap::new()));

    let results: Vec<Result<()>> = stream::iter(folders)
        .map(|folder| {
            let seasons = Arc::clone(&seasons);
            async move {
                let loaded = tokio::task::spawn_blocking(move || scan_season_folder(&folder))
                    .await
                    .map_err(|e| Error::other(format!("season scan task failed: {e}")))??;

                if let Some(season) = loaded {
                    let mut map = seasons.lock().unwrap();
                    // first writer wins on a number collision; warn, the
                    // source data may legitimately contain one mistake
                    if let Some(existing) = map.get(&season.number) {
                        println!(
                            "    {} season {} already exists ({} vs {}), using first",
                            "WARNING:".yellow(),
                            season.number,
                            existing.path.display(),
                            season.path.display()
                        );
                    } else {
                        map.insert(season.number, season);
                    }
                }
                Ok(())
            }
        })
        .buffer_unordered(SEASON_SCAN_CONCURRENCY)
        .collect()
        .await;

    for result in results {
        result?;
    }

    let seasons = Arc::try_unwrap(seasons)
        .map_err(|_| Error::other("season scan still in flight"))?
        .into_inner()
        .unwrap();
    Ok(seasons)
}

/// Load a series' seasons on both sides plus loose extras/specials.
/// Called only once the destination folder is known to exist.
pub async fn load_series_details(
    series: &mut Series,
    src_path: &Path,
    dst_path: &Path,
) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("probing episodes...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let (src, dst) = tokio::join!(load_seasons(src_path), load_seasons(dst_path));
    spinner.finish_and_clear();

    series.src_seasons = src?;
    series.dst_seasons = dst?;

    let extras = src_path.join("extras");
    if path_exists(&extras) {
        series.extra_files = list_files(&extras)?;
    }
    let specials = src_path.join("specials");
    if path_exists(&specials) {
        series.special_files = list_files(&specials)?;
    }

    Ok(())
}
