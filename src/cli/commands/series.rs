//! Series import flow.
//!
//! Seasons and episodes are matched between source and destination; whole
//! missing seasons move as folders, missing episodes move as files, and
//! colliding episodes run through the comparison prompt with per-season
//! "apply to all" memory. Emptied season and series folders are removed at
//! the end, again after the deferred deletes have run.

use crate::core::compare::basically_same;
use crate::core::merge::{
    confirm_and_execute_deletes, delete_videos, move_episode_extras, move_episode_files,
    prompt_episode_review, BulkAction, BulkPolicy, DeleteQueue, ReviewAction,
};
use crate::core::scanner::{load_series_details, source_series};
use crate::core::table::{build_comparison, render_comparison};
use crate::models::library::{IngestConfig, LibraryMapping};
use crate::models::video::extension_of;
use crate::services::prompt::Prompter;
use crate::services::runner::run_command;
use crate::utils::fs::{folder_empty, path_exists};
use crate::{Error, Result};
use colored::Colorize;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

fn mv_args<'a>(from: &'a Path, to: &'a Path) -> [Cow<'a, OsStr>; 3] {
    [
        OsStr::new("-v").into(),
        from.as_os_str().into(),
        to.as_os_str().into(),
    ]
}

/// Process every series of one source library against its destination.
pub async fn process_series(
    mapping: &LibraryMapping,
    config: &IngestConfig,
    prompter: &dyn Prompter,
) -> Result<()> {
    let mut series_list = source_series(mapping, |folder, err| {
        println!("  {} --> {} {err}", folder, "ERROR:".red());
    })?;

    let mut deletes = DeleteQueue::new();
    let total = series_list.len();

    for (i, series) in series_list.iter_mut().enumerate() {
        let n = i + 1;

        let src_path = series.content.src_path(&mapping.source);
        let dst_path = series.content.dst_path(&mapping.dest);

        if !path_exists(&dst_path) {
            println!(
                "{} {} --> {}",
                format!("{n}/{total}").bright_black(),
                series.content.src_folder.white(),
                series.content.dst_folder.green()
            );
            if let Err(e) = run_command(prompter, 4, config.confirm, "mv", &mv_args(&src_path, &dst_path)) {
                println!(" {} moving folder: {e}", "ERROR:".red());
            }
            continue;
        }

        println!(
            "{}  {} --> {}",
            format!("{n}/{total}").bright_black(),
            series.content.src_folder.white(),
            series.content.dst_folder.yellow()
        );

        if let Err(e) = load_series_details(series, &src_path, &dst_path).await {
            println!(" {} {e}\n", "ERROR:".red());
            continue;
        }

        let indent = format!("{total}").len() + format!("{n}").len() + 2;
        let pad = " ".repeat(indent);

        let season_numbers: Vec<u32> = series.src_seasons.keys().copied().collect();
        for season_num in season_numbers {
            let src_season = &series.src_seasons[&season_num];

            let Some(dst_season) = series.dst_seasons.get(&season_num) else {
                print!("{pad}   season {} --> ", season_num.to_string().green());
                let _ = std::io::stdout().flush();
                if let Err(e) = run_command(
                    prompter,
                    indent + 4,
                    config.confirm,
                    "mv",
                    &mv_args(&src_season.path, &dst_path),
                ) {
                    println!("    {} moving season folder: {e}", "ERROR:".red());
                }
                continue;
            };

            println!(
                "{pad}   season {}: {}",
                season_num.to_string().yellow(),
                format!("{} episodes", src_season.episode_count()).bright_black()
            );

            // remembered answer for the rest of this season
            let mut policy = BulkPolicy::default();

            for (episode_num, episode) in src_season.episodes_in_order() {
                let dst_episode = episode
                    .episode_numbers
                    .iter()
                    .find_map(|&num| dst_season.episode(num));

                let Some(dst_episode) = dst_episode else {
                    print!(
                        "{pad}     {} --> ",
                        format!("{season_num}x{episode_num}").green()
                    );
                    let _ = std::io::stdout().flush();
                    if let Err(e) = move_episode_files(
                        prompter,
                        config.confirm,
                        indent + 10,
                        episode,
                        &dst_season.path,
                    ) {
                        println!("      {} moving episode: {e}", "ERROR:".red());
                    }
                    continue;
                };

                if episode.videos.is_empty() {
                    println!(
                        "{pad}     {} --> source has no video file, copying other files except nfo",
                        format!("{season_num}x{episode_num}").yellow()
                    );
                    offer_other_files(
                        prompter,
                        config,
                        indent,
                        &pad,
                        &episode.other_files,
                        &dst_season.path,
                        &mut deletes,
                    );
                    continue;
                }

                if dst_episode.videos.is_empty() {
                    println!(
                        "{pad}     {} --> {} - dst has no video file",
                        format!("{season_num}x{episode_num}").red(),
                        "ERROR".red()
                    );
                    continue;
                }

                for src_video in &episode.videos {
                    if dst_episode
                        .videos
                        .iter()
                        .any(|d| basically_same(src_video, d))
                    {
                        println!(
                            "{pad}     {} --> SAME - adding to delete list",
                            format!("{season_num}x{episode_num}").green()
                        );
                        deletes.defer(&src_video.path);
                        continue;
                    }

                    if config.ignore_existing {
                        println!(
                            "{pad}     {} --> skipping due to flag",
                            format!("{season_num}x{episode_num}").magenta()
                        );
                        continue;
                    }

                    println!(
                        "{pad}     {} --> {}",
                        format!("{season_num}x{episode_num}").yellow(),
                        dst_season.path.display().to_string().bright_black()
                    );

                    let mut headers = vec!["Source".to_string()];
                    for k in 1..=dst_episode.videos.len() {
                        headers.push(format!("Dest {k}"));
                    }
                    let mut candidates = vec![src_video.clone()];
                    candidates.extend(dst_episode.videos.iter().cloned());
                    render_comparison(2, &build_comparison(&headers, &candidates));

                    let action = match policy.action() {
                        Some(BulkAction::Overwrite) => ReviewAction::Overwrite,
                        Some(BulkAction::DeleteSource) => ReviewAction::DeleteSource,
                        Some(BulkAction::Skip) => ReviewAction::Skip,
                        None => {
                            let (action, apply_all) = match prompt_episode_review(prompter) {
                                Ok(answer) => answer,
                                Err(e) => {
                                    println!(" {} {e}", "ERROR:".red());
                                    continue;
                                }
                            };
                            if apply_all {
                                policy = match action {
                                    ReviewAction::Overwrite => {
                                        BulkPolicy::ApplyAll(BulkAction::Overwrite)
                                    }
                                    ReviewAction::DeleteSource => {
                                        BulkPolicy::ApplyAll(BulkAction::DeleteSource)
                                    }
                                    ReviewAction::Skip => BulkPolicy::ApplyAll(BulkAction::Skip),
                                    _ => BulkPolicy::Unset,
                                };
                            }
                            action
                        }
                    };

                    match action {
                        ReviewAction::Overwrite => {
                            println!();
                            delete_videos(prompter, config.confirm, 4, &dst_episode.videos);
                            if let Err(e) = run_command(
                                prompter,
                                4,
                                config.confirm,
                                "mv",
                                &mv_args(&src_video.path, &dst_season.path),
                            ) {
                                println!("    {} moving source video: {e}", "ERROR:".red());
                            }
                            if let Err(e) = move_episode_extras(
                                prompter,
                                config.confirm,
                                4,
                                episode,
                                &dst_season.path,
                            ) {
                                println!("    {} moving other files: {e}", "ERROR:".red());
                            }
                        }
                        ReviewAction::DeleteSource => {
                            deletes.defer(&src_video.path);
                            println!();
                        }
                        ReviewAction::Skip => continue,
                        ReviewAction::Quit => return Err(Error::Cancelled),
                        ReviewAction::KeepDestination(_) => {
                            unreachable!("not offered for episodes")
                        }
                    }
                    println!();
                }
            }

            // season emptied by the moves above
            match folder_empty(&src_season.path) {
                Ok(true) => {
                    print!("{pad}     {} - removing directory: ", "EMPTY".green());
                    let _ = std::io::stdout().flush();
                    let args: [Cow<OsStr>; 2] = [
                        OsStr::new("-v").into(),
                        src_season.path.as_os_str().into(),
                    ];
                    let _ = run_command(prompter, indent + 6, config.confirm, "rmdir", &args);
                }
                Ok(false) => {}
                Err(e) => {
                    println!(" {} checking if empty: {e}", "ERROR:".red());
                }
            }
            println!();
        }

        if !series.special_files.is_empty() {
            println!(
                "{pad}   {}",
                format!("{} special files", series.special_files.len()).magenta()
            );
            let files = series.special_files.clone();
            if let Err(e) = offer_loose_files(
                prompter, config, indent, &dst_path, "specials", &files,
            ) {
                println!("    {} processing specials: {e}", "ERROR:".red());
            }
        }

        if !series.extra_files.is_empty() {
            println!(
                "{pad}   {}",
                format!("{} extra files", series.extra_files.len()).magenta()
            );
            let files = series.extra_files.clone();
            if let Err(e) =
                offer_loose_files(prompter, config, indent, &dst_path, "extras", &files)
            {
                println!("    {} processing extras: {e}", "ERROR:".red());
            }
        }

        match folder_empty(&src_path) {
            Ok(true) => {
                print!("{pad}   {} - removing directory: ", "EMPTY".green());
                let _ = std::io::stdout().flush();
                let args: [Cow<OsStr>; 2] =
                    [OsStr::new("-v").into(), src_path.as_os_str().into()];
                if let Err(e) = run_command(prompter, indent + 4, config.confirm, "rmdir", &args)
                {
                    println!("    {} deleting source folder: {e}", "ERROR:".red());
                }
                println!();
            }
            Ok(false) => {}
            Err(e) => {
                println!(" {} checking if empty: {e}", "ERROR:".red());
            }
        }
    }

    confirm_and_execute_deletes(&deletes, prompter, config.confirm)?;

    // a season folder may only become empty once its last episode's file
    // was deleted above, so sweep again after the confirmation
    println!();
    println!("Checking series and season folders for empties...");
    for series in &series_list {
        for season in series.src_seasons.values() {
            if !path_exists(&season.path) {
                continue;
            }
            if folder_empty(&season.path).unwrap_or(false) {
                let args: [Cow<OsStr>; 2] =
                    [OsStr::new("-v").into(), season.path.as_os_str().into()];
                if let Err(e) = run_command(prompter, 4, config.confirm, "rmdir", &args) {
                    println!("    {} deleting season folder: {e}", "ERROR:".red());
                }
            }
        }

        let src_path = series.content.src_path(&mapping.source);
        if !path_exists(&src_path) {
            continue;
        }
        if folder_empty(&src_path).unwrap_or(false) {
            let args: [Cow<OsStr>; 2] =
                [OsStr::new("-v").into(), src_path.as_os_str().into()];
            if let Err(e) = run_command(prompter, 4, config.confirm, "rmdir", &args) {
                println!("    {} deleting source folder: {e}", "ERROR:".red());
            }
        }
    }

    Ok(())
}

/// Offer an episode's leftover files (subs, artwork) for moving when the
/// episode itself has no video; declined files go to the delete queue.
fn offer_other_files(
    prompter: &dyn Prompter,
    config: &IngestConfig,
    indent: usize,
    pad: &str,
    files: &[PathBuf],
    dst: &Path,
    deletes: &mut DeleteQueue,
) {
    for file in files {
        if extension_of(file) == ".nfo" {
            println!("{pad}           --> nfo, skipping");
            continue;
        }

        let name = file
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        print!("{pad}           --> {} move (y/n)? ", name.white());
        let _ = std::io::stdout().flush();

        match prompter.confirm() {
            Ok(true) => {
                if let Err(e) = run_command(
                    prompter,
                    indent + 10,
                    config.confirm,
                    "mv",
                    &mv_args(file, dst),
                ) {
                    println!("          {} moving file: {e}", "ERROR:".red());
                }
            }
            Ok(false) => {
                println!();
                deletes.defer(file);
            }
            Err(e) => {
                println!(" {} {e}", "ERROR:".red());
            }
        }
    }
}

/// Offer loose specials/extras files for moving into the matching
/// destination subfolder, creating it on demand and removing it again if
/// everything was declined.
fn offer_loose_files(
    prompter: &dyn Prompter,
    config: &IngestConfig,
    indent: usize,
    dst_base: &Path,
    folder: &str,
    files: &[PathBuf],
) -> Result<()> {
    let pad = " ".repeat(indent);
    let dst = dst_base.join(folder);
    if !path_exists(&dst) {
        std::fs::create_dir_all(&dst)?;
    }

    for file in files {
        let name = file
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        print!("{pad}       --> {} move (y/n)? ", name.white());
        let _ = std::io::stdout().flush();

        if prompter.confirm()? {
            if let Err(e) = run_command(
                prompter,
                indent + 6,
                config.confirm,
                "mv",
                &mv_args(file, &dst),
            ) {
                println!("      {} moving file: {e}", "ERROR:".red());
            }
        } else {
            println!();
        }
    }

    if folder_empty(&dst)? {
        print!("{pad}   {} - removing directory: ", "EMPTY".green());
        let _ = std::io::stdout().flush();
        let args: [Cow<OsStr>; 2] = [OsStr::new("-v").into(), dst.as_os_str().into()];
        if let Err(e) = run_command(prompter, indent + 4, config.confirm, "rmdir", &args) {
            println!("    {} deleting empty destination: {e}", "ERROR:".red());
        }
        println!();
    }

    Ok(())
}
