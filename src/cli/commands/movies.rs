//! Movie (and standup) import flow.
//!
//! Walks every source movie folder of a mapping and resolves it against
//! the destination library: plain moves for new titles, junk cleanup for
//! empty folders, and comparison prompts when both sides hold a video.

use crate::core::cleanup::delete_if_empty_or_only_junk;
use crate::core::merge::{
    classify, confirm_and_execute_deletes, delete_videos, move_movie_files,
    prompt_movie_review, resolve_multiple_sources, DeleteQueue, MergeSituation,
    MultiSourceOutcome, ReviewAction,
};
use crate::core::scanner::{source_movies, videos_in_path};
use crate::core::table::{build_comparison, render_comparison};
use crate::models::library::{IngestConfig, LibraryMapping};
use crate::services::prompt::Prompter;
use crate::services::runner::run_command;
use crate::utils::fs::path_exists;
use crate::{Error, Result};
use colored::Colorize;
use std::borrow::Cow;
use std::ffi::OsStr;

/// Process every movie of one source library against its destination.
pub fn process_movies(
    mapping: &LibraryMapping,
    config: &IngestConfig,
    prompter: &dyn Prompter,
) -> Result<()> {
    let movies = source_movies(mapping, |folder, err| {
        println!("  {} --> {} {err}", folder, "ERROR:".red());
    })?;

    let mut deletes = DeleteQueue::new();
    let total = movies.len();

    for (i, mut movie) in movies.into_iter().enumerate() {
        let n = i + 1;
        println!();

        let src_path = movie.content.src_path(&mapping.source);
        let dst_path = movie.content.dst_path(&mapping.dest);

        // destination absent: move the whole folder and be done
        if !path_exists(&dst_path) {
            println!(
                "{} {} --> {}",
                format!("{n}/{total}").bright_black(),
                movie.content.src_folder.white(),
                movie.content.dst_folder.green()
            );
            let args: [Cow<OsStr>; 3] = [
                OsStr::new("-v").into(),
                src_path.as_os_str().into(),
                dst_path.as_os_str().into(),
            ];
            if let Err(e) = run_command(prompter, 4, config.confirm, "mv", &args) {
                println!(" {} moving folder: {e}", "ERROR:".red());
            }
            continue;
        }

        println!(
            "{}  {} --> {}",
            format!("{n}/{total}").bright_black(),
            movie.content.src_folder.white(),
            movie.content.dst_folder.yellow()
        );

        movie.videos = match videos_in_path(&src_path) {
            Ok(videos) => videos,
            Err(e) => {
                println!(" {} loading source videos: {e}\n", "ERROR:".red());
                continue;
            }
        };
        let mut dst_videos = match videos_in_path(&dst_path) {
            Ok(videos) => videos,
            Err(e) => {
                println!(" {} loading dest videos: {e}\n", "ERROR:".red());
                continue;
            }
        };

        // no source videos: sweep junk, report if anything real remains
        if movie.videos.is_empty() {
            println!("  {} - no source videos", "WARNING".yellow());
            if let Err(e) = delete_if_empty_or_only_junk(prompter, 4, config.confirm, &src_path)
            {
                println!("   {} deleting source folder: {e}", "ERROR:".red());
                continue;
            }
            if path_exists(&src_path) {
                println!("    {} source folder still exists, skipping", "ERROR:".red());
            }
            continue;
        }

        // several source videos: reduce to one before anything else
        if movie.videos.len() > 1 {
            match resolve_multiple_sources(&mut movie.videos, prompter, config.confirm) {
                Ok(MultiSourceOutcome::Kept) => {}
                Ok(MultiSourceOutcome::Skipped) => continue,
                Ok(MultiSourceOutcome::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    println!(" {} {e}", "ERROR:".red());
                    continue;
                }
            }
        }

        if dst_videos.is_empty() {
            println!("  {} - destination has no video files", "WARNING".yellow());
            if let Err(e) =
                move_movie_files(prompter, config.confirm, 4, &src_path, &dst_path)
            {
                println!("   {} moving files: {e}", "ERROR:".red());
                continue;
            }
            if let Err(e) = delete_if_empty_or_only_junk(prompter, 4, config.confirm, &src_path)
            {
                println!("   {} cleaning source folder: {e}", "ERROR:".red());
            }
            continue;
        }

        let src_video = movie.videos[0].clone();
        let situation = classify(true, &movie.videos, &dst_videos, config.ignore_existing);

        match situation {
            MergeSituation::SameAsDestination => {
                println!("  {} - adding to delete list\n\n", "SAME".green());
                deletes.defer(&src_video.path);
                continue;
            }
            MergeSituation::IgnoreExisting => {
                println!("  {} - skipping due to flag\n\n", "EXISTING".magenta());
                continue;
            }
            _ => {}
        }

        // differences: show the comparison and ask
        let mut headers = vec!["Source".to_string()];
        if dst_videos.len() == 1 {
            headers.push("Destination".to_string());
        } else {
            for k in 1..=dst_videos.len() {
                headers.push(format!("Dest {k}"));
            }
        }
        let mut candidates = vec![src_video.clone()];
        candidates.extend(dst_videos.iter().cloned());
        render_comparison(2, &build_comparison(&headers, &candidates));

        let action = match prompt_movie_review(prompter, dst_videos.len()) {
            Ok(action) => action,
            Err(e) => {
                println!(" {} {e}", "ERROR:".red());
                continue;
            }
        };

        match action {
            ReviewAction::Overwrite => {
                // destination deletes run immediately; the better file is
                // about to take that slot
                delete_videos(prompter, config.confirm, 4, &dst_videos);
                if let Err(e) =
                    move_movie_files(prompter, config.confirm, 4, &src_path, &dst_path)
                {
                    println!("   {} moving files: {e}", "ERROR:".red());
                }
                if let Err(e) =
                    delete_if_empty_or_only_junk(prompter, 4, config.confirm, &src_path)
                {
                    println!("   {} cleaning source folder: {e}", "ERROR:".red());
                }
            }
            ReviewAction::KeepDestination(keep) => {
                let discarded: Vec<_> = dst_videos
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != keep)
                    .map(|(_, v)| v.clone())
                    .collect();
                delete_videos(prompter, config.confirm, 4, &discarded);
                dst_videos.retain(|v| !discarded.iter().any(|d| d.path == v.path));
                println!();
                // the source loses either way
                deletes.defer(&src_path);
            }
            ReviewAction::DeleteSource => {
                deletes.defer(&src_path);
            }
            ReviewAction::Skip => {}
            ReviewAction::Quit => return Err(Error::Cancelled),
        }
    }

    confirm_and_execute_deletes(&deletes, prompter, config.confirm)
}
