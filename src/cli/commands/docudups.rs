//! Duplicate hunting between the documentary libraries and the general
//! movie/TV libraries.
//!
//! A title present on both sides is compared video by video; identical
//! copies resolve automatically in favor of the documentary side, anything
//! else is the operator's call.

use crate::core::cleanup::delete_if_empty_or_only_junk;
use crate::core::compare::basically_same;
use crate::core::scanner::{destination_contents, load_seasons, videos_in_path};
use crate::core::table::{build_comparison, render_comparison};
use crate::models::content::Content;
use crate::models::library::{mapping_by_id, IngestConfig, Library};
use crate::models::video::VideoFact;
use crate::services::prompt::Prompter;
use crate::services::runner::run_command;
use crate::utils::fs::path_exists;
use crate::{Error, Result};
use colored::Colorize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

fn library_pair(
    config: &IngestConfig,
    docu_id: &str,
    other_id: &str,
) -> Result<(Library, Library)> {
    let docu = mapping_by_id(config, docu_id)
        .ok_or_else(|| Error::other(format!("unknown library: {docu_id}")))?
        .dest;
    let other = mapping_by_id(config, other_id)
        .ok_or_else(|| Error::other(format!("unknown library: {other_id}")))?
        .dest;
    Ok((docu, other))
}

fn contents_by_name(
    library: &Library,
) -> Result<BTreeMap<String, (Content, PathBuf)>> {
    let mut by_name = BTreeMap::new();
    for (content, path) in destination_contents(library, |folder, err| {
        println!("  {} --> {} {err}", folder, "ERROR:".red());
    })? {
        by_name.insert(content.src_folder.clone(), (content, path));
    }
    Ok(by_name)
}

fn rm_rf(prompter: &dyn Prompter, confirm: bool, path: &Path) {
    let args: [Cow<OsStr>; 2] = [OsStr::new("-rfv").into(), path.as_os_str().into()];
    if let Err(e) = run_command(prompter, 4, confirm, "rm", &args) {
        println!("  {} deleting folder: {e}", "ERROR:".red());
    }
}

fn rm_file(prompter: &dyn Prompter, confirm: bool, indent: usize, path: &Path) {
    let args: [Cow<OsStr>; 2] = [OsStr::new("-v").into(), path.as_os_str().into()];
    if let Err(e) = run_command(prompter, indent, confirm, "rm", &args) {
        println!("        {} deleting video: {e}", "ERROR:".red());
    }
}

fn mv_into(prompter: &dyn Prompter, confirm: bool, indent: usize, from: &Path, to: &Path) {
    let args: [Cow<OsStr>; 3] = [
        OsStr::new("-v").into(),
        from.as_os_str().into(),
        to.as_os_str().into(),
    ];
    if let Err(e) = run_command(prompter, indent, confirm, "mv", &args) {
        println!("        {} moving: {e}", "ERROR:".red());
    }
}

/// Check the documentary library against the movie library for titles
/// present in both, letting the operator keep one copy.
pub async fn docudups_movies(config: &IngestConfig, prompter: &dyn Prompter) -> Result<()> {
    let (docu_lib, movie_lib) = library_pair(config, "documentary", "movies")?;
    println!("{} <-- {}", docu_lib.root.display(), movie_lib.root.display());

    let docu_map = contents_by_name(&docu_lib)?;
    let movie_map = contents_by_name(&movie_lib)?;

    let mut match_count = 0;
    let total = docu_map.len();

    for (i, (name, (_, docu_path))) in docu_map.iter().enumerate() {
        let Some((_, movie_path)) = movie_map.get(name) else {
            continue;
        };
        match_count += 1;

        println!();
        println!(
            "{} {}",
            format!("{}/{}", i + 1, total).yellow(),
            name.white()
        );
        println!("  {} {}", "DOCU:".cyan(), docu_path.display());
        println!("  {} {}", "MOVIE:".magenta(), movie_path.display());

        let docu_videos = match videos_in_path(docu_path) {
            Ok(v) => v,
            Err(e) => {
                println!("  {} loading docu videos: {e}", "ERROR:".red());
                continue;
            }
        };
        let movie_videos = match videos_in_path(movie_path) {
            Ok(v) => v,
            Err(e) => {
                println!("  {} loading movie videos: {e}", "ERROR:".red());
                continue;
            }
        };

        if docu_videos.is_empty() && movie_videos.is_empty() {
            println!("  {} no videos in either folder", "WARNING:".yellow());
            continue;
        }

        // identical single copies resolve without asking
        if docu_videos.len() == 1
            && movie_videos.len() == 1
            && basically_same(&docu_videos[0], &movie_videos[0])
        {
            println!(
                "  {} - keeping documentary, deleting movie copy",
                "SAME".green()
            );
            rm_rf(prompter, config.confirm, movie_path);
            continue;
        }

        render_docudup_table(&docu_videos, &movie_videos, "Movie");

        print!(
            "  Actions: keep {} | keep {} | [s]kip | [q]uit: ",
            "[d]ocu".cyan(),
            "[m]ovie".magenta()
        );
        let _ = std::io::stdout().flush();
        let selection = match prompter.select(&['d', 'm', 's', 'q']) {
            Ok(c) => c,
            Err(e) => {
                println!("  {} {e}", "ERROR:".red());
                continue;
            }
        };
        println!();

        match selection {
            'd' => {
                println!("  {}", "Keeping documentary, deleting movie copy...".cyan());
                rm_rf(prompter, config.confirm, movie_path);
            }
            'm' => {
                println!("  {}", "Deleting existing documentary...".magenta());
                rm_rf(prompter, config.confirm, docu_path);
                println!("  {}", "Moving movie to documentary folder...".magenta());
                mv_into(prompter, config.confirm, 4, movie_path, docu_path);
            }
            's' => {
                println!("  {}", "Skipping...".bright_black());
            }
            'q' => return Err(Error::Cancelled),
            _ => unreachable!("selection not offered"),
        }
    }

    if match_count == 0 {
        println!();
        println!(
            "{}",
            "No duplicates found between documentary and movies libraries.".green()
        );
    } else {
        println!();
        println!("{}", format!("Processed {match_count} duplicates.").yellow());
    }

    Ok(())
}

/// Check the docuseries library against the TV library, season and episode
/// wise; TV-only material migrates to the docuseries side.
pub async fn docudups_series(config: &IngestConfig, prompter: &dyn Prompter) -> Result<()> {
    let (docu_lib, tv_lib) = library_pair(config, "docuseries", "tv")?;
    println!("{} <-- {}", docu_lib.root.display(), tv_lib.root.display());

    let docu_map = contents_by_name(&docu_lib)?;
    let tv_map = contents_by_name(&tv_lib)?;

    let mut match_count = 0;
    let total = docu_map.len();

    for (i, (name, (_, docu_path))) in docu_map.iter().enumerate() {
        let Some((_, tv_path)) = tv_map.get(name) else {
            continue;
        };
        match_count += 1;

        println!();
        print!("{} ", format!("{}/{}", i + 1, total).yellow());
        println!(
            "{} {} {}",
            tv_path.display().to_string().cyan(),
            "-->".bright_black(),
            docu_path.display().to_string().magenta()
        );

        let docu_seasons = match load_seasons(docu_path).await {
            Ok(s) => s,
            Err(e) => {
                println!("  {} loading docuseries seasons: {e}", "ERROR:".red());
                continue;
            }
        };
        let tv_seasons = match load_seasons(tv_path).await {
            Ok(s) => s,
            Err(e) => {
                println!("  {} loading tv seasons: {e}", "ERROR:".red());
                continue;
            }
        };

        println!(
            "  {}",
            format!(
                "Docuseries: {} seasons, TV: {} seasons",
                docu_seasons.len(),
                tv_seasons.len()
            )
            .bright_black()
        );

        for (&season_num, tv_season) in &tv_seasons {
            let Some(docu_season) = docu_seasons.get(&season_num) else {
                // season only in TV: take the whole folder across
                println!(
                    "    season {} - only in TV ({} eps) - moving to docuseries",
                    season_num.to_string().magenta(),
                    tv_season.episode_count()
                );
                mv_into(prompter, config.confirm, 6, &tv_season.path, docu_path);
                continue;
            };

            println!(
                "    season {}: {}",
                season_num.to_string().yellow(),
                format!(
                    "docu={} eps, tv={} eps",
                    docu_season.episode_count(),
                    tv_season.episode_count()
                )
                .bright_black()
            );

            for (episode_num, tv_episode) in tv_season.episodes_in_order() {
                let docu_episode = tv_episode
                    .episode_numbers
                    .iter()
                    .find_map(|&num| docu_season.episode(num));

                let Some(docu_episode) = docu_episode else {
                    println!(
                        "      S{season_num:02}E{episode_num:02}: {} - moving to docuseries",
                        "TV only".magenta()
                    );
                    for v in &tv_episode.videos {
                        mv_into(prompter, config.confirm, 8, &v.path, &docu_season.path);
                    }
                    continue;
                };

                if docu_episode.videos.is_empty() && tv_episode.videos.is_empty() {
                    println!(
                        "      S{season_num:02}E{episode_num:02}: {}",
                        "no videos in either".yellow()
                    );
                    continue;
                }

                if docu_episode.videos.len() == 1
                    && tv_episode.videos.len() == 1
                    && basically_same(&docu_episode.videos[0], &tv_episode.videos[0])
                {
                    println!(
                        "      S{season_num:02}E{episode_num:02}: {} - deleting TV version",
                        "SAME".green()
                    );
                    for v in &tv_episode.videos {
                        rm_file(prompter, config.confirm, 8, &v.path);
                    }
                    continue;
                }

                println!(
                    "      S{season_num:02}E{episode_num:02}: {}",
                    "different".yellow()
                );
                render_docudup_table(&docu_episode.videos, &tv_episode.videos, "TV");

                print!("        keep [d]ocu | keep [t]v | [s]kip | [q]uit: ");
                let _ = std::io::stdout().flush();
                let selection = match prompter.select(&['d', 't', 's', 'q']) {
                    Ok(c) => c,
                    Err(e) => {
                        println!("        {} {e}", "ERROR:".red());
                        continue;
                    }
                };
                println!();

                match selection {
                    'd' => {
                        for v in &tv_episode.videos {
                            rm_file(prompter, config.confirm, 8, &v.path);
                        }
                    }
                    't' => {
                        for v in &docu_episode.videos {
                            rm_file(prompter, config.confirm, 8, &v.path);
                        }
                        for v in &tv_episode.videos {
                            mv_into(prompter, config.confirm, 8, &v.path, &docu_season.path);
                        }
                    }
                    's' => {}
                    'q' => return Err(Error::Cancelled),
                    _ => unreachable!("selection not offered"),
                }
            }
        }

        // sweep what the moves and deletes emptied out
        if path_exists(tv_path) {
            for season in tv_seasons.values() {
                if !path_exists(&season.path) {
                    continue;
                }
                if let Err(e) =
                    delete_if_empty_or_only_junk(prompter, 6, config.confirm, &season.path)
                {
                    println!("      {} cleaning up TV season: {e}", "ERROR:".red());
                }
            }
            if let Err(e) = delete_if_empty_or_only_junk(prompter, 4, config.confirm, tv_path) {
                println!("    {} cleaning up TV series folder: {e}", "ERROR:".red());
            }
        }
    }

    if match_count == 0 {
        println!();
        println!(
            "{}",
            "No duplicates found between docuseries and TV libraries.".green()
        );
    } else {
        println!();
        println!("{}", format!("Processed {match_count} duplicates.").yellow());
    }

    Ok(())
}

fn render_docudup_table(docu_videos: &[VideoFact], other_videos: &[VideoFact], other: &str) {
    if docu_videos.is_empty() && other_videos.is_empty() {
        return;
    }

    let mut headers = Vec::new();
    let mut videos = Vec::new();
    for (i, v) in docu_videos.iter().enumerate() {
        headers.push(format!("Docu {}", i + 1));
        videos.push(v.clone());
    }
    for (i, v) in other_videos.iter().enumerate() {
        headers.push(format!("{other} {}", i + 1));
        videos.push(v.clone());
    }

    render_comparison(4, &build_comparison(&headers, &videos));
}
