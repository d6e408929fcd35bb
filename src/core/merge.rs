//! Merge decisions for one content item.
//!
//! The same machinery drives movie import, per-episode series import and
//! documentary deduplication: classify the source/destination situation,
//! auto-resolve what can be auto-resolved, and prompt for the rest.
//!
//! Source-side deletions are never executed inline. They accumulate in a
//! [`DeleteQueue`] and run only after the whole pass has been listed and
//! confirmed once. Destination-side deletions (overwrite, pick-one) run
//! immediately because the better file is about to take that slot.

use crate::core::compare::basically_same;
use crate::core::table::{build_comparison, render_comparison};
use crate::models::series::Episode;
use crate::models::video::VideoFact;
use crate::services::prompt::Prompter;
use crate::services::runner::run_command;
use crate::utils::fs::{is_junk_file, list_files};
use crate::Result;
use colored::Colorize;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The situation one content item is in, checked in this exact order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSituation {
    /// Nothing at the destination: plain move.
    DestinationAbsent,
    /// Source folder holds no videos, only leftovers.
    NoSourceVideos,
    /// More than one source video; must reduce to one first.
    MultipleSourceVideos,
    /// Destination folder exists but holds no videos: easy move.
    DestinationEmpty,
    /// A destination candidate is basically the same file.
    SameAsDestination,
    /// Differences exist but the run ignores existing destinations.
    IgnoreExisting,
    /// Differences exist; the operator decides.
    NeedsReview,
}

/// Classify a content item by the fixed precedence of the decision flow.
pub fn classify(
    dst_exists: bool,
    src_videos: &[VideoFact],
    dst_videos: &[VideoFact],
    ignore_existing: bool,
) -> MergeSituation {
    if !dst_exists {
        return MergeSituation::DestinationAbsent;
    }
    if src_videos.is_empty() {
        return MergeSituation::NoSourceVideos;
    }
    if src_videos.len() > 1 {
        return MergeSituation::MultipleSourceVideos;
    }
    if dst_videos.is_empty() {
        return MergeSituation::DestinationEmpty;
    }
    if dst_videos.iter().any(|d| basically_same(&src_videos[0], d)) {
        return MergeSituation::SameAsDestination;
    }
    if ignore_existing {
        return MergeSituation::IgnoreExisting;
    }
    MergeSituation::NeedsReview
}

/// Source paths marked for deletion, executed only after one final
/// confirmation (phase two, [`confirm_and_execute_deletes`]).
#[derive(Debug, Default)]
pub struct DeleteQueue {
    pending: Vec<PathBuf>,
}

impl DeleteQueue {
    pub fn new() -> Self {
        DeleteQueue::default()
    }

    /// Mark a path for deletion without touching the filesystem.
    pub fn defer(&mut self, path: impl Into<PathBuf>) {
        self.pending.push(path.into());
    }

    pub fn pending(&self) -> &[PathBuf] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Phase two of deferred deletion: list everything, ask once, then delete.
/// "n" leaves every file in place.
pub fn confirm_and_execute_deletes(
    queue: &DeleteQueue,
    prompter: &dyn Prompter,
    confirm_each: bool,
) -> Result<()> {
    if queue.is_empty() {
        return Ok(());
    }

    println!();
    println!();
    println!("{}", format!("{} items to DELETE:", queue.len()).red());
    for path in queue.pending() {
        println!("{}", path.display());
    }

    print!("{} y/n: ", "CONFIRM DELETE".red());
    let _ = std::io::stdout().flush();
    let yes = prompter.confirm()?;
    println!();

    if yes {
        for path in queue.pending() {
            if let Err(e) = run_command(prompter, 4, confirm_each, "rm", &os_args("-rfv", path))
            {
                println!("   {} deleting path: {e}", "ERROR:".red());
            }
        }
    }
    println!();

    Ok(())
}

// small helpers so literal flags and paths mix in one args slice
fn os_args<'a>(flag: &'a str, path: &'a Path) -> [Cow<'a, OsStr>; 2] {
    [OsStr::new(flag).into(), path.as_os_str().into()]
}

fn mv_args<'a>(from: &'a Path, to: &'a Path) -> [Cow<'a, OsStr>; 3] {
    [
        OsStr::new("-v").into(),
        from.as_os_str().into(),
        to.as_os_str().into(),
    ]
}

/// Remembered answer for the rest of a season's episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Overwrite,
    DeleteSource,
    Skip,
}

/// Tri-state "apply to all remaining items" policy, set by the capitalized
/// prompt variants and consulted before each per-episode prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BulkPolicy {
    #[default]
    Unset,
    ApplyAll(BulkAction),
}

impl BulkPolicy {
    pub fn action(&self) -> Option<BulkAction> {
        match self {
            BulkPolicy::Unset => None,
            BulkPolicy::ApplyAll(action) => Some(*action),
        }
    }
}

/// Outcome of reducing multiple source videos down to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiSourceOutcome {
    /// One video kept, the others deleted; `videos` now holds exactly it.
    Kept,
    /// Left unresolved; the item is skipped.
    Skipped,
    /// The operator quit the run.
    Cancelled,
}

/// Ask which of several source videos to keep, deleting the rest
/// immediately. Non-picked files never reach the deferred queue.
pub fn resolve_multiple_sources(
    videos: &mut Vec<VideoFact>,
    prompter: &dyn Prompter,
    confirm: bool,
) -> Result<MultiSourceOutcome> {
    println!(
        "  {}",
        "WARNING - multiple source videos - WARNING".bright_magenta()
    );

    let headers: Vec<String> = (1..=videos.len())
        .map(|i| format!("Source {i}"))
        .collect();
    render_comparison(2, &build_comparison(&headers, videos));

    print!(" pick source to keep (1-{}) skip (s) quit (q): ", videos.len());
    let _ = std::io::stdout().flush();

    let mut options = vec!['s', 'q'];
    for i in 1..=videos.len().min(9) {
        options.push(char::from_digit(i as u32, 10).expect("digit"));
    }

    let selection = prompter.select(&options)?;
    println!();

    match selection {
        'q' => Ok(MultiSourceOutcome::Cancelled),
        's' => Ok(MultiSourceOutcome::Skipped),
        digit => {
            let keep = digit.to_digit(10).expect("digit selection") as usize - 1;
            for (i, v) in videos.iter().enumerate() {
                if i != keep {
                    if let Err(e) =
                        run_command(prompter, 4, confirm, "rm", &os_args("-v", &v.path))
                    {
                        println!("   {} deleting source video: {e}", "ERROR:".red());
                    }
                }
            }
            let kept = videos[keep].clone();
            *videos = vec![kept];
            Ok(MultiSourceOutcome::Kept)
        }
    }
}

/// Operator decision for a source video that differs from the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Replace every destination candidate with the source.
    Overwrite,
    /// Keep the destination, defer-delete the source.
    DeleteSource,
    /// Leave both in place.
    Skip,
    /// Keep one destination candidate, delete the other destination
    /// candidates immediately, then defer-delete the source.
    KeepDestination(usize),
    /// Quit the run.
    Quit,
}

/// Prompt for a movie-style review (pick-destination allowed, no bulk
/// variants).
pub fn prompt_movie_review(prompter: &dyn Prompter, n_dst: usize) -> Result<ReviewAction> {
    print!(
        " overwrite (y/a?) delete src (d?) skip (s?) pick dest (1-{n_dst}) quit (q?): "
    );
    let _ = std::io::stdout().flush();

    let mut options = vec!['a', 'y', 'd', 's', 'q'];
    for i in 1..=n_dst.min(9) {
        options.push(char::from_digit(i as u32, 10).expect("digit"));
    }

    let selection = prompter.select(&options)?;
    println!();
    println!();

    Ok(match selection {
        'a' | 'y' => ReviewAction::Overwrite,
        'd' => ReviewAction::DeleteSource,
        's' => ReviewAction::Skip,
        'q' => ReviewAction::Quit,
        digit => {
            ReviewAction::KeepDestination(digit.to_digit(10).expect("digit selection") as usize - 1)
        }
    })
}

/// Prompt for an episode review; capitalized answers also set the policy
/// for the remaining episodes of the season.
pub fn prompt_episode_review(prompter: &dyn Prompter) -> Result<(ReviewAction, bool)> {
    print!(" overwrite (y/a/A (all)?) delete src (d/D (all)?) skip (s/S?) quit (q?): ");
    let _ = std::io::stdout().flush();

    let selection = prompter.select(&['a', 'y', 'd', 's', 'q', 'A', 'D', 'S'])?;
    println!();

    Ok(match selection {
        'A' => (ReviewAction::Overwrite, true),
        'a' | 'y' => (ReviewAction::Overwrite, false),
        'D' => (ReviewAction::DeleteSource, true),
        'd' => (ReviewAction::DeleteSource, false),
        'S' => (ReviewAction::Skip, true),
        's' => (ReviewAction::Skip, false),
        'q' => (ReviewAction::Quit, false),
        _ => unreachable!("selection not offered"),
    })
}

/// Move every video and non-junk file of a movie folder into the
/// destination folder. Junk stays behind for the cleanup pass.
pub fn move_movie_files(
    prompter: &dyn Prompter,
    confirm: bool,
    indent: usize,
    src_folder: &Path,
    dst_folder: &Path,
) -> Result<()> {
    for file in list_files(src_folder)? {
        if is_junk_file(&file) {
            continue;
        }
        if let Err(e) = run_command(prompter, indent, confirm, "mv", &mv_args(&file, dst_folder))
        {
            println!("   {} moving file: {e}", "ERROR:".red());
        }
    }
    Ok(())
}

/// Move an episode's single video plus its non-nfo companions.
pub fn move_episode_files(
    prompter: &dyn Prompter,
    confirm: bool,
    indent: usize,
    episode: &Episode,
    dst_folder: &Path,
) -> Result<()> {
    if episode.videos.len() != 1 {
        return Err(crate::Error::other(format!(
            "expected 1 src video file, found {}",
            episode.videos.len()
        )));
    }

    if let Err(e) = run_command(
        prompter,
        indent,
        confirm,
        "mv",
        &mv_args(&episode.videos[0].path, dst_folder),
    ) {
        println!("   {} moving video: {e}", "ERROR:".red());
    }

    move_episode_extras(prompter, confirm, indent, episode, dst_folder)
}

/// Move an episode's companion files, skipping nfo clutter.
pub fn move_episode_extras(
    prompter: &dyn Prompter,
    confirm: bool,
    indent: usize,
    episode: &Episode,
    dst_folder: &Path,
) -> Result<()> {
    for file in &episode.other_files {
        if crate::models::video::extension_of(file) == ".nfo" {
            continue;
        }
        if let Err(e) = run_command(prompter, indent, confirm, "mv", &mv_args(file, dst_folder))
        {
            println!("   {} moving other file: {e}", "ERROR:".red());
        }
    }
    Ok(())
}

/// Delete every video of a destination episode immediately.
pub fn delete_videos(
    prompter: &dyn Prompter,
    confirm: bool,
    indent: usize,
    videos: &[VideoFact],
) {
    for v in videos {
        if let Err(e) = run_command(prompter, indent, confirm, "rm", &os_args("-v", &v.path)) {
            println!("    {} deleting destination video: {e}", "ERROR:".red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::video::VideoFact;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted {
        keys: RefCell<VecDeque<char>>,
    }

    impl Scripted {
        fn new(keys: &str) -> Self {
            Scripted {
                keys: RefCell::new(keys.chars().collect()),
            }
        }
    }

    impl Prompter for Scripted {
        fn select(&self, options: &[char]) -> Result<char> {
            loop {
                let c = self
                    .keys
                    .borrow_mut()
                    .pop_front()
                    .expect("script exhausted");
                if options.contains(&c) {
                    return Ok(c);
                }
            }
        }

        fn confirm(&self) -> Result<bool> {
            loop {
                match self.keys.borrow_mut().pop_front().expect("script exhausted") {
                    'y' | 'Y' => return Ok(true),
                    'n' | 'N' => return Ok(false),
                    _ => {}
                }
            }
        }
    }

    fn fact(size: u64) -> VideoFact {
        VideoFact {
            ext: ".mkv".into(),
            size_bytes: size,
            resolution: "1920x1080".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_precedence() {
        let src = vec![fact(1)];
        let dst_same = vec![fact(1)];
        let dst_other = vec![fact(2)];

        assert_eq!(
            classify(false, &src, &[], false),
            MergeSituation::DestinationAbsent
        );
        assert_eq!(
            classify(true, &[], &[], false),
            MergeSituation::NoSourceVideos
        );
        assert_eq!(
            classify(true, &[fact(1), fact(2)], &[], false),
            MergeSituation::MultipleSourceVideos
        );
        assert_eq!(
            classify(true, &src, &[], false),
            MergeSituation::DestinationEmpty
        );
        assert_eq!(
            classify(true, &src, &dst_same, false),
            MergeSituation::SameAsDestination
        );
        // same wins over the ignore flag
        assert_eq!(
            classify(true, &src, &dst_same, true),
            MergeSituation::SameAsDestination
        );
        assert_eq!(
            classify(true, &src, &dst_other, true),
            MergeSituation::IgnoreExisting
        );
        assert_eq!(
            classify(true, &src, &dst_other, false),
            MergeSituation::NeedsReview
        );
    }

    #[test]
    fn test_delete_queue_collects_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.mkv");
        std::fs::write(&file, b"x").unwrap();

        let mut queue = DeleteQueue::new();
        queue.defer(&file);
        assert_eq!(queue.len(), 1);
        assert!(file.exists(), "phase one must not delete anything");
    }

    #[test]
    fn test_confirm_and_execute_deletes_yes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.mkv");
        std::fs::write(&file, b"x").unwrap();

        let mut queue = DeleteQueue::new();
        queue.defer(&file);

        confirm_and_execute_deletes(&queue, &Scripted::new("y"), false).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_confirm_and_execute_deletes_no_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stays.mkv");
        std::fs::write(&file, b"x").unwrap();

        let mut queue = DeleteQueue::new();
        queue.defer(&file);

        confirm_and_execute_deletes(&queue, &Scripted::new("n"), false).unwrap();
        assert!(file.exists());
    }

    #[test]
    fn test_resolve_multiple_sources_deletes_non_picked() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.mkv");
        let drop = dir.path().join("drop.mkv");
        std::fs::write(&keep, b"kk").unwrap();
        std::fs::write(&drop, b"d").unwrap();

        let mut videos = vec![
            VideoFact {
                path: keep.clone(),
                ..fact(2)
            },
            VideoFact {
                path: drop.clone(),
                ..fact(1)
            },
        ];

        let outcome =
            resolve_multiple_sources(&mut videos, &Scripted::new("1"), false).unwrap();
        assert_eq!(outcome, MultiSourceOutcome::Kept);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].path, keep);
        assert!(keep.exists());
        assert!(!drop.exists(), "non-picked source deleted immediately");
    }

    #[test]
    fn test_resolve_multiple_sources_skip_and_quit() {
        let mut videos = vec![fact(1), fact(2)];
        let outcome =
            resolve_multiple_sources(&mut videos, &Scripted::new("s"), false).unwrap();
        assert_eq!(outcome, MultiSourceOutcome::Skipped);
        assert_eq!(videos.len(), 2);

        let outcome =
            resolve_multiple_sources(&mut videos, &Scripted::new("q"), false).unwrap();
        assert_eq!(outcome, MultiSourceOutcome::Cancelled);
    }

    #[test]
    fn test_prompt_movie_review_actions() {
        assert_eq!(
            prompt_movie_review(&Scripted::new("y"), 1).unwrap(),
            ReviewAction::Overwrite
        );
        assert_eq!(
            prompt_movie_review(&Scripted::new("d"), 1).unwrap(),
            ReviewAction::DeleteSource
        );
        assert_eq!(
            prompt_movie_review(&Scripted::new("2"), 3).unwrap(),
            ReviewAction::KeepDestination(1)
        );
        assert_eq!(
            prompt_movie_review(&Scripted::new("q"), 1).unwrap(),
            ReviewAction::Quit
        );
    }

    #[test]
    fn test_prompt_episode_review_bulk_variants() {
        assert_eq!(
            prompt_episode_review(&Scripted::new("A")).unwrap(),
            (ReviewAction::Overwrite, true)
        );
        assert_eq!(
            prompt_episode_review(&Scripted::new("y")).unwrap(),
            (ReviewAction::Overwrite, false)
        );
        assert_eq!(
            prompt_episode_review(&Scripted::new("D")).unwrap(),
            (ReviewAction::DeleteSource, true)
        );
        assert_eq!(
            prompt_episode_review(&Scripted::new("S")).unwrap(),
            (ReviewAction::Skip, true)
        );
    }

    #[test]
    fn test_bulk_policy() {
        let mut policy = BulkPolicy::default();
        assert_eq!(policy.action(), None);
        policy = BulkPolicy::ApplyAll(BulkAction::Skip);
        assert_eq!(policy.action(), Some(BulkAction::Skip));
    }
}
