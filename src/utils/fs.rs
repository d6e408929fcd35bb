//! File system utilities.

use crate::Result;
use std::path::{Path, PathBuf};

/// Known video extensions, ordered by container preference (most
/// compatible first). The order doubles as the ranking used when comparing
/// candidate files by extension.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mkv",  // Matroska, flexible open standard
    ".mp4",  // MPEG-4 Part 14
    ".avi",  // Audio Video Interleave
    ".mov",  // Apple QuickTime
    ".mpeg", // MPEG-1/2
    ".mpg",  // MPEG-1/2
    ".m4v",  // iTunes flavoured MP4
    ".wmv",  // Windows Media
    ".webm", // WebM
    ".flv",  // Flash
    ".rmvb", // RealMedia variable bitrate
    ".3gp",  // mobile
    ".3g2",  // mobile
    ".vob",  // DVD
    ".ts",   // MPEG transport stream
    ".m2ts", // Blu-ray BDAV
    ".mts",  // AVCHD
    ".mxf",  // professional cameras
    ".ogv",  // Ogg video
    ".ogm",  // Ogg media
    ".rm",   // RealMedia
    ".divx", ".xvid", ".asf", ".drc", ".f4v", ".f4p", ".gifv", ".gif", ".mng",
];

// files safe to delete when cleaning out an otherwise-empty folder
const JUNK_EXTENSIONS: &[&str] = &[".nfo", ".jpg", ".jpeg", ".png"];

/// Check if a path has a known video extension.
pub fn is_video_file(path: &Path) -> bool {
    let ext = crate::models::video::extension_of(path);
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Preference rank of an extension (lower is better); `None` for unknown
/// extensions.
pub fn extension_rank(ext: &str) -> Option<usize> {
    let ext = ext.to_lowercase();
    VIDEO_EXTENSIONS.iter().position(|&e| e == ext)
}

/// Check if a file is metadata/artwork junk (nfo, jpg, png).
pub fn is_junk_file(path: &Path) -> bool {
    let ext = crate::models::video::extension_of(path);
    JUNK_EXTENSIONS.contains(&ext.as_str())
}

/// List the immediate subdirectories of a path.
pub fn list_folders(path: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            folders.push(entry.path());
        }
    }
    folders.sort();
    Ok(folders)
}

/// List the files directly inside a path (no recursion).
pub fn list_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// List everything directly inside a path.
pub fn list_entries(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries)
}

/// Check if a path exists and is a directory.
pub fn path_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Check if a directory has no entries at all.
pub fn folder_empty(path: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(path)?;
    Ok(entries.next().is_none())
}
