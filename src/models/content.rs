//! Content folders: one title on either side of a library mapping.

use crate::models::library::{Library, LibraryKind};
use crate::models::renames::alt_folder_for;
use crate::models::series::Series;
use crate::models::video::VideoFact;
use crate::{Error, Result};
use regex::Regex;
use std::path::PathBuf;

/// The folder for a single title, with its computed destination name,
/// letter bucket and release year.
#[derive(Debug, Clone)]
pub struct Content {
    /// Folder name on the source side.
    pub src_folder: String,
    /// Folder name on the destination side (after rename rules).
    pub dst_folder: String,
    /// Single-character shelving bucket.
    pub letter: String,
    /// Release year from the trailing "(YYYY)" token.
    pub year: u16,
}

impl Content {
    /// Parse a content folder name for a library of the given kind.
    pub fn new(kind: LibraryKind, folder: &str) -> Result<Content> {
        if folder != folder.trim() {
            return Err(Error::parse(format!(
                "folder name has leading or trailing whitespace: {folder:?}"
            )));
        }

        let dst_folder = alt_folder_for(kind, folder)?.unwrap_or_else(|| folder.to_string());

        // exactly one year token, at the end of the name
        let year_re = Regex::new(r"\(\d{4}\)").expect("year pattern");
        let years: Vec<_> = year_re.find_iter(folder).collect();
        if years.len() > 1 {
            return Err(Error::parse("more than one year found in folder name"));
        }
        let tail_re = Regex::new(r"\((\d{4})\)$").expect("year pattern");
        let caps = tail_re
            .captures(folder)
            .ok_or_else(|| Error::parse("no year found in folder name"))?;
        let year = caps[1].parse::<u16>().unwrap_or(0);

        Ok(Content {
            src_folder: folder.to_string(),
            dst_folder,
            letter: letter_for(folder),
            year,
        })
    }

    /// Path of this content inside a source library.
    pub fn src_path(&self, lib: &Library) -> PathBuf {
        lib.root.join(&self.src_folder)
    }

    /// Path of this content inside a destination library, letter folder
    /// included when the library shelves by letter.
    pub fn dst_path(&self, lib: &Library) -> PathBuf {
        if lib.letter_folders {
            lib.root.join(&self.letter).join(&self.dst_folder)
        } else {
            lib.root.join(&self.dst_folder)
        }
    }
}

/// A movie: a content folder plus the video files found directly inside it.
#[derive(Debug, Clone)]
pub struct Movie {
    pub content: Content,
    pub videos: Vec<VideoFact>,
}

/// The closed set of content shapes a library can hold.
#[derive(Debug)]
pub enum ContentItem {
    Movie(Movie),
    Series(Series),
}

/// Compute the single-character shelving bucket for a folder name.
/// Leading articles are skipped; digits bucket to "0", anything that is
/// not an ASCII letter to "@".
pub fn letter_for(folder: &str) -> String {
    let mut name = folder;
    for prefix in ["The ", "A ", "An "] {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }

    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => "0".to_string(),
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        _ => "@".to_string(),
    }
}
