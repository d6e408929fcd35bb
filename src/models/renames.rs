//! Folder rename rules applied when computing destination folder names.
//!
//! Franchise titles keep their year next to the shared prefix so sequels
//! shelve together ("The Matrix Reloaded (2003)" -> "The Matrix (2003)
//! Reloaded"). Standup folders are reordered so the comedian's name leads
//! with the year.

use crate::models::library::LibraryKind;
use crate::{Error, Result};
use regex::Regex;

// franchise prefixes whose year moves up next to the prefix
const MOVIE_YEAR_PREFIXES: &[&str] = &[
    "^American Ninja",
    "^American Pie",
    "^Amityville",
    "^Asterix",
    "^Batman",
    "^Beverly Hills Cop",
    "^Blade",
    "^Bourne",
    "^Captain America",
    "^Deathstalker",
    "^Gamera",
    "^Guardians of the Galaxy",
    "^Halloween",
    "^Hellraiser",
    "^Jurassic Park",
    "^Jurassic World",
    "^Mega Shark",
    "^Mission Impossible",
    "^Police Academy",
    "^Resident Evil",
    "^Saw",
    "^South Park",
    "^Spider-Man",
    "^Teenage Mutant Ninja Turtles",
    "^The Fast and the Furious",
    "^The Hunger Games",
    "^The Matrix",
    "^The Terminator",
    "^Transformers",
];

const SERIES_YEAR_PREFIXES: &[&str] = &[
    "^Batman",
    "^Law & Order",
    "^Mobile Suit Gundam",
    "^Spider-Man",
    "^Star Trek",
    "^Star Wars",
    "^Stargate",
    "^Teenage Mutant Ninja Turtles",
    "^Transformers",
];

fn year_regex() -> Regex {
    Regex::new(r"\(\d{4}\)").expect("year pattern")
}

fn prefixes_for(kind: LibraryKind) -> &'static [&'static str] {
    match kind {
        LibraryKind::Movies => MOVIE_YEAR_PREFIXES,
        LibraryKind::Series => SERIES_YEAR_PREFIXES,
        LibraryKind::Standup => &[],
    }
}

/// Compute the alternate destination folder name for `folder`, or `None`
/// when it is used as-is.
pub fn alt_folder_for(kind: LibraryKind, folder: &str) -> Result<Option<String>> {
    let year_re = year_regex();

    for pattern in prefixes_for(kind) {
        let re = Regex::new(pattern).expect("prefix pattern");
        if let Some(m) = re.find(folder) {
            let prefix = m.as_str();
            let year = year_re
                .find(folder)
                .map(|y| y.as_str().to_string())
                .unwrap_or_default();

            // strip the year from the end, then splice it in after the prefix
            let without_year = year_re.replace_all(folder, "");
            let without_year = without_year.trim_end();
            let renamed = re.replace(without_year, format!("{prefix} {year}"));
            return Ok(Some(renamed.into_owned()));
        }
    }

    // standup folders reorder as "Comedian (YYYY) - Title"
    if kind == LibraryKind::Standup {
        let year = year_re
            .find(folder)
            .map(|y| y.as_str().to_string())
            .ok_or_else(|| Error::parse("no year found in folder name"))?;

        let without_year = year_re.replace_all(folder, "");
        let without_year = without_year.trim_end();

        let (comedian, title) = without_year
            .split_once('-')
            .ok_or_else(|| Error::parse("invalid folder name format"))?;

        return Ok(Some(format!(
            "{} {} - {}",
            comedian.trim(),
            year,
            title.trim()
        )));
    }

    Ok(None)
}
