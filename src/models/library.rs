//! Library definitions and source/destination mappings.

use std::path::PathBuf;

/// Runtime configuration, built once from CLI flags/env and passed down.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Root of the sorted torrent source folders.
    pub src_root: PathBuf,
    /// Root of the curated destination library tree.
    pub dst_root: PathBuf,
    /// Ask before running each mv/rm command.
    pub confirm: bool,
    /// Skip items that already exist at the destination.
    pub ignore_existing: bool,
}

/// The kind of content a library holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Movies,
    Standup,
    Series,
}

impl std::fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryKind::Movies => write!(f, "movies"),
            LibraryKind::Standup => write!(f, "standup"),
            LibraryKind::Series => write!(f, "series"),
        }
    }
}

/// One library: a root directory, a content kind, and whether content is
/// shelved under single-character letter folders.
#[derive(Debug, Clone)]
pub struct Library {
    pub root: PathBuf,
    pub kind: LibraryKind,
    pub letter_folders: bool,
}

/// A source library paired with its destination library.
#[derive(Debug, Clone)]
pub struct LibraryMapping {
    pub id: String,
    pub source: Library,
    pub dest: Library,
}

// builtin libraries: manual sort drops torrents into m.* / s.* folders,
// the destination side mirrors the media server layout
const LIBRARY_TABLE: &[(&str, &str, &str, LibraryKind, bool)] = &[
    ("anime-movies", "m.anime", "anime/movies", LibraryKind::Movies, false),
    ("movies", "m.movies", "movies", LibraryKind::Movies, true),
    ("documentary", "m.docu", "docu/documentary", LibraryKind::Movies, false),
    ("standup", "m.standup", "standup", LibraryKind::Standup, false),
    ("anime-series", "s.anime", "anime/series", LibraryKind::Series, true),
    ("tv", "s.tv", "tv", LibraryKind::Series, true),
    ("docuseries", "s.docu", "docu/docuseries", LibraryKind::Series, false),
];

/// Build all library mappings for the configured roots.
pub fn library_mappings(config: &IngestConfig) -> Vec<LibraryMapping> {
    LIBRARY_TABLE
        .iter()
        .map(|(id, src_folder, dst_folder, kind, letters)| LibraryMapping {
            id: (*id).to_string(),
            source: Library {
                root: config.src_root.join(src_folder),
                kind: *kind,
                // source folders are always flat
                letter_folders: false,
            },
            dest: Library {
                root: config.dst_root.join(dst_folder),
                kind: *kind,
                letter_folders: *letters,
            },
        })
        .collect()
}

/// Look up a single mapping by id.
pub fn mapping_by_id(config: &IngestConfig, id: &str) -> Option<LibraryMapping> {
    library_mappings(config).into_iter().find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> IngestConfig {
        IngestConfig {
            src_root: PathBuf::from("/src"),
            dst_root: PathBuf::from("/dst"),
            confirm: false,
            ignore_existing: false,
        }
    }

    #[test]
    fn test_mappings_resolve_roots() {
        let mappings = library_mappings(&test_config());
        let movies = mappings.iter().find(|m| m.id == "movies").unwrap();
        assert_eq!(movies.source.root, PathBuf::from("/src/m.movies"));
        assert_eq!(movies.dest.root, PathBuf::from("/dst/movies"));
        assert!(movies.dest.letter_folders);
        assert!(!movies.source.letter_folders);
    }

    #[test]
    fn test_mapping_by_id() {
        let config = test_config();
        assert!(mapping_by_id(&config, "tv").is_some());
        assert!(mapping_by_id(&config, "nope").is_none());
    }

    #[test]
    fn test_kinds_match_on_both_sides() {
        for m in library_mappings(&test_config()) {
            assert_eq!(m.source.kind, m.dest.kind, "mapping {}", m.id);
        }
    }
}
