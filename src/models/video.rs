//! Video file facts.
//!
//! A [`VideoFact`] is the immutable record of one physical video file:
//! size from a stat call plus stream details from a probe. A failed probe
//! still yields a fact (with sentinel fields) so the operator can act on
//! corrupt files instead of the run aborting.

use std::path::{Path, PathBuf};

/// Resolution shown when the probe invocation itself failed.
pub const RESOLUTION_UNKNOWN: &str = "UNKNOWN";
/// Resolution shown when the probe output could not be interpreted.
pub const RESOLUTION_ERROR: &str = "ERROR";
/// Resolution shown when the file has no video stream at all.
pub const RESOLUTION_NO_VIDEO: &str = "NO VIDEO";

/// Technical facts for one video file.
#[derive(Debug, Clone, Default)]
pub struct VideoFact {
    /// Full path to the file.
    pub path: PathBuf,
    /// File extension including the leading dot (e.g. ".mkv").
    pub ext: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// File size in GiB, for display.
    pub size_gb: f64,
    /// Container duration in seconds.
    pub duration: f64,
    /// Overall bitrate in bits per second.
    pub bit_rate: i64,
    /// Display resolution (e.g. "1920x1080", or a sentinel).
    pub resolution: String,
    pub resolution_w: u32,
    pub resolution_h: u32,
    /// The first video stream found.
    pub video: VideoStreamFact,
    /// All audio streams, in container order.
    pub audio_streams: Vec<AudioStreamFact>,
    /// All subtitle streams, in container order.
    pub subtitles: Vec<SubtitleStreamFact>,
    /// Number of embedded image streams (cover art etc).
    pub image_streams: usize,
    /// Set when the probe failed; only basic file info is available.
    pub probe_failed: bool,
}

/// Facts for a single video stream.
#[derive(Debug, Clone, Default)]
pub struct VideoStreamFact {
    pub codec_name: String,
    pub profile: String,
    pub width: u32,
    pub height: u32,
}

/// Facts for a single audio stream.
#[derive(Debug, Clone, Default)]
pub struct AudioStreamFact {
    pub codec_name: String,
    pub channels: u32,
    pub channel_layout: String,
    pub language: String,
}

/// Facts for a single subtitle stream.
#[derive(Debug, Clone, Default)]
pub struct SubtitleStreamFact {
    pub codec_name: String,
    pub language: String,
}

impl VideoFact {
    /// Build a fact carrying only stat-level information plus a sentinel
    /// resolution. Used when the probe step degrades.
    pub fn degraded(path: &Path, size_bytes: u64, resolution: &str) -> Self {
        VideoFact {
            path: path.to_path_buf(),
            ext: extension_of(path),
            size_bytes,
            size_gb: size_bytes as f64 / 1024.0 / 1024.0 / 1024.0,
            resolution: resolution.to_string(),
            probe_failed: true,
            ..VideoFact::default()
        }
    }

    /// Audio streams sorted by language tag, ties keeping container order.
    pub fn audio_sorted_by_language(&self) -> Vec<AudioStreamFact> {
        let mut sorted = self.audio_streams.clone();
        sorted.sort_by(|a, b| a.language.cmp(&b.language));
        sorted
    }

    /// Subtitle streams sorted by language tag, ties keeping container order.
    pub fn subtitles_sorted_by_language(&self) -> Vec<SubtitleStreamFact> {
        let mut sorted = self.subtitles.clone();
        sorted.sort_by(|a, b| a.language.cmp(&b.language));
        sorted
    }
}

/// Extension of a path including the leading dot, lowercased; empty string
/// when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
