//! FFprobe service for extracting video facts.
//!
//! One corrupt file must never block processing of its siblings: a probe
//! failure degrades to a [`VideoFact`] with a sentinel resolution instead
//! of an error, so the operator can still see and act on the file.

use crate::models::video::{
    extension_of, AudioStreamFact, SubtitleStreamFact, VideoFact, VideoStreamFact,
    RESOLUTION_ERROR, RESOLUTION_NO_VIDEO, RESOLUTION_UNKNOWN,
};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

/// FFprobe output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: FfprobeFormat,
}

/// FFprobe format information.
#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

/// FFprobe stream information.
#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    profile: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    channels: Option<u32>,
    channel_layout: Option<String>,
    #[serde(default)]
    disposition: HashMap<String, i64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl FfprobeStream {
    fn language(&self) -> String {
        self.tags.get("language").cloned().unwrap_or_default()
    }

    fn is_attached_pic(&self) -> bool {
        self.disposition.get("attached_pic").copied() == Some(1)
    }
}

/// Check if ffprobe is installed.
pub fn is_installed() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn run_probe(path: &Path) -> Result<FfprobeOutput> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(Error::other(format!("ffprobe failed for: {}", path.display())));
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

// real video streams, embedded cover art excluded; a video stream without
// dimensions means the output cannot be trusted
fn video_stream_facts(probe: &FfprobeOutput) -> Result<Vec<VideoStreamFact>> {
    let mut streams = Vec::new();
    for s in &probe.streams {
        if s.codec_type != "video" || s.is_attached_pic() {
            continue;
        }
        let (Some(width), Some(height)) = (s.width, s.height) else {
            return Err(Error::other("video stream without dimensions"));
        };
        streams.push(VideoStreamFact {
            codec_name: s.codec_name.clone().unwrap_or_default(),
            profile: s.profile.clone().unwrap_or_default(),
            width,
            height,
        });
    }
    Ok(streams)
}

fn audio_stream_facts(probe: &FfprobeOutput) -> Vec<AudioStreamFact> {
    probe
        .streams
        .iter()
        .filter(|s| s.codec_type == "audio")
        .map(|s| AudioStreamFact {
            codec_name: s.codec_name.clone().unwrap_or_default(),
            channels: s.channels.unwrap_or(0),
            channel_layout: s.channel_layout.clone().unwrap_or_default(),
            language: s.language(),
        })
        .collect()
}

fn subtitle_stream_facts(probe: &FfprobeOutput) -> Vec<SubtitleStreamFact> {
    probe
        .streams
        .iter()
        .filter(|s| s.codec_type == "subtitle")
        .map(|s| SubtitleStreamFact {
            codec_name: s.codec_name.clone().unwrap_or_default(),
            language: s.language(),
        })
        .collect()
}

fn image_stream_count(probe: &FfprobeOutput) -> usize {
    probe
        .streams
        .iter()
        .filter(|s| s.codec_type == "image" || (s.codec_type == "video" && s.is_attached_pic()))
        .count()
}

/// Probe one file into a [`VideoFact`].
///
/// An unreadable file is an error; everything after the stat degrades to a
/// sentinel fact rather than failing.
pub fn probe_video(path: &Path) -> Result<VideoFact> {
    let metadata = std::fs::metadata(path)?;
    let size_bytes = metadata.len();

    let probe = match run_probe(path) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!("probe failed for {}: {e}", path.display());
            return Ok(VideoFact::degraded(path, size_bytes, RESOLUTION_UNKNOWN));
        }
    };

    let video_streams = match video_stream_facts(&probe) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("unusable probe output for {}: {e}", path.display());
            return Ok(VideoFact::degraded(path, size_bytes, RESOLUTION_ERROR));
        }
    };
    if video_streams.is_empty() {
        return Ok(VideoFact::degraded(path, size_bytes, RESOLUTION_NO_VIDEO));
    }

    let video = video_streams[0].clone();
    let resolution = if video_streams.len() > 1 {
        // multiple video streams - use the first, note the extras
        format!(
            "{}x{} (+{})",
            video.width,
            video.height,
            video_streams.len() - 1
        )
    } else {
        format!("{}x{}", video.width, video.height)
    };

    Ok(VideoFact {
        path: path.to_path_buf(),
        ext: extension_of(path),
        size_bytes,
        size_gb: size_bytes as f64 / 1024.0 / 1024.0 / 1024.0,
        duration: parse_or_default(probe.format.duration.as_deref()),
        bit_rate: parse_or_default(probe.format.bit_rate.as_deref()),
        resolution,
        resolution_w: video.width,
        resolution_h: video.height,
        video,
        audio_streams: audio_stream_facts(&probe),
        subtitles: subtitle_stream_facts(&probe),
        image_streams: image_stream_count(&probe),
        probe_failed: false,
    })
}

fn parse_or_default<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}
