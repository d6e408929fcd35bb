//! Video equivalence and ranking.
//!
//! `basically_same` is a coarse multi-field fingerprint, not a content
//! hash: two encodes matching on every field are treated as identical.
//! Codec and profile rank by plain string order, which only happens to
//! resemble a real quality preference. Both behaviors are relied upon by
//! the decision flow and stay as they are.

use crate::models::video::{AudioStreamFact, VideoFact};
use crate::utils::fs::extension_rank;

/// Lazy "close enough" equivalence between two video files.
pub fn basically_same(a: &VideoFact, b: &VideoFact) -> bool {
    a.ext == b.ext
        && a.size_bytes == b.size_bytes
        && a.duration == b.duration
        && a.bit_rate == b.bit_rate
        && a.resolution == b.resolution
        && a.video.codec_name == b.video.codec_name
        && a.video.profile == b.video.profile
        && a.audio_streams.len() == b.audio_streams.len()
        && a.image_streams == b.image_streams
        && a.subtitles.len() == b.subtitles.len()
}

/// True when every candidate is `basically_same` as the first. A single
/// candidate is never "all the same".
pub fn all_basically_same(videos: &[VideoFact]) -> bool {
    match videos.split_first() {
        Some((first, rest)) if !rest.is_empty() => {
            rest.iter().all(|v| basically_same(first, v))
        }
        _ => false,
    }
}

/// Attributes a group of candidates is ranked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Ext,
    Size,
    Resolution,
    Codec,
    Profile,
    Duration,
    Bitrate,
}

/// All ranked attributes, in presentation order.
pub const ATTRIBUTES: [Attribute; 7] = [
    Attribute::Ext,
    Attribute::Size,
    Attribute::Resolution,
    Attribute::Codec,
    Attribute::Profile,
    Attribute::Duration,
    Attribute::Bitrate,
];

impl Attribute {
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Ext => "Ext",
            Attribute::Size => "Size",
            Attribute::Resolution => "Resolution",
            Attribute::Codec => "Codec",
            Attribute::Profile => "Profile",
            Attribute::Duration => "Duration",
            Attribute::Bitrate => "Bitrate",
        }
    }

    /// Display value of this attribute for one candidate.
    pub fn value(&self, v: &VideoFact) -> String {
        match self {
            Attribute::Ext => v.ext.clone(),
            Attribute::Size => format!("{:.2}", v.size_gb),
            Attribute::Resolution => v.resolution.clone(),
            Attribute::Codec => v.video.codec_name.clone(),
            Attribute::Profile => v.video.profile.clone(),
            Attribute::Duration => format!("{:.2}", v.duration),
            Attribute::Bitrate => v.bit_rate.to_string(),
        }
    }

    pub fn equal(&self, a: &VideoFact, b: &VideoFact) -> bool {
        match self {
            Attribute::Ext => a.ext == b.ext,
            Attribute::Size => a.size_bytes == b.size_bytes,
            Attribute::Resolution => a.resolution == b.resolution,
            Attribute::Codec => a.video.codec_name == b.video.codec_name,
            Attribute::Profile => a.video.profile == b.video.profile,
            Attribute::Duration => a.duration == b.duration,
            Attribute::Bitrate => a.bit_rate == b.bit_rate,
        }
    }

    /// True when `a` beats `b` on this attribute alone.
    pub fn better(&self, a: &VideoFact, b: &VideoFact) -> bool {
        match self {
            // lower preference rank wins, unknown extensions lose to known
            Attribute::Ext => {
                rank_or_worst(&a.ext) < rank_or_worst(&b.ext)
            }
            Attribute::Size => a.size_bytes > b.size_bytes,
            // raw pixel area, not aspect aware
            Attribute::Resolution => {
                u64::from(a.resolution_w) * u64::from(a.resolution_h)
                    > u64::from(b.resolution_w) * u64::from(b.resolution_h)
            }
            Attribute::Codec => a.video.codec_name > b.video.codec_name,
            Attribute::Profile => a.video.profile > b.video.profile,
            Attribute::Duration => a.duration > b.duration,
            Attribute::Bitrate => a.bit_rate > b.bit_rate,
        }
    }
}

fn rank_or_worst(ext: &str) -> usize {
    extension_rank(ext).unwrap_or(usize::MAX)
}

/// Index of the best candidate for an attribute; ties keep the first seen.
pub fn best_index(attr: Attribute, videos: &[VideoFact]) -> usize {
    let mut best = 0;
    for (i, v) in videos.iter().enumerate().skip(1) {
        if attr.better(v, &videos[best]) {
            best = i;
        }
    }
    best
}

/// Best audio stream at one sorted-by-language position: most channels
/// wins, first seen on ties; `None` when no candidate has a stream there.
pub fn best_audio_index(streams: &[Option<&AudioStreamFact>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, stream) in streams.iter().enumerate() {
        let Some(stream) = stream else { continue };
        match best {
            None => best = Some(i),
            Some(b) => {
                let current = streams[b].map(|s| s.channels).unwrap_or(0);
                if stream.channels > current {
                    best = Some(i);
                }
            }
        }
    }
    best
}
