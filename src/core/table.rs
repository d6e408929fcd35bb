//! Side-by-side comparison tables for candidate video files.
//!
//! The table is built as plain cells with a tone first, then rendered with
//! colors. The tones carry the decision-relevant banding: near-identical
//! durations and resolutions show as equivalent rather than better/worse,
//! bitrate within 1% of the first candidate shows as close, and
//! non-English audio is flagged no matter how many channels it has.

use crate::core::compare::{
    all_basically_same, best_audio_index, best_index, Attribute, ATTRIBUTES,
};
use crate::models::video::VideoFact;
use crate::utils::term::print_indented;
use colored::Colorize;

/// How a cell relates to the other cells of its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Whole candidate group is basically the same.
    Identical,
    /// Winner of the row (or tied with it).
    Best,
    /// Loses the row.
    Worse,
    /// Within the "treat as equivalent" band of the first candidate.
    CloseEnough,
    /// Within the "close" band of the first candidate.
    Close,
    /// Audio/subtitle stream in a non-English language.
    Foreign,
    /// No stream at this position for this candidate.
    Blank,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// A fully built comparison, ready to render or assert on.
#[derive(Debug, Clone)]
pub struct ComparisonTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Build the comparison for a group of candidates under the given column
/// headers.
pub fn build_comparison(headers: &[String], videos: &[VideoFact]) -> ComparisonTable {
    let same = all_basically_same(videos);

    let mut rows = Vec::new();
    for attr in ATTRIBUTES {
        rows.push(attribute_row(attr, videos, same));
    }
    audio_rows(videos, same, &mut rows);
    subtitle_rows(videos, same, &mut rows);

    ComparisonTable {
        headers: headers.to_vec(),
        rows,
    }
}

fn attribute_row(attr: Attribute, videos: &[VideoFact], same: bool) -> TableRow {
    let best = best_index(attr, videos);
    let first = &videos[0];

    let cells = videos
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let text = attr.value(v);
            let tone = if same {
                Tone::Identical
            } else {
                attribute_tone(attr, v, first, i, best, videos)
            };
            Cell { text, tone }
        })
        .collect();

    TableRow {
        label: attr.label().to_string(),
        cells,
    }
}

fn attribute_tone(
    attr: Attribute,
    v: &VideoFact,
    first: &VideoFact,
    index: usize,
    best: usize,
    videos: &[VideoFact],
) -> Tone {
    match attr {
        Attribute::Duration => {
            let diff = (v.duration - first.duration).abs();
            if diff < 5.0 {
                return Tone::CloseEnough;
            }
            if diff < 10.0 {
                return Tone::Close;
            }
        }
        Attribute::Resolution => {
            let diff_w = (i64::from(v.resolution_w) - i64::from(first.resolution_w)).abs();
            let diff_h = (i64::from(v.resolution_h) - i64::from(first.resolution_h)).abs();
            let diff = diff_w + diff_h;
            if diff > 0 && diff < 10 {
                return Tone::CloseEnough;
            }
            if (10..20).contains(&diff) {
                return Tone::Close;
            }
        }
        Attribute::Bitrate => {
            let reference = first.bit_rate as f64;
            if reference > 0.0 {
                let diff = ((v.bit_rate as f64) - reference).abs() / reference;
                if diff < 0.01 {
                    return Tone::Close;
                }
            }
        }
        _ => {}
    }

    if index == best || attr.equal(v, &videos[best]) {
        Tone::Best
    } else {
        Tone::Worse
    }
}

fn audio_rows(videos: &[VideoFact], same: bool, rows: &mut Vec<TableRow>) {
    let sorted: Vec<_> = videos.iter().map(|v| v.audio_sorted_by_language()).collect();
    let max_streams = sorted.iter().map(Vec::len).max().unwrap_or(0);

    for position in 0..max_streams {
        let streams: Vec<_> = sorted.iter().map(|s| s.get(position)).collect();
        let best = best_audio_index(&streams);

        let cells = streams
            .iter()
            .enumerate()
            .map(|(i, stream)| match stream {
                None => Cell {
                    text: String::new(),
                    tone: Tone::Blank,
                },
                Some(stream) => {
                    let text = format!(
                        "{} {} ({})",
                        stream.codec_name, stream.channel_layout, stream.language
                    );
                    let tone = if same {
                        Tone::Identical
                    } else if stream.language != "eng" {
                        Tone::Foreign
                    } else if best == Some(i) {
                        Tone::Best
                    } else {
                        Tone::Worse
                    };
                    Cell { text, tone }
                }
            })
            .collect();

        rows.push(TableRow {
            label: format!("Audio {}", position + 1),
            cells,
        });
    }
}

fn subtitle_rows(videos: &[VideoFact], same: bool, rows: &mut Vec<TableRow>) {
    let sorted: Vec<_> = videos
        .iter()
        .map(|v| v.subtitles_sorted_by_language())
        .collect();
    let max_streams = sorted.iter().map(Vec::len).max().unwrap_or(0);

    for position in 0..max_streams {
        let cells = sorted
            .iter()
            .map(|streams| match streams.get(position) {
                None => Cell {
                    text: String::new(),
                    tone: Tone::Blank,
                },
                Some(stream) => {
                    let text = format!("{} ({})", stream.language, stream.codec_name);
                    let tone = if same {
                        Tone::Identical
                    } else if stream.language == "eng" {
                        Tone::Best
                    } else {
                        Tone::Foreign
                    };
                    Cell { text, tone }
                }
            })
            .collect();

        rows.push(TableRow {
            label: format!("Subtitle {}", position + 1),
            cells,
        });
    }
}

/// Render a built comparison to stdout, indented.
pub fn render_comparison(indent: usize, table: &ComparisonTable) {
    let label_width = table
        .rows
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(0);

    let columns = table.headers.len();
    let mut widths: Vec<usize> = table.headers.iter().map(String::len).collect();
    for row in &table.rows {
        for (i, cell) in row.cells.iter().enumerate().take(columns) {
            if cell.text.len() > widths[i] {
                widths[i] = cell.text.len();
            }
        }
    }

    let mut out = String::new();

    let mut header = format!("{:label_width$}", "");
    for (i, h) in table.headers.iter().enumerate() {
        let padded = format!("{:width$}", h, width = widths[i]);
        header.push_str("  ");
        header.push_str(&padded.bold().to_string());
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let rule_len = label_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&format!("{}\n", "-".repeat(rule_len).bright_black()));

    for row in &table.rows {
        let mut line = format!("{}", format!("{:label_width$}", row.label).bright_black());
        for (i, cell) in row.cells.iter().enumerate() {
            let padded = format!("{:width$}", cell.text, width = widths[i]);
            line.push_str("  ");
            line.push_str(&colorize(&padded, cell.tone));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    print_indented(indent, &out);
}

fn colorize(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Identical | Tone::CloseEnough => text.bright_blue().to_string(),
        Tone::Close => text.blue().to_string(),
        Tone::Best => text.green().to_string(),
        Tone::Worse => text.bright_red().to_string(),
        Tone::Foreign => text.magenta().to_string(),
        Tone::Blank => text.to_string(),
    }
}
