use anyhow::{Context, Result};

use crate::provider::{FetchedTranscript, TranscriptSnippet};

/// Format transcript as plain text, one snippet per line
pub fn format_as_text(transcript: &FetchedTranscript) -> String {
    transcript.text()
}

/// Format transcript as a compact JSON array of snippets
pub fn format_as_json(transcript: &FetchedTranscript) -> Result<String> {
    serde_json::to_string(&transcript.snippets)
        .context("Failed to serialize transcript to JSON")
}

/// Format transcript as an indented JSON array of snippets.
///
/// This is pretty-printed JSON, not the Python `pprint` repr of the snippet list.
pub fn format_as_pretty(transcript: &FetchedTranscript) -> Result<String> {
    serde_json::to_string_pretty(&transcript.snippets)
        .context("Failed to serialize transcript to JSON")
}

/// Format transcript as SRT subtitles
pub fn format_as_srt(transcript: &FetchedTranscript) -> String {
    let cues: Vec<String> = cue_times(&transcript.snippets)
        .enumerate()
        .map(|(index, (snippet, start, end))| {
            format!(
                "{}\n{} --> {}\n{}",
                index + 1,
                format_timestamp(start, ','),
                format_timestamp(end, ','),
                snippet.text
            )
        })
        .collect();

    format!("{}\n", cues.join("\n\n"))
}

/// Format transcript as WebVTT subtitles
pub fn format_as_webvtt(transcript: &FetchedTranscript) -> String {
    let cues: Vec<String> = cue_times(&transcript.snippets)
        .map(|(snippet, start, end)| {
            format!(
                "{} --> {}\n{}",
                format_timestamp(start, '.'),
                format_timestamp(end, '.'),
                snippet.text
            )
        })
        .collect();

    format!("WEBVTT\n\n{}\n", cues.join("\n\n"))
}

/// Pair each snippet with its cue window; a cue ends early if the next one starts first
fn cue_times(
    snippets: &[TranscriptSnippet],
) -> impl Iterator<Item = (&TranscriptSnippet, f64, f64)> {
    snippets.iter().enumerate().map(move |(index, snippet)| {
        let end = snippet.start + snippet.duration;
        let end = match snippets.get(index + 1) {
            Some(next) if next.start < end => next.start,
            _ => end,
        };
        (snippet, snippet.start, end)
    })
}

/// Format seconds as `HH:MM:SS<sep>mmm`
pub fn format_timestamp(seconds: f64, millis_separator: char) -> String {
    let seconds = seconds.max(0.0);
    let whole = seconds.trunc() as u64;

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let millis = ((seconds.fract() * 1000.0 * 100.0).round() / 100.0).trunc() as u64;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        millis_separator,
        millis.min(999)
    )
}
