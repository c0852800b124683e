use regex::Regex;
use std::sync::OnceLock;

use crate::TranscriptError;

fn bare_id_regex() -> &'static Regex {
    static BARE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    BARE_ID_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Failed to compile bare video id regex")
    })
}

fn url_id_regex() -> &'static Regex {
    static URL_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_ID_REGEX.get_or_init(|| {
        Regex::new(
            r"(?:youtube\.com/watch\?.*v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([A-Za-z0-9_-]{11})",
        )
        .expect("Failed to compile video URL regex")
    })
}

/// Extract a canonical video id from a bare id or a YouTube URL.
///
/// A string that is itself a valid 11-character id is returned unchanged, even if it
/// could also be read as a URL fragment. Otherwise the first id found after one of the
/// watch, short-link, embed or shorts prefixes wins. Whether the video exists is left
/// to the provider.
pub fn extract_video_id(url_or_id: &str) -> Result<String, TranscriptError> {
    let input = url_or_id.trim();

    if bare_id_regex().is_match(input) {
        return Ok(input.to_string());
    }

    url_id_regex()
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| TranscriptError::InvalidReference(input.to_string()))
}

/// True if the value passed to a provider looks like a URL rather than an id
pub fn looks_like_url(video_id: &str) -> bool {
    video_id.starts_with("http://") || video_id.starts_with("https://")
}
