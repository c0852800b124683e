use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod captions;
pub mod youtube;

pub use youtube::YoutubeProvider;

use crate::TranscriptError;

/// A single timed line of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSnippet {
    /// Caption text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// A transcript as returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTranscript {
    /// Canonical video id the transcript belongs to
    pub video_id: String,

    /// Human readable language name, e.g. "English (auto-generated)"
    pub language: String,

    /// Language code, e.g. "en"
    pub language_code: String,

    /// Whether the transcript was produced by automatic speech recognition
    pub is_generated: bool,

    /// Timed snippets in playback order
    pub snippets: Vec<TranscriptSnippet>,
}

impl FetchedTranscript {
    /// Plain text of all snippets, one per line
    pub fn text(&self) -> String {
        self.snippets
            .iter()
            .map(|snippet| snippet.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Description of a transcript available for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptInfo {
    /// Human readable language name
    pub language: String,

    /// Language code
    pub language_code: String,

    /// Whether the transcript is auto-generated
    pub is_generated: bool,

    /// Whether the platform can translate this transcript into other languages
    pub is_translatable: bool,
}

/// Source of transcripts for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the first transcript matching the language preferences, in priority order
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
        preserve_formatting: bool,
    ) -> Result<FetchedTranscript, TranscriptError>;

    /// List every transcript available for the video
    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptInfo>, TranscriptError>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_snippets_by_line() {
        let transcript = FetchedTranscript {
            video_id: "dQw4w9WgXcQ".to_string(),
            language: "English".to_string(),
            language_code: "en".to_string(),
            is_generated: false,
            snippets: vec![
                TranscriptSnippet { text: "first".to_string(), start: 0.0, duration: 1.0 },
                TranscriptSnippet { text: "second".to_string(), start: 1.0, duration: 1.0 },
            ],
        };

        assert_eq!(transcript.text(), "first\nsecond");
    }
}
