use std::fmt;
use std::str::FromStr;

use crate::provider::FetchedTranscript;
use crate::{Result, TranscriptError};

pub mod formatters;

pub use formatters::*;

/// Output formats a transcript can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact JSON array of snippets
    Json,
    /// Indented JSON array of snippets
    Pretty,
    /// Plain text, one snippet per line
    Text,
    /// WebVTT subtitles
    Webvtt,
    /// SRT subtitles
    Srt,
}

impl OutputFormat {
    /// Every format, in the order they are advertised
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Json,
        OutputFormat::Pretty,
        OutputFormat::Text,
        OutputFormat::Webvtt,
        OutputFormat::Srt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Pretty => "pretty",
            OutputFormat::Text => "text",
            OutputFormat::Webvtt => "webvtt",
            OutputFormat::Srt => "srt",
        }
    }

    /// Comma separated list of valid format names
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|format| format.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for OutputFormat {
    type Err = TranscriptError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == name)
            .ok_or_else(|| TranscriptError::UnknownFormat(name.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a transcript in the requested format
pub fn render(transcript: &FetchedTranscript, format: OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Json => format_as_json(transcript)?,
        OutputFormat::Pretty => format_as_pretty(transcript)?,
        OutputFormat::Text => format_as_text(transcript),
        OutputFormat::Webvtt => format_as_webvtt(transcript),
        OutputFormat::Srt => format_as_srt(transcript),
    };

    Ok(content)
}
