//! YouTube Summary - An MCP server that exposes YouTube transcripts to LLM clients
//!
//! This library normalizes video references, fetches transcripts through a pluggable
//! provider, renders them in one of several text formats, and serves the result as MCP
//! tools over stdio. Every failure crossing the tool boundary is turned into a plain string.

pub mod cli;
pub mod config;
pub mod output;
pub mod provider;
pub mod server;
pub mod tools;
pub mod video_id;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use output::OutputFormat;
pub use provider::{FetchedTranscript, TranscriptInfo, TranscriptProvider, TranscriptSnippet};
pub use server::McpServer;
pub use tools::TranscriptTools;
pub use video_id::extract_video_id;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to transcript retrieval
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Could not extract a YouTube video ID from: {0}")]
    InvalidReference(String),

    #[error("Unknown format '{0}'. Choose from: {choices}", choices = OutputFormat::choices())]
    UnknownFormat(String),

    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("No transcript found for any of the requested languages: {}", .requested.join(", "))]
    NoTranscriptFound { requested: Vec<String> },

    #[error("The video is unavailable")]
    VideoUnavailable,

    #[error("Invalid video id")]
    InvalidVideoId,

    #[error("The video is age-restricted")]
    AgeRestricted,

    #[error("YouTube is blocking requests from this IP")]
    IpBlocked,

    #[error("YouTube blocked the request")]
    RequestBlocked,

    #[error("The video is unplayable: {0}")]
    VideoUnplayable(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Unexpected(String),
}
