use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tools::contracts::DEFAULT_FORMAT;

#[derive(Parser)]
#[command(
    name = "youtube-summary",
    about = "YouTube Summary - Serve YouTube transcripts to LLM clients over MCP",
    version,
    long_about = "An MCP server exposing tools to fetch YouTube transcripts, bundle them with summarization instructions, and list available transcript languages. Runs the stdio server when no subcommand is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a YAML config file
    #[arg(short, long, global = true, value_name = "FILE", env = "YOUTUBE_SUMMARY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve,

    /// Fetch a transcript and print it
    Transcript {
        /// YouTube video URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Preferred language, repeat in priority order (defaults to the configured languages)
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Output format: json, pretty, text, webvtt or srt
        #[arg(short, long, default_value = DEFAULT_FORMAT)]
        format: String,

        /// Keep HTML formatting tags in the transcript text
        #[arg(long)]
        preserve_formatting: bool,
    },

    /// Fetch a transcript bundled with summarization instructions
    Summarize {
        /// YouTube video URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Custom summarization instructions
        #[arg(short, long)]
        prompt: Option<String>,

        /// Preferred language, repeat in priority order
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,
    },

    /// List the transcript languages available for a video
    List {
        /// YouTube video URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,
    },

    /// Show or write the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}
