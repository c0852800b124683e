use serde::Deserialize;
use serde_json::{json, Value};

use crate::output::OutputFormat;

pub const TOOL_GET_TRANSCRIPT: &str = "get_transcript";
pub const TOOL_SUMMARIZE_TRANSCRIPT: &str = "summarize_transcript";
pub const TOOL_LIST_TRANSCRIPTS: &str = "list_transcripts";

pub const DEFAULT_FORMAT: &str = "text";

#[derive(Debug, Clone, Deserialize)]
pub struct GetTranscriptArgs {
    pub url: String,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub preserve_formatting: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeTranscriptArgs {
    pub url: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTranscriptsArgs {
    pub url: String,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn url_property() -> Value {
    json!({
        "type": "string",
        "description": "YouTube video URL or video ID"
    })
}

fn languages_property() -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": "Preferred languages in priority order (e.g. [\"en\", \"de\"]). Defaults to English."
    })
}

pub fn get_transcript_schema() -> Value {
    let formats: Vec<&str> = OutputFormat::ALL.iter().map(|format| format.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "url": url_property(),
            "languages": languages_property(),
            "format": {
                "type": "string",
                "enum": formats,
                "default": DEFAULT_FORMAT,
                "description": format!("Output format, one of: {}", OutputFormat::choices())
            },
            "preserve_formatting": {
                "type": "boolean",
                "default": false,
                "description": "Keep HTML formatting tags in the transcript text"
            }
        },
        "required": ["url"]
    })
}

pub fn summarize_transcript_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "url": url_property(),
            "prompt": {
                "type": "string",
                "description": "Custom summarization instructions. If omitted, a default summary prompt is used."
            },
            "languages": languages_property()
        },
        "required": ["url"]
    })
}

pub fn list_transcripts_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "url": url_property()
        },
        "required": ["url"]
    })
}

pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": TOOL_GET_TRANSCRIPT,
            "description": "Fetch a YouTube video's transcript.",
            "inputSchema": get_transcript_schema()
        }),
        json!({
            "name": TOOL_SUMMARIZE_TRANSCRIPT,
            "description": "Fetch a YouTube video's transcript and return it with summarization instructions. \
                            The client should use the returned instructions and transcript to produce a summary.",
            "inputSchema": summarize_transcript_schema()
        }),
        json!({
            "name": TOOL_LIST_TRANSCRIPTS,
            "description": "List available transcript languages for a YouTube video.",
            "inputSchema": list_transcripts_schema()
        }),
    ]
}
