//! The three transcript tools.
//!
//! Every handler returns a plain string: either the rendered result or a diagnostic
//! starting with `Error`. Nothing raised by the provider escapes to the caller.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub mod contracts;
pub mod diagnostics;

use crate::config::TranscriptConfig;
use crate::output::{self, OutputFormat};
use crate::provider::TranscriptProvider;
use crate::video_id::extract_video_id;

use contracts::{
    GetTranscriptArgs, ListTranscriptsArgs, SummarizeTranscriptArgs, TOOL_GET_TRANSCRIPT,
    TOOL_LIST_TRANSCRIPTS, TOOL_SUMMARIZE_TRANSCRIPT,
};
use diagnostics::describe_failure;

/// Errors raised before a tool runs; these become JSON-RPC errors rather than tool text
#[derive(thiserror::Error, Debug)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Request handlers backed by an injected transcript provider
pub struct TranscriptTools {
    provider: Arc<dyn TranscriptProvider>,
    defaults: TranscriptConfig,
}

impl TranscriptTools {
    pub fn new(provider: Arc<dyn TranscriptProvider>, defaults: TranscriptConfig) -> Self {
        Self { provider, defaults }
    }

    /// Dispatch a tool call by name with JSON arguments
    pub async fn call(&self, name: &str, arguments: Value) -> Result<String, ToolCallError> {
        tracing::debug!("Calling tool {} with {}", name, arguments);

        match name {
            TOOL_GET_TRANSCRIPT => {
                let args: GetTranscriptArgs = parse_arguments(name, arguments)?;
                Ok(self
                    .get_transcript(
                        &args.url,
                        args.languages,
                        &args.format,
                        args.preserve_formatting,
                    )
                    .await)
            }
            TOOL_SUMMARIZE_TRANSCRIPT => {
                let args: SummarizeTranscriptArgs = parse_arguments(name, arguments)?;
                Ok(self
                    .summarize_transcript(&args.url, args.prompt, args.languages)
                    .await)
            }
            TOOL_LIST_TRANSCRIPTS => {
                let args: ListTranscriptsArgs = parse_arguments(name, arguments)?;
                Ok(self.list_transcripts(&args.url).await)
            }
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    /// Fetch a transcript and render it in the requested format
    pub async fn get_transcript(
        &self,
        url: &str,
        languages: Option<Vec<String>>,
        format: &str,
        preserve_formatting: bool,
    ) -> String {
        let video_id = match extract_video_id(url) {
            Ok(video_id) => video_id,
            Err(e) => return format!("Error: {}", e),
        };

        let format: OutputFormat = match format.parse() {
            Ok(format) => format,
            Err(e) => return format!("Error: {}", e),
        };

        let languages = self.languages_or_default(languages);

        let transcript = match self
            .provider
            .fetch(&video_id, &languages, preserve_formatting)
            .await
        {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!("Fetching transcript for {} failed: {}", video_id, e);
                return describe_failure(&e, &video_id, Some(languages.as_slice()));
            }
        };

        match output::render(&transcript, format) {
            Ok(content) => content,
            Err(e) => format!("Error fetching transcript for '{}': {:#}", video_id, e),
        }
    }

    /// Fetch a transcript and bundle it with summarization instructions for the client
    pub async fn summarize_transcript(
        &self,
        url: &str,
        prompt: Option<String>,
        languages: Option<Vec<String>>,
    ) -> String {
        let video_id = match extract_video_id(url) {
            Ok(video_id) => video_id,
            Err(e) => return format!("Error: {}", e),
        };

        let languages = self.languages_or_default(languages);

        let transcript = match self.provider.fetch(&video_id, &languages, false).await {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!("Fetching transcript for {} failed: {}", video_id, e);
                return describe_failure(&e, &video_id, Some(languages.as_slice()));
            }
        };

        let instructions = prompt
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or_else(|| self.defaults.summary_prompt.clone());
        let kind = if transcript.is_generated { "auto-generated" } else { "manual" };

        format!(
            "[INSTRUCTIONS]\n{}\n\n\
             [METADATA]\n\
             Video ID: {}\n\
             Language: {} ({})\n\
             Type: {}\n\n\
             [TRANSCRIPT]\n{}",
            instructions,
            video_id,
            transcript.language,
            transcript.language_code,
            kind,
            output::format_as_text(&transcript)
        )
    }

    /// List the transcripts available for a video
    pub async fn list_transcripts(&self, url: &str) -> String {
        let video_id = match extract_video_id(url) {
            Ok(video_id) => video_id,
            Err(e) => return format!("Error: {}", e),
        };

        let transcripts = match self.provider.list(&video_id).await {
            Ok(transcripts) => transcripts,
            Err(e) => {
                tracing::warn!("Listing transcripts for {} failed: {}", video_id, e);
                return describe_failure(&e, &video_id, None);
            }
        };

        if transcripts.is_empty() {
            return format!("No transcripts found for video '{}'.", video_id);
        }

        let mut lines = vec![format!("Available transcripts for video '{}':\n", video_id)];
        for transcript in &transcripts {
            let kind = if transcript.is_generated { "auto-generated" } else { "manual" };
            let translatable = if transcript.is_translatable {
                "translatable"
            } else {
                "not translatable"
            };
            lines.push(format!(
                "  - {} ({}) [{}, {}]",
                transcript.language, transcript.language_code, kind, translatable
            ));
        }

        lines.join("\n")
    }

    fn languages_or_default(&self, languages: Option<Vec<String>>) -> Vec<String> {
        languages
            .filter(|languages| !languages.is_empty())
            .unwrap_or_else(|| self.defaults.default_languages.clone())
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolCallError> {
    // Clients may omit arguments entirely
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };

    serde_json::from_value(arguments).map_err(|source| ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        FetchedTranscript, MockTranscriptProvider, TranscriptInfo, TranscriptSnippet,
    };
    use crate::TranscriptError;
    use serde_json::json;

    fn transcript(is_generated: bool) -> FetchedTranscript {
        FetchedTranscript {
            video_id: "dQw4w9WgXcQ".to_string(),
            language: if is_generated { "English (auto-generated)" } else { "English" }.to_string(),
            language_code: "en".to_string(),
            is_generated,
            snippets: vec![
                TranscriptSnippet {
                    text: "Never gonna give you up".to_string(),
                    start: 0.0,
                    duration: 2.0,
                },
                TranscriptSnippet {
                    text: "Never gonna let you down".to_string(),
                    start: 2.0,
                    duration: 2.0,
                },
            ],
        }
    }

    fn tools(provider: MockTranscriptProvider) -> TranscriptTools {
        TranscriptTools::new(Arc::new(provider), TranscriptConfig::default())
    }

    #[tokio::test]
    async fn test_invalid_reference_skips_provider() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch().never();
        provider.expect_list().never();
        let tools = tools(provider);

        assert_eq!(
            tools.get_transcript("not a video", None, "text", false).await,
            "Error: Could not extract a YouTube video ID from: not a video"
        );
        assert!(tools
            .summarize_transcript("https://vimeo.com/1", None, None)
            .await
            .starts_with("Error: Could not extract"));
        assert!(tools.list_transcripts("").await.starts_with("Error: Could not extract"));
    }

    #[tokio::test]
    async fn test_unknown_format_skips_provider() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch().never();

        let result = tools(provider)
            .get_transcript("dQw4w9WgXcQ", None, "bogus", false)
            .await;

        assert_eq!(
            result,
            "Error: Unknown format 'bogus'. Choose from: json, pretty, text, webvtt, srt"
        );
    }

    #[tokio::test]
    async fn test_get_transcript_defaults_to_english_text() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .withf(|video_id, languages, preserve| {
                video_id == "dQw4w9WgXcQ" && languages == ["en"] && !*preserve
            })
            .times(1)
            .returning(|_, _, _| Ok(transcript(false)));

        let result = tools(provider)
            .get_transcript("https://youtu.be/dQw4w9WgXcQ?t=30", Some(Vec::new()), "text", false)
            .await;

        assert_eq!(result, "Never gonna give you up\nNever gonna let you down");
    }

    #[tokio::test]
    async fn test_get_transcript_passes_preferences_through() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .withf(|_, languages, preserve| languages == ["de", "en"] && *preserve)
            .times(1)
            .returning(|_, _, _| Ok(transcript(false)));

        let result = tools(provider)
            .get_transcript(
                "dQw4w9WgXcQ",
                Some(vec!["de".to_string(), "en".to_string()]),
                "srt",
                true,
            )
            .await;

        assert!(result.starts_with("1\n00:00:00,000 --> 00:00:02,000\nNever gonna give you up"));
    }

    #[tokio::test]
    async fn test_no_transcript_points_to_listing() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch().times(1).returning(|_, languages, _| {
            Err(TranscriptError::NoTranscriptFound { requested: languages.to_vec() })
        });

        let result = tools(provider)
            .get_transcript("dQw4w9WgXcQ", Some(vec!["de".to_string()]), "text", false)
            .await;

        assert_eq!(
            result,
            "Error: No transcript found for video 'dQw4w9WgXcQ' in language(s): de. \
             Use list_transcripts to see available languages."
        );
    }

    #[tokio::test]
    async fn test_summarize_reports_generated_transcripts() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .times(1)
            .returning(|_, _, _| Ok(transcript(true)));

        let result = tools(provider)
            .summarize_transcript("dQw4w9WgXcQ", None, None)
            .await;

        let expected = format!(
            "[INSTRUCTIONS]\n{}\n\n[METADATA]\nVideo ID: dQw4w9WgXcQ\n\
             Language: English (auto-generated) (en)\nType: auto-generated\n\n\
             [TRANSCRIPT]\nNever gonna give you up\nNever gonna let you down",
            crate::config::DEFAULT_SUMMARY_PROMPT
        );
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_summarize_uses_custom_prompt_and_reports_manual() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .withf(|_, _, preserve| !*preserve)
            .times(1)
            .returning(|_, _, _| Ok(transcript(false)));

        let result = tools(provider)
            .summarize_transcript("dQw4w9WgXcQ", Some("List the jokes.".to_string()), None)
            .await;

        assert!(result.starts_with("[INSTRUCTIONS]\nList the jokes.\n\n[METADATA]"));
        assert!(result.contains("Type: manual"));
        assert!(!result.contains("auto-generated"));
    }

    #[tokio::test]
    async fn test_summarize_empty_prompt_uses_default() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .times(1)
            .returning(|_, _, _| Ok(transcript(false)));

        let result = tools(provider)
            .summarize_transcript("dQw4w9WgXcQ", Some(String::new()), None)
            .await;

        let instructions = format!(
            "[INSTRUCTIONS]\n{}\n\n[METADATA]",
            crate::config::DEFAULT_SUMMARY_PROMPT
        );
        assert!(result.starts_with(&instructions));
    }

    #[tokio::test]
    async fn test_summarize_translates_failures() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .returning(|_, _, _| Err(TranscriptError::TranscriptsDisabled));

        let result = tools(provider)
            .summarize_transcript("dQw4w9WgXcQ", None, None)
            .await;

        assert_eq!(result, "Error: Transcripts are disabled for video 'dQw4w9WgXcQ'.");
    }

    #[tokio::test]
    async fn test_list_transcripts() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_list()
            .withf(|video_id| video_id == "dQw4w9WgXcQ")
            .returning(|_| {
                Ok(vec![
                    TranscriptInfo {
                        language: "English".to_string(),
                        language_code: "en".to_string(),
                        is_generated: false,
                        is_translatable: true,
                    },
                    TranscriptInfo {
                        language: "German (auto-generated)".to_string(),
                        language_code: "de".to_string(),
                        is_generated: true,
                        is_translatable: false,
                    },
                ])
            });

        let result = tools(provider)
            .list_transcripts("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await;

        assert_eq!(
            result,
            "Available transcripts for video 'dQw4w9WgXcQ':\n\n\
             \x20 - English (en) [manual, translatable]\n\
             \x20 - German (auto-generated) (de) [auto-generated, not translatable]"
        );
    }

    #[tokio::test]
    async fn test_list_transcripts_empty_and_failure() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_list().times(1).returning(|_| Ok(Vec::new()));
        assert_eq!(
            tools(provider).list_transcripts("dQw4w9WgXcQ").await,
            "No transcripts found for video 'dQw4w9WgXcQ'."
        );

        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_list()
            .returning(|_| Err(TranscriptError::NoTranscriptFound { requested: Vec::new() }));
        assert!(tools(provider)
            .list_transcripts("dQw4w9WgXcQ")
            .await
            .contains("in language(s): any."));
    }

    #[tokio::test]
    async fn test_call_dispatches_by_name() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .returning(|_, _, _| Ok(transcript(false)));
        let tools = tools(provider);

        let result = tools
            .call(TOOL_GET_TRANSCRIPT, json!({ "url": "dQw4w9WgXcQ", "format": "json" }))
            .await
            .unwrap();
        assert!(result.starts_with("[{"));

        assert!(matches!(
            tools.call("delete_video", json!({})).await,
            Err(ToolCallError::UnknownTool(_))
        ));
        assert!(matches!(
            tools.call(TOOL_LIST_TRANSCRIPTS, Value::Null).await,
            Err(ToolCallError::InvalidArguments { .. })
        ));
    }
}
