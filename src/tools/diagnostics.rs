use super::contracts::TOOL_LIST_TRANSCRIPTS;
use crate::TranscriptError;

/// Turn a failed fetch or listing into the message returned to the client.
///
/// Named categories get a fixed sentence; only unrecognized failures carry the
/// underlying error text.
pub fn describe_failure(
    error: &TranscriptError,
    video_id: &str,
    languages: Option<&[String]>,
) -> String {
    match error {
        TranscriptError::TranscriptsDisabled => {
            format!("Error: Transcripts are disabled for video '{}'.", video_id)
        }
        TranscriptError::NoTranscriptFound { .. } => {
            let requested = match languages {
                Some(languages) if !languages.is_empty() => languages.join(", "),
                _ => "any".to_string(),
            };
            format!(
                "Error: No transcript found for video '{}' in language(s): {}. \
                 Use {} to see available languages.",
                video_id, requested, TOOL_LIST_TRANSCRIPTS
            )
        }
        TranscriptError::VideoUnavailable => format!("Error: Video '{}' is unavailable.", video_id),
        TranscriptError::InvalidVideoId => {
            format!("Error: '{}' is not a valid YouTube video ID.", video_id)
        }
        TranscriptError::AgeRestricted => format!(
            "Error: Video '{}' is age-restricted and cannot be accessed.",
            video_id
        ),
        TranscriptError::IpBlocked => {
            "Error: YouTube is blocking requests from this IP address.".to_string()
        }
        TranscriptError::RequestBlocked => "Error: The request to YouTube was blocked.".to_string(),
        other => format!("Error fetching transcript for '{}': {}", video_id, other),
    }
}
