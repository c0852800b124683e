use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

use super::{captions, FetchedTranscript, TranscriptInfo, TranscriptProvider};
use crate::config::HttpConfig;
use crate::video_id::looks_like_url;
use crate::TranscriptError;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

const CONSENT_FORM_MARKER: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";
const BOT_CHECK_REASON: &str = "Sign in to confirm you’re not a bot";
const AGE_RESTRICTED_REASON: &str = "This video may be inappropriate for some users.";
const UNAVAILABLE_REASON: &str = "This video is unavailable";

fn api_key_regex() -> &'static Regex {
    static API_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    API_KEY_REGEX.get_or_init(|| {
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
            .expect("Failed to compile innertube key regex")
    })
}

fn consent_value_regex() -> &'static Regex {
    static CONSENT_VALUE_REGEX: OnceLock<Regex> = OnceLock::new();
    CONSENT_VALUE_REGEX.get_or_init(|| {
        Regex::new(r#"name="v" value="(.*?)""#).expect("Failed to compile consent regex")
    })
}

/// A caption track advertised by the player response
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    /// Timedtext URL for the track
    pub base_url: String,

    /// Listing metadata for the track
    pub info: TranscriptInfo,
}

/// Transcript provider backed by YouTube's web player endpoints
pub struct YoutubeProvider {
    client: Client,
    accept_language: String,
}

impl YoutubeProvider {
    pub fn new(config: &HttpConfig) -> crate::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = &config.proxy {
            tracing::info!("Routing YouTube requests through proxy: {}", proxy);
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            accept_language: config.accept_language.clone(),
        })
    }

    /// Fetch all caption tracks for a video, manual tracks first
    pub async fn caption_tracks(
        &self,
        video_id: &str,
    ) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = parse_innertube_api_key(&html)?;
        let player = self.fetch_player_response(video_id, &api_key).await?;

        check_playability(&player, video_id)?;
        parse_caption_tracks(&player)
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let html = self.get_watch_page(video_id, None).await?;

        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        tracing::debug!(
            "Consent interstitial served for {}, retrying with consent cookie",
            video_id
        );

        let consent = consent_value_regex()
            .captures(&html)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_string())
            .ok_or_else(|| {
                TranscriptError::Unexpected("Failed to read the YouTube consent form".to_string())
            })?;

        let html = self.get_watch_page(video_id, Some(&consent)).await?;
        if html.contains(CONSENT_FORM_MARKER) {
            return Err(TranscriptError::Unexpected(
                "Failed to create a YouTube consent cookie".to_string(),
            ));
        }

        Ok(html)
    }

    async fn get_watch_page(
        &self,
        video_id: &str,
        consent: Option<&str>,
    ) -> Result<String, TranscriptError> {
        let mut request = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .header(header::ACCEPT_LANGUAGE, &self.accept_language);

        if let Some(consent) = consent {
            request = request.header(header::COOKIE, format!("CONSENT=YES+{}", consent));
        }

        let response = request.send().await?;
        let response = check_status(response)?;
        Ok(response.text().await?)
    }

    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<Value, TranscriptError> {
        tracing::debug!("Requesting player response for {}", video_id);

        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key)])
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response)?;
        Ok(response.json::<Value>().await?)
    }

    async fn fetch_track(
        &self,
        track: &CaptionTrack,
        preserve_formatting: bool,
    ) -> Result<Vec<super::TranscriptSnippet>, TranscriptError> {
        let url = timedtext_url(&track.base_url)?;

        tracing::debug!("Downloading caption track {}", track.info.language_code);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        let response = check_status(response)?;
        let xml = response.text().await?;
        captions::parse_timedtext(&xml, preserve_formatting)
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeProvider {
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
        preserve_formatting: bool,
    ) -> Result<FetchedTranscript, TranscriptError> {
        tracing::info!(
            "Fetching transcript for {} (languages: {})",
            video_id,
            languages.join(", ")
        );

        let tracks = self.caption_tracks(video_id).await?;
        let track = select_track(&tracks, languages)?;
        let snippets = self.fetch_track(track, preserve_formatting).await?;

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language: track.info.language.clone(),
            language_code: track.info.language_code.clone(),
            is_generated: track.info.is_generated,
            snippets,
        })
    }

    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptInfo>, TranscriptError> {
        tracing::info!("Listing transcripts for {}", video_id);

        let tracks = self.caption_tracks(video_id).await?;
        Ok(tracks.into_iter().map(|track| track.info).collect())
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TranscriptError> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::IpBlocked);
    }
    Ok(response.error_for_status()?)
}

/// Extract the innertube API key embedded in a watch page
pub fn parse_innertube_api_key(html: &str) -> Result<String, TranscriptError> {
    if let Some(key) = api_key_regex().captures(html).and_then(|captures| captures.get(1)) {
        return Ok(key.as_str().to_string());
    }

    if html.contains(RECAPTCHA_MARKER) {
        return Err(TranscriptError::IpBlocked);
    }

    Err(TranscriptError::Unexpected(
        "The YouTube watch page could not be parsed".to_string(),
    ))
}

/// Map a non-playable status in the player response to an error
pub fn check_playability(player: &Value, video_id: &str) -> Result<(), TranscriptError> {
    let playability = &player["playabilityStatus"];
    let status = playability["status"].as_str().unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability["reason"].as_str().unwrap_or_default();

    match status {
        "LOGIN_REQUIRED" if reason == BOT_CHECK_REASON => Err(TranscriptError::RequestBlocked),
        "LOGIN_REQUIRED" if reason == AGE_RESTRICTED_REASON => Err(TranscriptError::AgeRestricted),
        "ERROR" if reason == UNAVAILABLE_REASON => {
            if looks_like_url(video_id) {
                Err(TranscriptError::InvalidVideoId)
            } else {
                Err(TranscriptError::VideoUnavailable)
            }
        }
        _ => {
            let detail = if reason.is_empty() {
                status.to_string()
            } else {
                reason.to_string()
            };
            Err(TranscriptError::VideoUnplayable(detail))
        }
    }
}

/// Read the caption tracks out of a player response, manual tracks first
pub fn parse_caption_tracks(player: &Value) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let renderer = &player["captions"]["playerCaptionsTracklistRenderer"];
    if renderer.is_null() {
        return Err(TranscriptError::TranscriptsDisabled);
    }

    let Some(raw_tracks) = renderer["captionTracks"].as_array() else {
        return Err(TranscriptError::TranscriptsDisabled);
    };

    let mut manual = Vec::new();
    let mut generated = Vec::new();

    for raw in raw_tracks {
        let Some(base_url) = raw["baseUrl"].as_str() else {
            tracing::warn!("Skipping caption track without a baseUrl");
            continue;
        };

        let language = raw["name"]["runs"][0]["text"]
            .as_str()
            .or_else(|| raw["name"]["simpleText"].as_str())
            .unwrap_or_default()
            .to_string();

        let info = TranscriptInfo {
            language,
            language_code: raw["languageCode"].as_str().unwrap_or_default().to_string(),
            is_generated: raw["kind"].as_str() == Some("asr"),
            is_translatable: raw["isTranslatable"].as_bool().unwrap_or(false),
        };

        let track = CaptionTrack {
            base_url: base_url.to_string(),
            info,
        };

        if track.info.is_generated {
            generated.push(track);
        } else {
            manual.push(track);
        }
    }

    manual.extend(generated);
    Ok(manual)
}

/// Pick the best track for the language preferences.
///
/// Languages are tried in order; for each one a manually created track is preferred
/// over an auto-generated one.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Result<&'a CaptionTrack, TranscriptError> {
    for language in languages {
        let matching = |generated: bool| {
            tracks
                .iter()
                .find(|track| {
                    track.info.is_generated == generated && &track.info.language_code == language
                })
        };

        if let Some(track) = matching(false).or_else(|| matching(true)) {
            return Ok(track);
        }
    }

    Err(TranscriptError::NoTranscriptFound {
        requested: languages.to_vec(),
    })
}

/// Build the download URL for a caption track
pub fn timedtext_url(base_url: &str) -> Result<String, TranscriptError> {
    let url = Url::parse(base_url)
        .map_err(|e| TranscriptError::Unexpected(format!("Invalid caption track URL: {}", e)))?;

    if url.query_pairs().any(|(key, value)| key == "exp" && value == "xpe") {
        return Err(TranscriptError::Unexpected(
            "This caption track requires a PO token, which is not supported".to_string(),
        ));
    }

    Ok(base_url.replace("&fmt=srv3", ""))
}
