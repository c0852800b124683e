use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default instructions handed to the client alongside a transcript
pub const DEFAULT_SUMMARY_PROMPT: &str = "Summarize the following YouTube video transcript. \
Provide a concise overview of the main topics, key points, and conclusions.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MCP server identity
    pub server: ServerConfig,

    /// Transcript defaults
    pub transcripts: TranscriptConfig,

    /// HTTP client settings for the YouTube provider
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in the MCP handshake
    pub name: String,

    /// Optional usage instructions reported in the MCP handshake
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Languages tried, in order, when a request names none
    pub default_languages: Vec<String>,

    /// Instructions used by summarize_transcript when no prompt is given
    pub summary_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent to YouTube
    pub user_agent: String,

    /// Accept-Language header, which controls the language of track names
    pub accept_language: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Optional proxy URL for all requests
    pub proxy: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "youtube-summary".to_string(),
            instructions: None,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            default_languages: vec!["en".to_string()],
            summary_prompt: DEFAULT_SUMMARY_PROMPT.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("youtube-summary/{}", env!("CARGO_PKG_VERSION")),
            accept_language: "en-US".to_string(),
            timeout_secs: 30,
            proxy: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the usual locations, or defaults
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }

        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a YAML file
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the given path, or the default location
    pub async fn save(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("youtube-summary").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.transcripts.default_languages.is_empty() {
            anyhow::bail!("At least one default transcript language must be configured");
        }

        if self.http.timeout_secs == 0 {
            anyhow::bail!("HTTP timeout must be greater than zero");
        }

        if let Some(proxy) = &self.http.proxy {
            Url::parse(proxy)
                .with_context(|| format!("Invalid proxy URL: {}", proxy))?;
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Server Name: {}", self.server.name);
        println!("  Default Languages: {}", self.transcripts.default_languages.join(", "));
        println!("  Summary Prompt: {}", self.transcripts.summary_prompt);
        println!("  Accept-Language: {}", self.http.accept_language);
        println!("  Timeout: {}s", self.http.timeout_secs);
        if let Some(proxy) = &self.http.proxy {
            println!("  Proxy: {}", proxy);
        }
    }
}
