use crate::error::{BedrockError, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL_ID: &str = "amazon.titan-image-generator-v2:0";
pub const DEFAULT_REGION: &str = "us-east-1";
/// Largest accepted side of a source image, in pixels.
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1408;
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = BedrockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(BedrockError::ConfigError(format!(
                "unknown theme '{}', expected 'light' or 'dark'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub theme: Theme,
    pub show_toolbar: bool,
    pub output_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Idle time after which a UI session and its images are dropped.
    pub session_ttl: Duration,
    pub bedrock: BedrockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8501,
            theme: Theme::default(),
            show_toolbar: true,
            output_dir: PathBuf::from("output"),
            max_upload_bytes: 20 * 1024 * 1024,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            bedrock: BedrockConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| BedrockError::ConfigError(format!("invalid PORT '{}'", port)))?,
            Err(_) => defaults.port,
        };
        let theme = match env::var("UI_THEME") {
            Ok(theme) => theme.parse()?,
            Err(_) => defaults.theme,
        };
        let session_ttl = match env::var("SESSION_TTL_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse().map_err(|_| {
                BedrockError::ConfigError(format!("invalid SESSION_TTL_SECS '{}'", secs))
            })?),
            Err(_) => defaults.session_ttl,
        };
        let show_toolbar = env::var("UI_SHOW_TOOLBAR")
            .ok()
            .map_or(defaults.show_toolbar, |val| val != "false");

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            theme,
            show_toolbar,
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_upload_bytes: defaults.max_upload_bytes,
            session_ttl,
            bedrock: BedrockConfig::from_env()?,
        })
    }

    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_toolbar(mut self, visible: bool) -> Self {
        self.show_toolbar = visible;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }
}

/// Settings for the Bedrock generation client.
///
/// Credentials are optional here: when absent the client resolves them at
/// call time through the AWS default provider chain (environment variables,
/// profiles, SSO, instance and container roles).
#[derive(Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub model_id: String,
    pub timeout: Option<Duration>,
    pub max_image_dimension: u32,
    pub max_request_bytes: usize,
}

impl std::fmt::Debug for BedrockConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockConfig")
            .field("region", &self.region)
            .field("static_credentials", &self.access_key.is_some())
            .field("model_id", &self.model_id)
            .field("timeout", &self.timeout)
            .field("max_image_dimension", &self.max_image_dimension)
            .field("max_request_bytes", &self.max_request_bytes)
            .finish()
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            session_token: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        if let Ok(model_id) = env::var("BEDROCK_MODEL_ID") {
            config.model_id = model_id;
        }
        if let Ok(secs) = env::var("BEDROCK_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                BedrockError::ConfigError(format!("invalid BEDROCK_TIMEOUT_SECS '{}'", secs))
            })?;
            config = config.with_timeout_secs(secs);
        }
        Ok(config)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// A value of zero disables the deadline.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_image_dimension(mut self, pixels: u32) -> Self {
        self.max_image_dimension = pixels;
        self
    }

    pub fn with_max_request_bytes(mut self, bytes: usize) -> Self {
        self.max_request_bytes = bytes;
        self
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}
