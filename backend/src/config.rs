use axum::http::HeaderValue;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body; base64 images are about 4/3 of the raw size
    pub max_body_bytes: usize,
    /// Browser origins allowed to call the relay cross-origin. Empty disables CORS.
    pub cors_origins: Vec<String>,
}

/// Inference API connection settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API root, without the `/models/...` suffix
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    /// Whole-request timeout in seconds (default: 60)
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the given TOML file, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_, plus GEMINI_API_KEY)
    /// 3. Validate the final configuration
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        // 1. Load from config file
        let mut config = match path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(config_path) => Self::from_toml(Path::new(&config_path))?,
                None => {
                    tracing::warn!("Configuration file not found, using defaults");
                    Config::default()
                },
            },
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_SERVER_CORS_ORIGINS: Comma-separated allowed origins (empty disables CORS)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,lens_relay=debug")
    /// - APP_UPSTREAM_BASE_URL: Inference API root URL
    /// - APP_UPSTREAM_MODEL: Model name used in the generateContent path
    /// - APP_UPSTREAM_TIMEOUT: Upstream timeout (accepts "60", "60s", "2m")
    /// - GEMINI_API_KEY: Inference API credential
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = lookup("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Some(origins) = lookup("APP_SERVER_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
            tracing::info!("Override server.cors_origins from env: {:?}", self.server.cors_origins);
        }

        if let Some(level) = lookup("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(base_url) = lookup("APP_UPSTREAM_BASE_URL") {
            self.upstream.base_url = base_url;
            tracing::info!("Override upstream.base_url from env: {}", self.upstream.base_url);
        }

        if let Some(model) = lookup("APP_UPSTREAM_MODEL") {
            self.upstream.model = model;
            tracing::info!("Override upstream.model from env: {}", self.upstream.model);
        }

        if let Some(timeout) = lookup("APP_UPSTREAM_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.upstream.timeout_secs = val;
                    tracing::info!(
                        "Override upstream.timeout_secs from env: {}",
                        self.upstream.timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_UPSTREAM_TIMEOUT '{}': {} (keep {})",
                    timeout,
                    e,
                    self.upstream.timeout_secs
                ),
            }
        }

        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.upstream.api_key = key;
            tracing::info!("Override upstream.api_key from env");
        }
    }

    /// Validate configuration
    pub(crate) fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.server.max_body_bytes == 0 {
            anyhow::bail!("server.max_body_bytes must be > 0");
        }

        for origin in &self.server.cors_origins {
            if origin == "*" {
                anyhow::bail!("server.cors_origins must list explicit origins, not '*'");
            }
            if HeaderValue::from_str(origin).is_err() {
                anyhow::bail!("server.cors_origins contains an invalid origin: {:?}", origin);
            }
        }

        if self.upstream.base_url.trim().is_empty() {
            anyhow::bail!("upstream.base_url cannot be empty");
        }

        if self.upstream.model.trim().is_empty() {
            anyhow::bail!("upstream.model cannot be empty");
        }

        if self.upstream.timeout_secs == 0 {
            anyhow::bail!("upstream.timeout_secs must be > 0");
        }

        if self.upstream.api_key.trim().is_empty() {
            anyhow::bail!(
                "Inference API key is not set: export GEMINI_API_KEY or set upstream.api_key"
            );
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

impl ServerConfig {
    /// Configured origins as header values; entries that do not parse are skipped
    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.cors_origins.iter().filter_map(|origin| HeaderValue::from_str(origin).ok()).collect()
    }
}

impl UpstreamConfig {
    /// Full generateContent URL for the configured model, without credentials
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

// The key must never end up in logs, so Debug is written by hand.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api_key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &api_key)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 10 * 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            api_key: String::new(),
            timeout_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,lens_relay=debug".to_string(), file: None }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        "h" | "hr" | "hour" | "hours" => Ok(n * 60 * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts either a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '5m', '1h'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
        fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(&v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
