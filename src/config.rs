use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the mood suggestion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Force mock mode even when an API key is present
    #[serde(default)]
    pub use_mock_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    /// Socket address the HTTP server binds to (host:port)
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Optional client timeout. Unset means the transport default.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 512,
            response_mime_type: "text/plain".to_string(),
        }
    }
}

/// Whether the generator may call the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = [".env", "../.env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("MOOD_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();

        for warning in config.validate() {
            tracing::warn!("Config validation warning: {} - continuing anyway", warning);
        }

        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the process environment in production)
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("MOOD_HTTP_BIND") {
            self.server.bind = bind;
        }

        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = api_key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(timeout) = lookup("GEMINI_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.gemini.timeout_seconds = Some(secs);
            }
        }

        if let Some(flag) = lookup("USE_MOCK_MODE") {
            self.use_mock_mode = flag.trim().eq_ignore_ascii_case("true");
        }
    }

    /// Collect configuration problems. None of them are fatal.
    fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            warnings.push(format!(
                "server.bind '{}' is not a valid host:port",
                self.server.bind
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            warnings.push("generation.temperature should be between 0.0 and 2.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.generation.top_p) {
            warnings.push("generation.top_p should be between 0.0 and 1.0".to_string());
        }
        if self.generation.max_output_tokens == 0 {
            warnings.push("generation.max_output_tokens cannot be 0".to_string());
        }
        if self.gemini.model.trim().is_empty() {
            warnings.push("gemini.model is empty".to_string());
        }

        warnings
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini.api_key.trim().is_empty()
    }

    /// Mock mode when forced, or when there is no credential to call with
    pub fn mode(&self) -> Mode {
        if self.use_mock_mode || !self.has_api_key() {
            Mode::Mock
        } else {
            Mode::Live
        }
    }
}

impl GeminiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mood-suggest".to_string(),
                bind: "127.0.0.1:5000".to_string(),
            },
            gemini: GeminiConfig {
                api_key: String::new(),
                model: "gemini-1.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_seconds: None,
            },
            generation: GenerationConfig::default(),
            use_mock_mode: false,
        }
    }
}
