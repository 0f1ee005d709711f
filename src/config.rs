//! Configuration management for confreport
//!
//! Settings come from environment variables with defaults; CLI flags override
//! them afterwards.
//!
//! # Environment Variables
//!
//! - `CONFREPORT_PROVIDER`: genai provider (anthropic|openai|ollama|gemini|xai|groq|...) - default: "anthropic"
//! - `CONFREPORT_MODEL`: model name - default: "claude-3-sonnet-20240229"
//! - `CONFREPORT_REQUEST_TIMEOUT`: per-request timeout in seconds - default: "60"
//! - `CONFREPORT_TEMPERATURE`: sampling temperature - default: "0.5"
//! - `CONFREPORT_MAX_TOKENS`: response token cap - default: "512"
//! - `CONFREPORT_PARALLEL_SIBLINGS`: score sibling steps concurrently (true|false) - default: "false"
//! - `CONFREPORT_RECORDINGS_DIR`: record/replay oracle exchanges in this directory - default: unset
//! - `CONFREPORT_RECORDING_MODE`: record|replay|auto - default: "auto"
//!
//! `CONFREPORT_LOG_LEVEL` belongs to [`crate::util::logging`]; an unknown level
//! falls back to INFO there and is never a configuration error.
//!
//! Provider credentials are read by genai from the provider's own variables
//! (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, `OLLAMA_HOST`, ...).

use crate::evidence::Aggregator;
use crate::llm::{BackendError, GenAIClient, LLMClient, RecordingLLMClient, RecordingMode};
use crate::oracle::{LlmOracle, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const DEFAULT_PROVIDER: AdapterKind = AdapterKind::Anthropic;
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: anthropic, openai, ollama, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),

    #[error("Recording setup failed: {0}")]
    RecordingInitError(String),
}

/// Parses a provider name the way genai spells it (case-insensitive)
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    AdapterKind::from_lower_str(&name.to_lowercase())
        .ok_or_else(|| ConfigError::InvalidProvider(name.to_string()))
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub request_timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    pub parallel_siblings: bool,
    /// Record/replay oracle exchanges here when set
    pub recordings_dir: Option<PathBuf>,
    pub recording_mode: RecordingMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let provider = env::var("CONFREPORT_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(DEFAULT_PROVIDER);

        let model = env::var("CONFREPORT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let request_timeout_secs = env::var("CONFREPORT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let temperature = env::var("CONFREPORT_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let max_tokens = env::var("CONFREPORT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let parallel_siblings = env::var("CONFREPORT_PARALLEL_SIBLINGS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let recordings_dir = env::var("CONFREPORT_RECORDINGS_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            provider,
            model,
            request_timeout_secs,
            temperature,
            max_tokens,
            parallel_siblings,
            recordings_dir,
            recording_mode: RecordingMode::from_env(RecordingMode::Auto),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0 and 1, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// LLM client for the configured provider, wrapped for recording when
    /// `recordings_dir` is set
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let client: Arc<dyn LLMClient> = Arc::new(GenAIClient::new(
            self.provider,
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )?);

        match &self.recordings_dir {
            Some(dir) => {
                info!(
                    dir = %dir.display(),
                    mode = ?self.recording_mode,
                    "Recording oracle exchanges"
                );
                let recording =
                    RecordingLLMClient::new(client, self.recording_mode, dir.clone())
                        .map_err(|e| ConfigError::RecordingInitError(e.to_string()))?;
                Ok(Arc::new(recording))
            }
            None => Ok(client),
        }
    }

    /// Aggregator over `client` with this configuration's sampling settings
    pub fn create_aggregator(&self, client: Arc<dyn LLMClient>) -> Aggregator {
        let oracle = LlmOracle::new(client)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        Aggregator::new(Arc::new(oracle)).with_parallel_siblings(self.parallel_siblings)
    }
}

impl fmt::Display for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confreport Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Parallel Siblings: {}", self.parallel_siblings)?;
        if let Some(ref dir) = self.recordings_dir {
            writeln!(f, "  Recordings: {} ({:?})", dir.display(), self.recording_mode)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn valid_config() -> ReportConfig {
        ReportConfig {
            provider: AdapterKind::Ollama,
            model: "qwen2.5:7b".to_string(),
            request_timeout_secs: 30,
            temperature: 0.5,
            max_tokens: 512,
            parallel_siblings: false,
            recordings_dir: None,
            recording_mode: RecordingMode::Auto,
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("CONFREPORT_PROVIDER"),
            EnvGuard::unset("CONFREPORT_MODEL"),
            EnvGuard::unset("CONFREPORT_REQUEST_TIMEOUT"),
            EnvGuard::unset("CONFREPORT_TEMPERATURE"),
            EnvGuard::unset("CONFREPORT_MAX_TOKENS"),
            EnvGuard::unset("CONFREPORT_PARALLEL_SIBLINGS"),
            EnvGuard::unset("CONFREPORT_RECORDINGS_DIR"),
            EnvGuard::unset("CONFREPORT_RECORDING_MODE"),
        ];

        let config = ReportConfig::default();

        assert_eq!(config.provider, DEFAULT_PROVIDER);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(!config.parallel_siblings);
        assert!(config.recordings_dir.is_none());
        assert_eq!(config.recording_mode, RecordingMode::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("CONFREPORT_PROVIDER", "Ollama"),
            EnvGuard::set("CONFREPORT_MODEL", "llama3.1:8b"),
            EnvGuard::set("CONFREPORT_REQUEST_TIMEOUT", "120"),
            EnvGuard::set("CONFREPORT_TEMPERATURE", "0.2"),
            EnvGuard::set("CONFREPORT_MAX_TOKENS", "1024"),
            EnvGuard::set("CONFREPORT_PARALLEL_SIBLINGS", "true"),
            EnvGuard::set("CONFREPORT_RECORDINGS_DIR", "/tmp/recordings"),
            EnvGuard::set("CONFREPORT_RECORDING_MODE", "replay"),
        ];

        let config = ReportConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 1024);
        assert!(config.parallel_siblings);
        assert_eq!(config.recordings_dir, Some(PathBuf::from("/tmp/recordings")));
        assert_eq!(config.recording_mode, RecordingMode::Replay);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = valid_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.temperature = 1.5;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.model = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_unknown_log_level_is_not_a_config_error() {
        let _guard = EnvGuard::set("CONFREPORT_LOG_LEVEL", "loud");
        assert!(ReportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("anthropic").unwrap(), AdapterKind::Anthropic);
        assert_eq!(parse_provider("OpenAI").unwrap(), AdapterKind::OpenAI);
        assert!(matches!(
            parse_provider("carrier-pigeon"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_create_client_with_recordings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = valid_config();
        config.recordings_dir = Some(temp_dir.path().join("rec"));

        let client = config.create_client().unwrap();
        assert_eq!(client.name(), "RecordingLLMClient");
        assert!(temp_dir.path().join("rec").is_dir());
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", valid_config());
        assert!(display.contains("Confreport Configuration:"));
        assert!(display.contains("Model: qwen2.5:7b"));
    }
}
