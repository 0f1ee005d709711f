//! LLM request-response recording for reproducible report runs
//!
//! A recorded exchange is keyed by an MD5 of the canonical request, so a job
//! rerun against the same recordings directory gets byte-identical oracle
//! answers without touching the provider.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Recording mode for LLM interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// Record new exchanges and save to disk
    Record,
    /// Replay from recorded exchanges, fail if not found
    Replay,
    /// Replay if recording exists, otherwise record
    Auto,
}

impl RecordingMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "record" => Ok(RecordingMode::Record),
            "replay" => Ok(RecordingMode::Replay),
            "auto" => Ok(RecordingMode::Auto),
            _ => anyhow::bail!("Invalid recording mode: {}", s),
        }
    }

    /// Reads `CONFREPORT_RECORDING_MODE`, falling back to `default`
    pub fn from_env(default: RecordingMode) -> RecordingMode {
        std::env::var("CONFREPORT_RECORDING_MODE")
            .ok()
            .and_then(|s| Self::parse(&s).ok())
            .unwrap_or(default)
    }
}

/// A recorded request-response exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedExchange {
    pub request_hash: String,
    pub request: RecordedRequest,
    pub response: LLMResponse,
    /// Timestamp when recorded (RFC 3339)
    pub recorded_at: String,
}

/// Canonical form of a request, used for hashing and storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
}

impl RecordedRequest {
    pub fn from_llm_request(req: &LLMRequest, model: Option<String>) -> Self {
        Self {
            messages: req.messages.clone(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            model,
        }
    }

    /// MD5 of the request's JSON form
    pub fn canonical_hash(&self) -> String {
        let canonical_json = serde_json::to_string(self).expect("Failed to serialize request");
        format!("{:x}", md5::compute(canonical_json.as_bytes()))
    }
}

/// LLM client that records or replays interactions
pub struct RecordingLLMClient {
    inner: Arc<dyn LLMClient>,
    mode: RecordingMode,
    recordings_dir: PathBuf,
    cache: HashMap<String, LLMResponse>,
}

impl RecordingLLMClient {
    pub fn new(
        inner: Arc<dyn LLMClient>,
        mode: RecordingMode,
        recordings_dir: PathBuf,
    ) -> Result<Self> {
        std::fs::create_dir_all(&recordings_dir)
            .context("Failed to create recordings directory")?;

        Ok(Self {
            inner,
            mode,
            recordings_dir,
            cache: HashMap::new(),
        })
    }

    pub fn mode(&self) -> RecordingMode {
        self.mode
    }

    fn recording_path(&self, request_hash: &str) -> PathBuf {
        self.recordings_dir.join(format!("{}.json", request_hash))
    }

    fn load_recording(&self, request_hash: &str) -> Result<Option<LLMResponse>> {
        let path = self.recording_path(request_hash);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read recording: {}", path.display()))?;

        let exchange: RecordedExchange = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recording: {}", path.display()))?;

        Ok(Some(exchange.response))
    }

    fn save_recording(&self, request: &RecordedRequest, response: &LLMResponse) -> Result<()> {
        let request_hash = request.canonical_hash();

        let exchange = RecordedExchange {
            request_hash: request_hash.clone(),
            request: request.clone(),
            response: response.clone(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
        };

        let path = self.recording_path(&request_hash);
        let contents =
            serde_json::to_string_pretty(&exchange).context("Failed to serialize recording")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write recording: {}", path.display()))?;

        debug!(hash = %request_hash, "Saved LLM recording");
        Ok(())
    }

    /// Load all recordings into the in-memory cache
    pub fn preload_cache(&mut self) -> Result<()> {
        if !self.recordings_dir.exists() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&self.recordings_dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let contents = std::fs::read_to_string(&path)?;
            let exchange: RecordedExchange = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse recording: {}", path.display()))?;

            self.cache.insert(exchange.request_hash, exchange.response);
        }

        Ok(())
    }

    fn lookup(&self, request_hash: &str) -> Result<Option<LLMResponse>, BackendError> {
        if let Some(response) = self.cache.get(request_hash) {
            return Ok(Some(response.clone()));
        }

        self.load_recording(request_hash)
            .map_err(|e| BackendError::Other {
                message: format!("Failed to load recording: {}", e),
            })
    }

    async fn record(
        &self,
        recorded_request: &RecordedRequest,
        request: LLMRequest,
    ) -> Result<LLMResponse, BackendError> {
        let response = self.inner.chat(request).await?;

        self.save_recording(recorded_request, &response)
            .map_err(|e| BackendError::Other {
                message: format!("Failed to save recording: {}", e),
            })?;

        Ok(response)
    }
}

#[async_trait::async_trait]
impl LLMClient for RecordingLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let recorded_request = RecordedRequest::from_llm_request(&request, self.inner.model_info());
        let request_hash = recorded_request.canonical_hash();

        match self.mode {
            RecordingMode::Replay => self.lookup(&request_hash)?.ok_or_else(|| BackendError::Other {
                message: format!(
                    "No recording found for request hash: {} (mode: Replay)",
                    request_hash
                ),
            }),
            RecordingMode::Record => self.record(&recorded_request, request).await,
            RecordingMode::Auto => match self.lookup(&request_hash)? {
                Some(response) => Ok(response),
                None => self.record(&recorded_request, request).await,
            },
        }
    }

    fn name(&self) -> &str {
        "RecordingLLMClient"
    }

    fn model_info(&self) -> Option<String> {
        self.inner.model_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLLMClient, MockResponse};

    fn scoring_request() -> LLMRequest {
        LLMRequest::new(vec![
            ChatMessage::system("Score the evidence"),
            ChatMessage::user("No issues"),
        ])
        .with_max_tokens(512)
        .with_temperature(0.5)
    }

    #[test]
    fn test_recording_mode_parse() {
        assert_eq!(
            RecordingMode::parse("record").unwrap(),
            RecordingMode::Record
        );
        assert_eq!(
            RecordingMode::parse("replay").unwrap(),
            RecordingMode::Replay
        );
        assert_eq!(RecordingMode::parse("auto").unwrap(), RecordingMode::Auto);
        assert_eq!(
            RecordingMode::parse("RECORD").unwrap(),
            RecordingMode::Record
        );
        assert!(RecordingMode::parse("invalid").is_err());
    }

    #[test]
    fn test_recorded_request_hash() {
        let req1 = RecordedRequest::from_llm_request(&scoring_request(), None);
        let req2 = RecordedRequest::from_llm_request(&scoring_request(), None);
        let req3 = RecordedRequest::from_llm_request(
            &LLMRequest::new(vec![ChatMessage::user("Different")]),
            None,
        );

        assert_eq!(req1.canonical_hash(), req2.canonical_hash());
        assert_ne!(req1.canonical_hash(), req3.canonical_hash());
    }

    #[tokio::test]
    async fn test_record_then_replay() {
        let temp_dir = tempfile::tempdir().unwrap();
        let recordings_dir = temp_dir.path().to_path_buf();

        let mock_client = Arc::new(MockLLMClient::new());
        mock_client.add_response(MockResponse::verdict(0.9, "All clear"));

        let recording_client =
            RecordingLLMClient::new(mock_client, RecordingMode::Record, recordings_dir.clone())
                .unwrap();
        let recorded = recording_client.chat(scoring_request()).await.unwrap();
        assert_eq!(recorded.content, "0.9 | All clear");

        // An empty mock proves the provider is not consulted on replay
        let replay_client = RecordingLLMClient::new(
            Arc::new(MockLLMClient::new()),
            RecordingMode::Replay,
            recordings_dir,
        )
        .unwrap();

        let response = replay_client.chat(scoring_request()).await.unwrap();
        assert_eq!(response.content, "0.9 | All clear");
    }

    #[tokio::test]
    async fn test_replay_without_recording_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let client = RecordingLLMClient::new(
            Arc::new(MockLLMClient::new()),
            RecordingMode::Replay,
            temp_dir.path().to_path_buf(),
        )
        .unwrap();

        let err = client.chat(scoring_request()).await.unwrap_err();
        assert!(err.to_string().contains("No recording found"));
    }

    #[tokio::test]
    async fn test_auto_mode_records_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let recordings_dir = temp_dir.path().to_path_buf();

        let mock_client = Arc::new(MockLLMClient::new());
        mock_client.add_response(MockResponse::verdict(0.75, "Minor misalignment"));

        let auto_client = RecordingLLMClient::new(
            mock_client.clone(),
            RecordingMode::Auto,
            recordings_dir.clone(),
        )
        .unwrap();

        let first = auto_client.chat(scoring_request()).await.unwrap();
        let second = auto_client.chat(scoring_request()).await.unwrap();

        assert_eq!(first.content, second.content);
        assert_eq!(mock_client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_preload_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        let recordings_dir = temp_dir.path().to_path_buf();

        let mock_client = Arc::new(MockLLMClient::new());
        mock_client.add_response(MockResponse::verdict(0.5, "Cached"));
        RecordingLLMClient::new(mock_client, RecordingMode::Record, recordings_dir.clone())
            .unwrap()
            .chat(scoring_request())
            .await
            .unwrap();

        std::fs::write(recordings_dir.join("notes.txt"), "ignored").unwrap();

        let mut replay = RecordingLLMClient::new(
            Arc::new(MockLLMClient::new()),
            RecordingMode::Replay,
            recordings_dir,
        )
        .unwrap();
        replay.preload_cache().unwrap();
        assert_eq!(replay.cache.len(), 1);
    }
}
