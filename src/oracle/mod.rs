//! The scoring oracle: a text-generation service that turns evidence into a
//! `score | summary` answer.
//!
//! [`Oracle`] is the seam the aggregator depends on. [`LlmOracle`] is the
//! production implementation on top of any [`LLMClient`].

pub mod parser;
pub mod prompt;

use crate::error::Result;
use crate::llm::{ChatMessage, LLMClient, LLMRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub use parser::{parse, parse_score, parse_verdict, RawVerdict, Verdict, DELIMITER};
pub use prompt::{child_sentence, notes_evidence, OracleRequest, Tier, NO_ISSUES};

/// Default sampling temperature for scoring requests
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
/// Default response budget; a score and a paragraph fit comfortably
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Single-turn "score this evidence" service.
///
/// Each call is independent: no retries, no conversation state. Any failure is
/// fatal for the run that issued it.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn evaluate(&self, evidence: &str, instructions: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Oracle backed by an LLM chat client
pub struct LlmOracle {
    client: Arc<dyn LLMClient>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmOracle {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_request(&self, evidence: &str, instructions: &str) -> LLMRequest {
        LLMRequest::new(vec![
            ChatMessage::system(instructions),
            ChatMessage::user(evidence),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens)
    }
}

#[async_trait]
impl Oracle for LlmOracle {
    async fn evaluate(&self, evidence: &str, instructions: &str) -> Result<String> {
        let request = self.build_request(evidence, instructions);
        let response = self.client.chat(request).await?;

        debug!(
            client = self.client.name(),
            elapsed_ms = response.response_time.as_millis() as u64,
            "Oracle answered"
        );

        Ok(response.content)
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}

impl std::fmt::Debug for LlmOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmOracle")
            .field("client", &self.client.name())
            .field("model", &self.client.model_info())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::llm::{BackendError, MessageRole, MockLLMClient, MockResponse};

    #[tokio::test]
    async fn test_llm_oracle_sends_instructions_and_evidence() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::verdict(0.9, "fine"));

        let oracle = LlmOracle::new(client.clone()).with_max_tokens(256);
        let raw = oracle.evaluate("No issues", "Score it").await.unwrap();
        assert_eq!(raw, "0.9 | fine");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[0].content, "Score it");
        assert_eq!(request.messages[1].content, "No issues");
        assert_eq!(request.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(request.max_tokens, Some(256));
    }

    #[tokio::test]
    async fn test_llm_oracle_maps_backend_failure() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::error(BackendError::AuthenticationError {
            message: "bad key".to_string(),
        }));

        let oracle = LlmOracle::new(client);
        let err = oracle.evaluate("x", "y").await.unwrap_err();
        assert!(matches!(err, ReportError::OracleUnavailable(_)));
    }

    #[test]
    fn test_oracle_name_is_client_name() {
        let oracle = LlmOracle::new(Arc::new(MockLLMClient::with_name("scripted")));
        assert_eq!(oracle.name(), "scripted");
    }
}
