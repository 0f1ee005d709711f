use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct EchoClient;

    #[async_trait]
    impl LLMClient for EchoClient {
        async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
            let echoed = request.last_user_content().unwrap_or_default().to_string();
            Ok(LLMResponse::text(echoed, Duration::from_millis(10)))
        }

        fn name(&self) -> &str {
            "EchoClient"
        }
    }

    #[tokio::test]
    async fn test_client_trait() {
        let client = EchoClient;
        assert_eq!(client.name(), "EchoClient");
        assert!(client.model_info().is_none());

        let response = client
            .chat(LLMRequest::new(vec![super::super::ChatMessage::user("ping")]))
            .await
            .unwrap();
        assert_eq!(response.content, "ping");
    }
}
