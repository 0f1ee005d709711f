//! LLM client abstraction layer
//!
//! A trait-based seam over the text-generation provider so that the GenAI
//! client, the recording wrapper and the scripted mock are interchangeable.

mod client;
mod error;
mod genai;
mod mock;
mod recording;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use genai::{GenAIClient, API_BASE_URL_ENV};
pub use mock::{MockLLMClient, MockResponse};
pub use recording::{RecordedExchange, RecordedRequest, RecordingLLMClient, RecordingMode};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
