//! LLM client abstraction layer
//!
//! A trait-based seam over model backends so the pipeline can run against a
//! real provider (via genai) or a scripted mock interchangeably.

mod client;
mod error;
mod exchange_log;
mod genai_client;
mod lazy;
mod mock;
mod selector;
pub mod structured;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use exchange_log::ExchangeLogger;
pub use genai_client::GenAIClient;
pub use lazy::LazyLLMClient;
pub use mock::{MockLLMClient, MockResponse};
pub use selector::{select_llm_client, SelectedClient};
pub use structured::{query_structured, StructuredOutputError};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole, ToolCall, ToolDefinition};
