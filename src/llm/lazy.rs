use super::client::LLMClient;
use super::error::BackendError;
use super::selector::select_llm_client;
use super::types::{LLMRequest, LLMResponse};
use crate::config::CodeforgeConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Defers provider selection until the first `chat()` call, so a missing
/// credential surfaces as a failure of the first model request.
pub struct LazyLLMClient {
    client: OnceCell<Arc<dyn LLMClient>>,
    config: CodeforgeConfig,
}

impl LazyLLMClient {
    pub fn new(config: CodeforgeConfig) -> Self {
        debug!("Creating LazyLLMClient - client selection deferred until first chat() call");
        Self {
            client: OnceCell::new(),
            config,
        }
    }

    async fn ensure_initialized(&self) -> Result<Arc<dyn LLMClient>, BackendError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                debug!("Lazy initialization triggered - selecting LLM client now");
                let selected = select_llm_client(&self.config).await.map_err(|e| {
                    BackendError::ConfigurationError {
                        message: format!("Failed to initialize LLM client: {}", e),
                    }
                })?;
                debug!(client = %selected.description, "LLM client selected");
                Ok::<_, BackendError>(selected.client)
            })
            .await?;

        Ok(Arc::clone(client))
    }
}

#[async_trait]
impl LLMClient for LazyLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let client = self.ensure_initialized().await?;
        client.chat(request).await
    }

    fn name(&self) -> &str {
        "LazyLLMClient"
    }

    fn model_info(&self) -> Option<String> {
        Some(self.config.model.clone())
    }
}
