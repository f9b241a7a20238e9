use crate::config::CodeforgeConfig;
use crate::llm::{GenAIClient, LLMClient};
use anyhow::{anyhow, Result};
use genai::adapter::AdapterKind;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SelectedClient {
    pub client: Arc<dyn LLMClient>,
    pub provider: AdapterKind,
    pub description: String,
}

/// Builds the client for the configured provider.
///
/// Fails when the provider needs credentials that are not in the environment,
/// or when a local Ollama server is not reachable.
pub async fn select_llm_client(config: &CodeforgeConfig) -> Result<SelectedClient> {
    let provider = config.provider;

    if provider == AdapterKind::Ollama {
        if config.api_base_url.is_none() && !is_ollama_available().await {
            return Err(anyhow!(
                "Ollama is not reachable. Start it with `ollama serve` or set OLLAMA_HOST"
            ));
        }
    } else if !provider_has_credentials(provider) {
        let var = provider.default_key_env_name().unwrap_or("<provider key>");
        return Err(anyhow!(
            "No credentials for {}. Set {} in the environment",
            provider.as_str(),
            var
        ));
    }

    let client = GenAIClient::new(
        provider,
        config.model.clone(),
        config.request_timeout(),
        config.api_base_url.clone(),
    );

    info!(provider = provider.as_str(), model = %config.model, "Using LLM provider");

    Ok(SelectedClient {
        client: Arc::new(client),
        provider,
        description: format!("{} ({})", provider.as_str(), config.model),
    })
}

fn provider_has_credentials(provider: AdapterKind) -> bool {
    match provider.default_key_env_name() {
        None => true,
        Some(env_var) => std::env::var(env_var).is_ok(),
    }
}

async fn is_ollama_available() -> bool {
    let base_url =
        std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string());

    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));

    match reqwest::Client::new()
        .get(&url)
        .timeout(std::time::Duration::from_secs(2))
        .send()
        .await
    {
        Ok(resp) => {
            let available = resp.status().is_success();
            debug!(available, "Ollama availability check");
            available
        }
        Err(e) => {
            debug!(error = %e, "Ollama not available");
            false
        }
    }
}
