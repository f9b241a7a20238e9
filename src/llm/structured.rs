//! Structured output on top of plain chat
//!
//! The target type's JSON schema is appended to the prompt and the reply is
//! parsed back into the type. Callers get an explicit `Result` that tells an
//! empty reply, an unparsable reply and a backend failure apart.

use super::client::LLMClient;
use super::error::BackendError;
use super::exchange_log::ExchangeLogger;
use super::types::{ChatMessage, LLMRequest};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

const STRUCTURED_TEMPERATURE: f32 = 0.1;
const RAW_PREVIEW_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum StructuredOutputError {
    #[error("model call failed: {0}")]
    Backend(#[from] BackendError),

    #[error("model returned no structured result")]
    Empty,

    #[error("could not parse {target} from model response: {message}")]
    Parse {
        target: &'static str,
        message: String,
        raw: String,
    },
}

/// JSON schema of `T` as a `serde_json::Value`
pub fn schema_value<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
}

/// Appends the structured-output contract for `T` to `prompt`
pub fn with_output_contract<T: JsonSchema>(prompt: &str) -> String {
    let schema = serde_json::to_string_pretty(&schema_value::<T>()).unwrap_or_default();
    format!(
        "{}\n\nRespond with a single JSON object that conforms to this JSON schema. \
         Do not add any text before or after the JSON.\n\n{}",
        prompt, schema
    )
}

/// Body of a reply wrapped in one outer markdown fence.
///
/// The closing fence is the last one in the reply, so fences inside JSON
/// strings stay intact.
fn strip_outer_fence(content: &str) -> Option<&str> {
    let open = content.find("```")?;
    let close = content.rfind("```")?;
    if close <= open {
        return None;
    }

    let after_open = &content[open + 3..close];
    // Skip a language tag such as `json`
    let body = after_open.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    Some(body.trim())
}

/// Outermost `{` .. `}` span, for JSON wrapped in prose
fn outer_object(content: &str) -> Option<&str> {
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&content[start..=end]),
        _ => None,
    }
}

/// Candidate JSON payloads in the order they are tried: the reply as is,
/// the body of an outer fence, then the outermost object
pub fn json_candidates(content: &str) -> Vec<&str> {
    let trimmed = content.trim();
    let mut candidates = vec![trimmed];
    for candidate in [strip_outer_fence(trimmed), outer_object(trimmed)]
        .into_iter()
        .flatten()
    {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Parses a raw model reply into `T`
pub fn parse_structured<T: DeserializeOwned>(
    content: &str,
    target: &'static str,
) -> Result<T, StructuredOutputError> {
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(StructuredOutputError::Empty);
    }

    let mut last_error = None;
    for candidate in json_candidates(trimmed) {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some((candidate, e)),
        }
    }

    let (raw, message) = match last_error {
        Some((candidate, e)) => (candidate, e.to_string()),
        None => (trimmed, "no JSON found".to_string()),
    };
    Err(StructuredOutputError::Parse {
        target,
        message,
        raw: raw.chars().take(RAW_PREVIEW_LEN).collect(),
    })
}

/// Asks the model for a `T` and parses the answer.
///
/// `phase` names the caller in logs and in the exchange log.
pub async fn query_structured<T>(
    client: &dyn LLMClient,
    prompt: &str,
    phase: &'static str,
    logger: &ExchangeLogger,
) -> Result<T, StructuredOutputError>
where
    T: DeserializeOwned + JsonSchema,
{
    let start = Instant::now();
    let request = LLMRequest::new(vec![ChatMessage::user(with_output_contract::<T>(prompt))])
        .with_temperature(STRUCTURED_TEMPERATURE);

    let response = client.chat(request.clone()).await?;
    let latency_ms = start.elapsed().as_millis() as u64;
    logger.log_exchange(phase, &request, &response, latency_ms);

    debug!(phase, latency_ms, bytes = response.content.len(), "Structured response received");

    parse_structured(&response.content, phase).map_err(|e| {
        warn!(phase, error = %e, "Structured response rejected");
        e
    })
}
