//! Tool-using agent loop
//!
//! Sends the conversation plus tool definitions to the model, executes the
//! tool calls it returns and feeds the results back until the model answers
//! without calling a tool.

use serde_json::json;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::llm::{ChatMessage, LLMRequest, LLMResponse, ToolCall, ToolDefinition};
use crate::progress::ProgressEvent;
use crate::tools::ToolSystem;

use super::context::PipelineContext;
use super::error::PipelineError;

/// What an agent run produced
#[derive(Debug, Clone)]
pub struct AgentTranscript {
    pub messages: Vec<ChatMessage>,
    pub iterations: usize,
    pub files_written: BTreeSet<String>,
    pub final_answer: String,
}

pub struct AgentLoop<'a> {
    context: &'a PipelineContext,
    phase: &'static str,
    step: usize,
}

impl<'a> AgentLoop<'a> {
    /// `step` identifies the coder step in errors and logs
    pub fn new(context: &'a PipelineContext, phase: &'static str, step: usize) -> Self {
        Self {
            context,
            phase,
            step,
        }
    }

    pub async fn run(
        &self,
        system_prompt: &str,
        user_prompt: String,
        tool_system: &ToolSystem,
    ) -> Result<AgentTranscript, PipelineError> {
        let mut messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ];
        let tools = tool_system.as_tool_definitions();
        let max_iterations = self.context.config.max_agent_iterations;
        let mut iteration = 0;

        debug!(
            phase = self.phase,
            step = self.step,
            tools = tools.len(),
            "Starting agent loop"
        );

        loop {
            iteration += 1;

            if iteration > max_iterations {
                error!(
                    phase = self.phase,
                    step = self.step,
                    max_iterations,
                    "Agent exceeded max iterations"
                );
                return Err(PipelineError::AgentIterationsExceeded {
                    step: self.step,
                    limit: max_iterations,
                });
            }

            debug!("Iteration {}/{}", iteration, max_iterations);
            self.context
                .emit(ProgressEvent::LlmRequestStarted { iteration });

            let response = self.execute_llm_request(&messages, &tools).await?;

            self.context.emit(ProgressEvent::LlmResponseReceived {
                iteration,
                tool_calls: response.tool_calls.len(),
                response_time: response.response_time,
            });

            if !response.has_tool_calls() {
                info!(
                    phase = self.phase,
                    step = self.step,
                    iterations = iteration,
                    "Agent finished"
                );
                messages.push(ChatMessage::assistant(&response.content));

                return Ok(AgentTranscript {
                    messages,
                    iterations: iteration,
                    files_written: tool_system.written_files(),
                    final_answer: response.content,
                });
            }

            messages.push(ChatMessage::assistant_with_tools(
                &response.content,
                response.tool_calls.clone(),
            ));

            self.process_tool_calls(&response.tool_calls, tool_system, &mut messages, iteration)
                .await?;
        }
    }

    async fn execute_llm_request(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse, PipelineError> {
        let request = LLMRequest::new(messages.to_vec())
            .with_tools(tools.to_vec())
            .with_temperature(self.context.config.agent_temperature);

        let start = Instant::now();
        let response = self.context.llm_client.chat(request.clone()).await?;
        self.context.exchange_log.log_exchange(
            self.phase,
            &request,
            &response,
            start.elapsed().as_millis() as u64,
        );

        Ok(response)
    }

    /// Runs every call in order; recoverable tool errors go back to the model
    async fn process_tool_calls(
        &self,
        tool_calls: &[ToolCall],
        tool_system: &ToolSystem,
        messages: &mut Vec<ChatMessage>,
        iteration: usize,
    ) -> Result<(), PipelineError> {
        for tool_call in tool_calls {
            debug!(
                "Executing tool: {} with call_id: {}",
                tool_call.name, tool_call.call_id
            );

            let start_time = Instant::now();
            self.context.emit(ProgressEvent::ToolExecutionStarted {
                tool_name: tool_call.name.clone(),
                iteration,
            });

            let outcome = tool_system
                .execute(&tool_call.name, tool_call.arguments.clone())
                .await;

            self.context.emit(ProgressEvent::ToolExecutionComplete {
                tool_name: tool_call.name.clone(),
                iteration,
                execution_time: start_time.elapsed(),
                success: outcome.is_ok(),
            });

            let result = match outcome {
                Ok(output) => output,
                Err(e) if e.is_recoverable() => {
                    warn!("Tool execution failed, returning error to LLM: {}", e);
                    json!({ "error": e.to_string() })
                }
                Err(e) => return Err(PipelineError::Tool(e)),
            };

            messages.push(ChatMessage::tool_response(
                &tool_call.call_id,
                result.to_string(),
            ));
        }

        Ok(())
    }
}
