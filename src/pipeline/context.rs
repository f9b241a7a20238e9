//! Pipeline context for managing dependencies

use std::sync::Arc;

use crate::fs::FileSystem;
use crate::llm::{ExchangeLogger, LLMClient};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};

use super::config::PipelineConfig;

/// Long-lived dependencies shared by every stage of a run
pub struct PipelineContext {
    pub llm_client: Arc<dyn LLMClient>,
    pub file_system: Arc<dyn FileSystem>,
    pub config: PipelineConfig,
    pub progress: Arc<dyn ProgressHandler>,
    pub exchange_log: Arc<ExchangeLogger>,
}

impl PipelineContext {
    pub fn new(
        llm_client: Arc<dyn LLMClient>,
        file_system: Arc<dyn FileSystem>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            llm_client,
            file_system,
            config,
            progress: Arc::new(NoOpHandler),
            exchange_log: Arc::new(ExchangeLogger::disabled()),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_exchange_log(mut self, exchange_log: Arc<ExchangeLogger>) -> Self {
        self.exchange_log = exchange_log;
        self
    }

    pub fn emit(&self, event: ProgressEvent) {
        self.progress.on_progress(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::llm::MockLLMClient;
    use crate::progress::LoggingHandler;

    #[test]
    fn test_context_creation() {
        let context = PipelineContext::new(
            Arc::new(MockLLMClient::new()),
            Arc::new(MockFileSystem::new()),
            PipelineConfig::default().with_recursion_limit(7),
        );

        assert_eq!(context.config.recursion_limit, 7);
        assert_eq!(context.llm_client.name(), "MockLLM");
        assert!(!context.exchange_log.is_enabled());
    }

    #[test]
    fn test_with_progress() {
        let context = PipelineContext::new(
            Arc::new(MockLLMClient::new()),
            Arc::new(MockFileSystem::new()),
            PipelineConfig::default(),
        )
        .with_progress(Arc::new(LoggingHandler));

        context.emit(ProgressEvent::PhaseStarted {
            phase: "planner".to_string(),
        });
    }
}
