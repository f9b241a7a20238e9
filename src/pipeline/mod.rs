pub mod agent;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;
pub mod state;

pub use agent::{AgentLoop, AgentTranscript};
pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use error::PipelineError;
pub use orchestrator::{Node, PipelineOrchestrator, RunOutcome, Termination};
pub use phase_trait::WorkflowPhase;
pub use state::{RunState, RunStatus, StateUpdate};
