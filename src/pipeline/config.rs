use std::path::PathBuf;

pub const DEFAULT_RECURSION_LIMIT: usize = 100;
pub const DEFAULT_MAX_AGENT_ITERATIONS: usize = 25;
pub const DEFAULT_OUTPUT_DIR: &str = "generated_projects";

/// Per-run limits and locations
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum node executions before the run is aborted
    pub recursion_limit: usize,
    /// Maximum model turns the coder agent gets per step
    pub max_agent_iterations: usize,
    /// Directory project folders are created in
    pub output_dir: PathBuf,
    pub agent_temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            max_agent_iterations: DEFAULT_MAX_AGENT_ITERATIONS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            agent_temperature: 0.2,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    pub fn with_max_agent_iterations(mut self, max_agent_iterations: usize) -> Self {
        self.max_agent_iterations = max_agent_iterations;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_agent_temperature(mut self, temperature: f32) -> Self {
        self.agent_temperature = temperature;
        self
    }
}
