// Pipeline stages, in graph order

#[path = "01_planner.rs"]
pub mod planner;
#[path = "02_architect.rs"]
pub mod architect;
#[path = "03_coder.rs"]
pub mod coder;

pub use architect::ArchitectPhase;
pub use coder::CoderPhase;
pub use planner::PlannerPhase;
