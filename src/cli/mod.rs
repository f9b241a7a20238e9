pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, RunFormat};
pub use handlers::handle_run;
pub use output::{RunFormatter, RunReport};
