use codeforge::cli::{handle_run, CliArgs};
use codeforge::util::{init_logging, json_from_env, LoggingConfig};
use codeforge::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    init_logging(LoggingConfig::from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
        json_from_env(),
    ));

    debug!("codeforge v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_run(&args).await;

    std::process::exit(exit_code);
}
