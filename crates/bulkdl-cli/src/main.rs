use bulkdl_core::logging;
use clap::Parser;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    match cli.log_file.as_deref() {
        Some(path) => {
            if let Err(err) = logging::init_logging_file(path) {
                logging::init_logging_stderr();
                tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
            }
        }
        None => logging::init_logging_stderr(),
    }

    if let Err(err) = cli.run().await {
        eprintln!("bulkdl error: {:#}", err);
        std::process::exit(1);
    }
}
