use clap::Parser;
use loader_setup::app::{handle_fatal_error, init_logging, run};
use loader_setup::cli::Cli;
use tracing::debug;

#[tokio::main]
async fn main() {
    let config = Cli::parse().into_app_config();
    init_logging(&config);

    match run(&config).await {
        Ok(report) => debug!(
            "{} loader(s) configured, {} rejected",
            report.succeeded(),
            report.rejected()
        ),
        Err(e) => handle_fatal_error(e.into(), config.verbose),
    }
}
