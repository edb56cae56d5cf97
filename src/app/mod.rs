//! Application module
//!
//! Configuration, logging setup, the top-level run, and fatal error
//! reporting for the binary.

pub mod config;
pub mod error_handling;
pub mod logging;

pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;

use crate::clients::AwsClientFactory;
use crate::driver::{run_loaders, RunReport};
use crate::error::SetupError;
use crate::input::load_document;
use tracing::info;

/// Load the setup document and configure every loader in it
pub async fn run(config: &AppConfig) -> Result<RunReport, SetupError> {
    let document = load_document(&config.config_path).await?;
    if config.dry_run() {
        info!("Dry run: records will be printed, not stored");
    }

    let factory = AwsClientFactory::new(config.aws.clone());
    run_loaders(&document, &factory).await
}
