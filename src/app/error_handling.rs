//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

/// Handle fatal errors and exit with appropriate status code
///
/// For `SetupError` the user message is always shown and the developer
/// message with its cause chain is added at `-v`. Anything else exits 1.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    use crate::error::SetupError;

    error!("Fatal error: {}", error);

    let exit_code = if let Some(setup_err) = error.downcast_ref::<SetupError>() {
        eprintln!("{}", setup_err.user_message());

        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", setup_err.developer_message());
        }

        setup_err.exit_code()
    } else {
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    };

    std::process::exit(exit_code)
}
