//! Application configuration
//!
//! Settings collected from the command line and environment for one run.

use crate::clients::AwsSettings;
use crate::input::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Setup document to read
    pub config_path: PathBuf,
    /// AWS endpoint, naming and dry-run settings
    pub aws: AwsSettings,
}

impl AppConfig {
    pub fn new(verbose: u8, config_path: PathBuf) -> Self {
        Self {
            verbose,
            config_path,
            aws: AwsSettings::default(),
        }
    }

    pub fn with_aws(mut self, aws: AwsSettings) -> Self {
        self.aws = aws;
        self
    }

    pub fn dry_run(&self) -> bool {
        self.aws.dry_run
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            2 => "trace",
            _ => "trace,hyper=debug,aws_smithy_runtime=debug",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(0, PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_by_verbosity() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level(), "info");
        config.verbose = 1;
        assert_eq!(config.log_level(), "debug");
        config.verbose = 2;
        assert_eq!(config.log_level(), "trace");
        config.verbose = 5;
        assert!(config.log_level().starts_with("trace,"));
    }

    #[test]
    fn test_default_reads_config_json() {
        let config = AppConfig::default();
        assert_eq!(config.config_path, PathBuf::from("./config.json"));
        assert!(!config.dry_run());
    }
}
