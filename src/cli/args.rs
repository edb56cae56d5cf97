//! CLI argument structures

use crate::app::AppConfig;
use crate::clients::{
    AwsSettings, DEFAULT_CONFIG_TABLE, DEFAULT_LOADER_FUNCTION, DEFAULT_MASTER_KEY_ALIAS,
};
use crate::input::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Store batch loader configurations, encrypting secrets on the way
#[derive(Parser, Debug)]
#[command(name = "loader-setup")]
#[command(
    about = "loader-setup - Validate loader configurations and store them for the batch loader",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Setup document (JSON, or YAML when the extension is .yaml/.yml)
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Endpoint override for every AWS service (e.g. a local emulator)
    #[arg(long, env = "LOADER_SETUP_ENDPOINT_URL", value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Encrypt and assemble records, then print them instead of storing
    #[arg(long)]
    pub dry_run: bool,

    /// Table that receives the configuration records
    #[arg(long, env = "LOADER_SETUP_CONFIG_TABLE", default_value = DEFAULT_CONFIG_TABLE)]
    pub config_table: String,

    /// Alias of the master key used to encrypt secrets
    #[arg(long, env = "LOADER_SETUP_MASTER_KEY_ALIAS", default_value = DEFAULT_MASTER_KEY_ALIAS)]
    pub master_key_alias: String,

    /// Loader function that object-created events are routed to
    #[arg(long, env = "LOADER_SETUP_LOADER_FUNCTION", default_value = DEFAULT_LOADER_FUNCTION)]
    pub loader_function: String,
}

impl Cli {
    pub fn into_app_config(self) -> AppConfig {
        let aws = AwsSettings {
            endpoint_url: self.endpoint_url,
            config_table: self.config_table,
            master_key_alias: self.master_key_alias,
            loader_function: self.loader_function,
            dry_run: self.dry_run,
            ..AwsSettings::default()
        };

        AppConfig::new(self.verbose, self.config).with_aws(aws)
    }
}
