//! Store and provisioner implementations

pub mod dry_run;
pub mod dynamodb;
pub mod memory;
pub mod provision;

pub use dry_run::{DryRunProvisioner, DryRunStore};
pub use dynamodb::DynamoConfigStore;
pub use memory::MemoryConfigStore;
pub use provision::{AwsProvisioner, ProvisionTargets};
