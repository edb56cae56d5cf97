//! Field pipeline: one loader bundle in, one stored record out
//!
//! The steps in [`steps::ORDER`] are folded over a [`ConfigDraft`]; the first
//! error stops the run. Only a draft that survives every step is converted
//! into a record and handed to the persistence adapter.

pub mod prefix;
pub mod steps;

pub use prefix::normalize_s3_prefix;
pub use steps::{Step, ORDER};

use tracing::debug;

use crate::clients::{ClientFactory, RegionClients};
use crate::error::SetupError;
use crate::input::RawBundle;
use crate::record::{ConfigDraft, ConfigRecord};

/// State threaded through the steps of one run
pub struct PipelineContext<'a> {
    pub factory: &'a dyn ClientFactory,
    /// Set by the region step
    pub clients: Option<RegionClients>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(factory: &'a dyn ClientFactory) -> Self {
        Self {
            factory,
            clients: None,
        }
    }
}

/// Validate, encrypt and store one loader configuration
pub async fn run_pipeline(
    bundle: &RawBundle,
    factory: &dyn ClientFactory,
) -> Result<ConfigRecord, SetupError> {
    let mut ctx = PipelineContext::new(factory);
    let mut draft = ConfigDraft::new();

    for step in ORDER {
        draft = step.apply(bundle, draft, &mut ctx).await?;
    }

    finalize(draft, &ctx).await
}

/// Convert the finished draft and persist it
pub async fn finalize(
    draft: ConfigDraft,
    ctx: &PipelineContext<'_>,
) -> Result<ConfigRecord, SetupError> {
    let clients = ctx
        .clients
        .as_ref()
        .ok_or_else(|| SetupError::internal("pipeline finished without region clients"))?;

    let record = draft.into_record()?;
    debug!("Persisting configuration for {}", record.s3_prefix);
    clients.persistence.persist(&record).await?;
    Ok(record)
}
