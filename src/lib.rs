//! # loader-setup
//!
//! Validates batch loader configurations, encrypts their secrets with the
//! regional key service, and stores one configuration record per loader for
//! the loader function to pick up.
//!
//! ## Usage
//!
//! ```bash
//! loader-setup [config.json] [--dry-run] [-v]
//! ```
//!
//! ## Modules
//!
//! - `input` - Setup document loading and per-loader bundles
//! - `validation` - Field validation and coercion helpers
//! - `record` - The stored configuration record and its in-progress draft
//! - `crypto` - Secret encryption adapter
//! - `pipeline` - Ordered field steps that build one record
//! - `driver` - Runs the pipeline for every loader in a document
//! - `storage` - Config store, provisioning and the persistence adapter
//! - `clients` - Region-scoped AWS clients
//! - `testing` - Mocks and fixtures for tests
pub mod app;
pub mod cli;
pub mod clients;
pub mod crypto;
pub mod driver;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod record;
pub mod storage;
pub mod validation;

pub mod testing;
