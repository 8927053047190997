//! Configuration structures and loading utilities.
//!
//! Every setting has a default and can be overridden through environment
//! variables via the `from_env` constructors.

pub mod form;
pub mod metrics;
pub mod resilient_client;

pub use form::*;
pub use metrics::*;

/// Serializes tests that modify environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
