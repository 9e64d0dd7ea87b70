//! DNS Provider client implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod regfish;

pub use regfish::{RegfishClient, RegfishClientBuilder};
