//! # regfish-dns-provider
//!
//! Typed DNS record management for zones hosted at [regfish](https://www.regfish.de/).
//!
//! Callers work with [`Record`]s: zone-relative names, a [`Duration`](std::time::Duration)
//! TTL and type-specific [`RecordData`]. The regfish API stores flat tuples of
//! fully-qualified name, type string, data string, TTL and priority
//! ([`ProviderRecord`]). This crate converts between the two and reconciles
//! desired records against what the zone already holds.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use regfish_dns_provider::{Record, RecordData, RegfishCredentials, RegfishProvider};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = RegfishProvider::new(RegfishCredentials::new("your-token"));
//!     let cancel = CancellationToken::new();
//!
//!     // Create or overwrite the ACME challenge record
//!     let challenge = Record::new(
//!         "_acme-challenge",
//!         Duration::from_secs(60),
//!         RecordData::TXT { text: "token".to_string() },
//!     );
//!     provider.set_records("example.com", &[challenge.clone()], &cancel).await?;
//!
//!     for record in provider.list_records("example.com", &cancel).await? {
//!         println!(
//!             "{} {} {}",
//!             record.name,
//!             record.data.record_type(),
//!             record.data.display_value()
//!         );
//!     }
//!
//!     provider.delete_records("example.com", &[challenge], &cancel).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Operations
//!
//! | Method | Behavior |
//! |--------|----------|
//! | [`RegfishProvider::list_records`] | Fetch and decode every record of the zone |
//! | [`RegfishProvider::append_records`] | Create each record, no matching |
//! | [`RegfishProvider::set_records`] | Update the record with the same name and type, else create |
//! | [`RegfishProvider::delete_records`] | Delete the record with the same name, type and data |
//!
//! Batches are sequential and fail fast: the first failing record ends the batch, records
//! before it stay applied, and nothing is rolled back or retried.
//!
//! ## Error Handling
//!
//! Batch operations return [`ReconcileError`], which names the zone and, for per-record
//! failures, the record that failed. The client error underneath is a [`ProviderError`]:
//!
//! - [`ProviderError::InvalidCredentials`]: the API token was rejected
//! - [`ProviderError::RecordNotFound`]: the record id does not exist
//! - [`ProviderError::RateLimited`]: HTTP 429
//! - [`ProviderError::NetworkError`]: connection failure or HTTP 502/503/504

pub mod convert;
mod error;
mod http_client;
pub mod matcher;
pub mod names;
mod provider;
mod providers;
mod traits;
mod types;
mod utils;

#[cfg(test)]
mod test_utils;

// Re-export error types
pub use error::{Operation, ProviderError, ReconcileError, ReconcileResult, Result};

// Re-export the client seam (internal error-mapping traits are not exported)
pub use traits::RecordClient;

// Re-export types
pub use types::{
    CredentialValidationError, ProviderRecord, Record, RecordData, RecordIdentity,
    RegfishCredentials,
};

pub use provider::RegfishProvider;
pub use providers::{RegfishClient, RegfishClientBuilder};

// Re-export utils module
pub use utils::ttl;
