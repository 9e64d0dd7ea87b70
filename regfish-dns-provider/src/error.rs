use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RecordIdentity;

/// Failure of a single regfish API call.
///
/// Serialized with a `code` tag so the error can be reported as JSON by callers.
/// [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
/// [`RateLimited`](Self::RateLimited) are transient. Nothing in this crate retries them.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection refused, DNS failure, TLS failure or an HTTP 502/503/504 gateway error.
    #[error("[{provider}] Network error: {detail}")]
    NetworkError { provider: String, detail: String },

    /// The API token was rejected (HTTP 401).
    #[error("[{provider}] Invalid credentials{}", suffix(.raw_message.as_ref()))]
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// The record id does not exist in the zone.
    #[error("[{provider}] Record {record_id} not found")]
    RecordNotFound {
        provider: String,
        record_id: u64,
        raw_message: Option<String>,
    },

    /// The zone is not managed by this account.
    #[error("[{provider}] Zone '{domain}' not found{}", suffix(.raw_message.as_ref()))]
    DomainNotFound {
        provider: String,
        domain: String,
        raw_message: Option<String>,
    },

    /// regfish refused the record body (HTTP 400/422).
    #[error("[{provider}] Invalid {param}: {detail}")]
    InvalidParameter {
        provider: String,
        param: String,
        detail: String,
    },

    /// HTTP 429. `retry_after` comes from the `Retry-After` header, in seconds.
    #[error("[{provider}] Rate limited{}", retry_hint(.retry_after.as_ref()))]
    RateLimited {
        provider: String,
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    #[error("[{provider}] Request timeout: {detail}")]
    Timeout { provider: String, detail: String },

    /// The token lacks access to the zone (HTTP 403).
    #[error("[{provider}] Permission denied{}", suffix(.raw_message.as_ref()))]
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// The response body was not the JSON envelope regfish documents.
    #[error("[{provider}] Unexpected response: {detail}")]
    ParseError { provider: String, detail: String },

    #[error("[{provider}] Failed to encode request: {detail}")]
    SerializationError { provider: String, detail: String },

    /// Any other non-success answer, with the API code if one was sent.
    #[error("[{provider}] {raw_message}")]
    Unknown {
        provider: String,
        raw_code: Option<String>,
        raw_message: String,
    },
}

fn suffix(message: Option<&String>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

fn retry_hint(seconds: Option<&u64>) -> String {
    seconds
        .map(|s| format!(" (retry after {s}s)"))
        .unwrap_or_default()
}

impl ProviderError {
    /// 是否为预期行为（凭证、权限、资源不存在、参数错误），用于日志分级：
    /// `true` 记 `warn`，`false` 记 `error`。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RecordNotFound { .. }
                | Self::DomainNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Network, timeout or rate-limit failure; the same call may succeed later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Result of a single client call.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// The step of a batch operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Fetching the zone's record set.
    List,
    /// Creating a record.
    Create,
    /// Updating a matched record.
    Update,
    /// Deleting a matched record.
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Error returned by the batch operations of [`RegfishProvider`](crate::RegfishProvider).
///
/// Client failures are wrapped with the zone and, where one is involved, the identity of
/// the input record, so the caller can tell which element of the batch failed.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ReconcileError {
    /// The provider client could not be constructed.
    #[error("Failed to initialize {provider} client: {detail}")]
    ClientInit { provider: String, detail: String },

    /// The cancellation token was already triggered when the operation started.
    #[error("Operation on zone '{zone}' was cancelled")]
    Cancelled { zone: String },

    /// A zone-level client call failed.
    #[error("Failed to {operation} records of zone '{zone}': {source}")]
    Zone {
        zone: String,
        operation: Operation,
        #[source]
        source: ProviderError,
    },

    /// A client call for one input record failed.
    #[error("Failed to {operation} record {record} in zone '{zone}': {source}")]
    Record {
        zone: String,
        record: RecordIdentity,
        operation: Operation,
        #[source]
        source: ProviderError,
    },

    /// No existing record matched the input record by name, type and data.
    #[error("Record {record} not found in zone '{zone}'")]
    RecordNotFound { zone: String, record: RecordIdentity },
}

impl ReconcileError {
    /// Whether the error means "no such record", raised either by the strict delete match
    /// or by the provider on update/delete of a missing id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RecordNotFound { .. } => true,
            Self::Record { source, .. } => matches!(source, ProviderError::RecordNotFound { .. }),
            _ => false,
        }
    }

    /// 是否为预期行为，用于日志分级。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::RecordNotFound { .. } | Self::Cancelled { .. } => true,
            Self::Zone { source, .. } | Self::Record { source, .. } => source.is_expected(),
            Self::ClientInit { .. } => false,
        }
    }

    /// The underlying client error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Zone { source, .. } | Self::Record { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type of the batch operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;
