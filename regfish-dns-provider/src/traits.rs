use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::ProviderRecord;

/// API 返回的错误：状态码或业务码 + 消息
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    pub code: Option<String>,
    pub message: String,
}

impl RawApiError {
    #[cfg(test)]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 请求针对的对象，决定 404 映射为哪种 not-found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum ErrorContext {
    #[default]
    Request,
    Record(u64),
    Zone(String),
}

impl ErrorContext {
    pub fn zone(zone: &str) -> Self {
        Self::Zone(zone.to_string())
    }
}

/// Translates raw API failures into [`ProviderError`]s.
pub(crate) trait ProviderErrorMapper {
    fn provider_name(&self) -> &'static str;

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// "Not found" for whatever `context` names; unscoped requests fall back to `Unknown`.
    fn not_found(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match context {
            ErrorContext::Record(record_id) => ProviderError::RecordNotFound {
                provider,
                record_id,
                raw_message: Some(raw.message),
            },
            ErrorContext::Zone(domain) => ProviderError::DomainNotFound {
                provider,
                domain,
                raw_message: Some(raw.message),
            },
            ErrorContext::Request => self.unknown_error(raw),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Record-level access to a DNS provider.
///
/// Records cross this boundary in the provider's flat representation: fully-qualified
/// names, a type string and a single data string. The id is assigned by the provider;
/// `0` on an outgoing record means "not yet created".
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Fetch every record of `zone`.
    async fn list_records(&self, zone: &str) -> Result<Vec<ProviderRecord>>;

    /// Create a record and return it as stored, with its assigned id.
    async fn create_record(&self, record: &ProviderRecord) -> Result<ProviderRecord>;

    /// Overwrite record `id` with the fields of `record`.
    async fn update_record(&self, id: u64, record: &ProviderRecord) -> Result<ProviderRecord>;

    /// Delete record `id`.
    async fn delete_record(&self, id: u64) -> Result<()>;
}
