//! regfish error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{PROVIDER_NAME, RegfishClient};

/// regfish 错误映射
///
/// regfish 的错误码不稳定，`code` 统一使用 HTTP 状态码。
impl ProviderErrorMapper for RegfishClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("404") => self.not_found(raw, context),

            Some("400" | "422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "record".to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}
