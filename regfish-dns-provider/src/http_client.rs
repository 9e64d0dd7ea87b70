//! Transport helpers shared by API clients.
//!
//! [`send`] turns transport-level failures (timeouts, refused connections, HTTP 429 and
//! gateway errors) into [`ProviderError`]s. Any other status is handed back to the caller
//! together with the body. Nothing here retries.

use reqwest::RequestBuilder;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// Status and body of a response that passed [`check_transport`].
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Send `request` and read the whole body.
pub(crate) async fn send(
    provider: &str,
    request: RequestBuilder,
    method: &str,
    path: &str,
) -> Result<ApiResponse> {
    log::debug!("[{provider}] {method} {path}");

    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, &e))?;
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;
    log::debug!("[{provider}] HTTP {status}: {}", truncate_for_log(&body));

    check_transport(provider, status, retry_after, &body)?;
    Ok(ApiResponse { status, body })
}

fn transport_error(provider: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    }
}

/// Reject statuses that say nothing about the request itself.
pub(crate) fn check_transport(
    provider: &str,
    status: u16,
    retry_after: Option<u64>,
    body: &str,
) -> Result<()> {
    match status {
        429 => {
            log::warn!("[{provider}] Rate limited, retry_after={retry_after:?}");
            Err(ProviderError::RateLimited {
                provider: provider.to_string(),
                retry_after,
                raw_message: (!body.trim().is_empty()).then(|| truncate_for_log(body)),
            })
        }
        502..=504 => {
            log::warn!("[{provider}] Gateway error (HTTP {status})");
            Err(ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("HTTP {status}: {}", truncate_for_log(body)),
            })
        }
        _ => Ok(()),
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!(
            "[{provider}] Unparseable response ({e}): {}",
            truncate_for_log(body)
        );
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

pub(crate) fn encode_json<T: Serialize>(provider: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ProviderError::SerializationError {
        provider: provider.to_string(),
        detail: e.to_string(),
    })
}
