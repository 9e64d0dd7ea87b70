//! regfish DNS API client

mod error;
mod http;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, create_http_client,
};
use crate::types::RegfishCredentials;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{RegfishRecord, RegfishRecordBody, RegfishResponse};

pub(crate) const REGFISH_API_BASE: &str = "https://api.regfish.de";
pub(crate) const PROVIDER_NAME: &str = "regfish";

/// HTTP client for the regfish DNS API.
///
/// Authenticates every request with the `x-api-key` header. Construct it with
/// [`RegfishClient::new`] or, to override the endpoint or timeouts, through
/// [`RegfishClient::builder`].
pub struct RegfishClient {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) base_url: String,
}

impl RegfishClient {
    /// Build a client with default endpoint and timeouts.
    pub fn new(credentials: &RegfishCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: &RegfishCredentials) -> RegfishClientBuilder {
        RegfishClientBuilder {
            api_token: credentials.api_token.clone(),
            base_url: REGFISH_API_BASE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for RegfishClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegfishClient")
            .field("base_url", &self.base_url)
            .field("api_token", &mask_secret(&self.api_token))
            .finish_non_exhaustive()
    }
}

/// Builder for [`RegfishClient`].
#[derive(Debug, Clone)]
pub struct RegfishClientBuilder {
    api_token: String,
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl RegfishClientBuilder {
    /// Override the API endpoint (default `https://api.regfish.de`).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<RegfishClient> {
        let client = create_http_client(PROVIDER_NAME, self.connect_timeout, self.request_timeout)?;
        Ok(RegfishClient {
            client,
            api_token: self.api_token,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}
