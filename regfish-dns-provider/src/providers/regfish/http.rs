//! regfish HTTP 请求方法

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::{self, ApiResponse};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError, RecordClient};
use crate::types::ProviderRecord;
use crate::utils::log_sanitizer::truncate_for_log;

use super::{RegfishClient, RegfishRecord, RegfishRecordBody, RegfishResponse};

impl RegfishClient {
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-api-key", &self.api_token)
            .header("Accept", "application/json")
    }

    /// 发送请求并解析响应信封，返回 `response` 字段
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
        context: ErrorContext,
    ) -> Result<Option<T>> {
        let ApiResponse { status, body } =
            http_client::send(self.provider_name(), self.authorized(request), method, path).await?;
        self.interpret(status, &body, context)
    }

    /// 根据状态码和响应体得出结果
    ///
    /// 非 2xx 或 `success == false` 都映射为错误；2xx 的空响应体视为无内容。
    pub(crate) fn interpret<T: DeserializeOwned>(
        &self,
        status: u16,
        body: &str,
        context: ErrorContext,
    ) -> Result<Option<T>> {
        if !(200..300).contains(&status) {
            // 错误响应不一定是 JSON
            let message = serde_json::from_str::<RegfishResponse<Value>>(body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| truncate_for_log(body));
            log::warn!("[{}] API error (HTTP {status}): {message}", self.provider_name());
            return Err(self.map_error(RawApiError::with_code(status.to_string(), message), context));
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: RegfishResponse<T> = http_client::decode_json(self.provider_name(), body)?;
        if !envelope.success {
            let code = envelope.code_string().unwrap_or_else(|| status.to_string());
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            log::warn!("[{}] API error {code}: {message}", self.provider_name());
            return Err(self.map_error(RawApiError::with_code(code, message), context));
        }

        Ok(envelope.response)
    }

    fn zone_path(zone: &str) -> String {
        format!("/dns/{}/rr", urlencoding::encode(zone.trim_end_matches('.')))
    }

    fn record_path(id: u64) -> String {
        format!("/dns/rr/{id}")
    }

    async fn write_record(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
        record: &ProviderRecord,
        context: ErrorContext,
    ) -> Result<ProviderRecord> {
        let body = http_client::encode_json(self.provider_name(), &RegfishRecordBody::from(record))?;
        log::debug!("Request Body: {}", truncate_for_log(&body));

        let stored: Option<RegfishRecord> = self
            .send(
                request.header("Content-Type", "application/json").body(body),
                method,
                path,
                context,
            )
            .await?;
        stored
            .map(ProviderRecord::from)
            .ok_or_else(|| self.parse_error("响应中缺少 response 字段"))
    }
}

#[async_trait]
impl RecordClient for RegfishClient {
    async fn list_records(&self, zone: &str) -> Result<Vec<ProviderRecord>> {
        let path = Self::zone_path(zone);
        let url = format!("{}{path}", self.base_url);

        let records: Option<Vec<RegfishRecord>> = self
            .send(self.client.get(&url), "GET", &path, ErrorContext::zone(zone))
            .await?;
        let records: Vec<ProviderRecord> = records
            .unwrap_or_default()
            .into_iter()
            .map(ProviderRecord::from)
            .collect();

        log::debug!("[{}] Listed {} records in {zone}", self.provider_name(), records.len());
        Ok(records)
    }

    async fn create_record(&self, record: &ProviderRecord) -> Result<ProviderRecord> {
        let path = "/dns/rr";
        let url = format!("{}{path}", self.base_url);

        self.write_record(
            self.client.post(&url),
            "POST",
            path,
            record,
            ErrorContext::default(),
        )
        .await
    }

    async fn update_record(&self, id: u64, record: &ProviderRecord) -> Result<ProviderRecord> {
        let path = Self::record_path(id);
        let url = format!("{}{path}", self.base_url);

        self.write_record(
            self.client.patch(&url),
            "PATCH",
            &path,
            record,
            ErrorContext::Record(id),
        )
        .await
    }

    async fn delete_record(&self, id: u64) -> Result<()> {
        let path = Self::record_path(id);
        let url = format!("{}{path}", self.base_url);

        let _: Option<Value> = self
            .send(self.client.delete(&url), "DELETE", &path, ErrorContext::Record(id))
            .await?;
        Ok(())
    }
}
