//! regfish API 类型定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ProviderRecord;

/// regfish API 通用响应
#[derive(Debug, Deserialize)]
pub struct RegfishResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub response: Option<T>,
    pub message: Option<String>,
    /// 错误码（数字或字符串）
    pub code: Option<Value>,
}

impl<T> RegfishResponse<T> {
    pub fn code_string(&self) -> Option<String> {
        match self.code.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// regfish Resource Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct RegfishRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub priority: Option<u16>,
}

impl From<RegfishRecord> for ProviderRecord {
    fn from(record: RegfishRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            data: record.data,
            ttl: record.ttl.unwrap_or_default(),
            priority: record.priority,
        }
    }
}

/// 创建/更新记录的请求体
#[derive(Debug, Serialize)]
pub struct RegfishRecordBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub data: &'a str,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl<'a> From<&'a ProviderRecord> for RegfishRecordBody<'a> {
    fn from(record: &'a ProviderRecord) -> Self {
        Self {
            name: &record.name,
            record_type: &record.record_type,
            data: &record.data,
            ttl: record.ttl,
            priority: record.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_parses() {
        let json = r#"{
            "success": true,
            "response": [
                {"id": 11, "name": "www.example.com.", "type": "A", "data": "10.0.0.1", "ttl": 300, "priority": null},
                {"id": 12, "name": "example.com.", "type": "MX", "data": "10 mail.example.com.", "ttl": 3600, "priority": 10, "annotation": "primary"}
            ]
        }"#;
        let parsed: Result<RegfishResponse<Vec<RegfishRecord>>, _> = serde_json::from_str(json);
        assert!(parsed.is_ok(), "parse failed: {parsed:?}");
        let Ok(parsed) = parsed else {
            return;
        };
        assert!(parsed.success);
        let records: Vec<ProviderRecord> = parsed
            .response
            .unwrap_or_default()
            .into_iter()
            .map(ProviderRecord::from)
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 11);
        assert_eq!(records[0].priority, None);
        assert_eq!(records[1].priority, Some(10));
    }

    #[test]
    fn error_code_may_be_number_or_string() {
        let cases = [
            (r#"{"success": false, "message": "no", "code": 404}"#, Some("404")),
            (r#"{"success": false, "code": "rr_not_found"}"#, Some("rr_not_found")),
            (r#"{"success": false, "code": null}"#, None),
        ];
        for (json, expected) in cases {
            let parsed: Result<RegfishResponse<Value>, _> = serde_json::from_str(json);
            assert!(parsed.is_ok(), "parse failed for {json}: {parsed:?}");
            let Ok(parsed) = parsed else {
                return;
            };
            assert_eq!(parsed.code_string().as_deref(), expected);
        }
    }

    #[test]
    fn body_omits_id_and_empty_priority() {
        let record = ProviderRecord {
            id: 42,
            name: "www.example.com.".to_string(),
            record_type: "A".to_string(),
            data: "10.0.0.1".to_string(),
            ttl: 60,
            priority: None,
        };
        let json = serde_json::to_value(RegfishRecordBody::from(&record)).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "www.example.com.",
                "type": "A",
                "data": "10.0.0.1",
                "ttl": 60
            })
        );
    }
}
