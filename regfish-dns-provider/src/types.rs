use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Record content, one variant per supported type.
///
/// Data regfish reports for an unknown type, or that does not parse for its type, ends up
/// in [`Raw`](Self::Raw) unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    /// `A` for IPv4 addresses, `AAAA` for IPv6.
    Address { ip: IpAddr },

    MX { preference: u16, target: String },

    /// Stored without quoting or splitting into 255-byte strings.
    TXT { text: String },

    CNAME { target: String },

    NS { target: String },

    /// The owner name carries `_service._proto`.
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },

    /// `flags tag value`, e.g. `0 issue letsencrypt.org`.
    CAA { flags: u8, tag: String, value: String },

    Raw { record_type: String, data: String },
}

impl RecordData {
    /// Returns the provider type string (`"A"`, `"AAAA"`, `"MX"`, ...).
    pub fn record_type(&self) -> &str {
        match self {
            Self::Address { ip: IpAddr::V4(_) } => "A",
            Self::Address { ip: IpAddr::V6(_) } => "AAAA",
            Self::MX { .. } => "MX",
            Self::TXT { .. } => "TXT",
            Self::CNAME { .. } => "CNAME",
            Self::NS { .. } => "NS",
            Self::SRV { .. } => "SRV",
            Self::CAA { .. } => "CAA",
            Self::Raw { record_type, .. } => record_type,
        }
    }

    /// Returns the primary display value for this record (e.g., the IP address for
    /// A/AAAA, the target for MX/CNAME/NS/SRV, the value for CAA).
    pub fn display_value(&self) -> String {
        match self {
            Self::Address { ip } => ip.to_string(),
            Self::MX { target, .. }
            | Self::CNAME { target }
            | Self::NS { target }
            | Self::SRV { target, .. } => target.clone(),
            Self::TXT { text } => text.clone(),
            Self::CAA { value, .. } => value.clone(),
            Self::Raw { data, .. } => data.clone(),
        }
    }

    /// Whether this is the [`Raw`](Self::Raw) fallback.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw { .. })
    }
}

/// A provider-neutral DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Provider-assigned identifier, present once the record is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Name relative to the zone (e.g., `"www"` or `"@"` for the apex).
    pub name: String,
    /// Time to live, whole seconds.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Type-specific record data.
    pub data: RecordData,
}

impl Record {
    /// Create a record that has not been persisted yet.
    pub fn new(name: impl Into<String>, ttl: Duration, data: RecordData) -> Self {
        Self {
            id: None,
            name: name.into(),
            ttl,
            data,
        }
    }
}

/// The flat record tuple the regfish API understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Provider-assigned identifier; zero means the record was never created.
    #[serde(default)]
    pub id: u64,
    /// Fully-qualified name with trailing dot.
    pub name: String,
    /// Record type string.
    #[serde(rename = "type")]
    pub record_type: String,
    /// All type-specific fields encoded in one string.
    pub data: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Priority, only for MX and SRV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl ProviderRecord {
    /// Whether the provider has assigned an id to this record.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

/// Identity of an input record, attached to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordIdentity {
    /// Zone-relative name as supplied by the caller.
    pub name: String,
    /// Record type string.
    pub record_type: String,
    /// Encoded record data.
    pub data: String,
}

impl From<&Record> for RecordIdentity {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.data.record_type().to_string(),
            data: crate::convert::encode_data(&record.data),
        }
    }
}

impl std::fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' ({} {})", self.name, self.record_type, self.data)
    }
}

/// A credential map lacks a usable value for `field`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    #[error("Credential '{field}' is missing")]
    MissingField { field: String },
    #[error("Credential '{field}' is empty")]
    EmptyField { field: String },
}

/// Credentials for the regfish DNS API.
///
/// The only recognized option is the API token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegfishCredentials {
    /// regfish API token, sent as the `x-api-key` header.
    pub api_token: String,
}

impl RegfishCredentials {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// Read credentials from a flat key-value map (`apiToken`).
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        let field = "apiToken";
        let token = map
            .get(field)
            .ok_or_else(|| CredentialValidationError::MissingField {
                field: field.to_string(),
            })?;
        if token.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                field: field.to_string(),
            });
        }
        Ok(Self::new(token.trim()))
    }

    /// Inverse of [`from_map`](Self::from_map).
    pub fn to_map(&self) -> HashMap<String, String> {
        [("apiToken".to_string(), self.api_token.clone())].into()
    }
}

impl std::fmt::Debug for RegfishCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegfishCredentials")
            .field("api_token", &"<redacted>")
            .finish()
    }
}
