//! Record conversion between typed [`Record`]s and regfish [`ProviderRecord`]s.
//!
//! Both directions are total: data that does not fit the grammar of its type decodes to
//! [`RecordData::Raw`] instead of failing.
//!
//! | Type | Data grammar |
//! |------|--------------|
//! | A, AAAA | IP literal of the matching family |
//! | MX | `<preference> <target>` |
//! | TXT, CNAME, NS | any string |
//! | SRV | `<priority> <weight> <port> <target>` |
//! | CAA | `<flags> <tag> <value...>` |

use std::net::IpAddr;
use std::time::Duration;

use crate::names::{normalize, relative_name};
use crate::types::{ProviderRecord, Record, RecordData};
use crate::utils::log_sanitizer::truncate_for_log;
use crate::utils::ttl;

/// Convert a provider record into a typed record relative to `zone`.
pub fn decode(record: &ProviderRecord, zone: &str) -> Record {
    Record {
        id: record.is_persisted().then_some(record.id),
        name: relative_name(&record.name, zone),
        ttl: Duration::from_secs(u64::from(record.ttl)),
        data: decode_data(&record.record_type, &record.data),
    }
}

/// Parse the data string of a record of type `record_type` (case-insensitive).
pub fn decode_data(record_type: &str, data: &str) -> RecordData {
    let parsed = match record_type.to_ascii_uppercase().as_str() {
        "A" => parse_ip(data)
            .filter(IpAddr::is_ipv4)
            .map(|ip| RecordData::Address { ip }),
        "AAAA" => parse_ip(data)
            .filter(IpAddr::is_ipv6)
            .map(|ip| RecordData::Address { ip }),
        "MX" => parse_mx(data),
        "TXT" => Some(RecordData::TXT {
            text: data.to_string(),
        }),
        "CNAME" => Some(RecordData::CNAME {
            target: data.to_string(),
        }),
        "NS" => Some(RecordData::NS {
            target: data.to_string(),
        }),
        "SRV" => parse_srv(data),
        "CAA" => parse_caa(data),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::debug!(
            "Keeping {record_type} record as raw data: {}",
            truncate_for_log(data)
        );
        RecordData::Raw {
            record_type: record_type.to_string(),
            data: data.to_string(),
        }
    })
}

fn parse_ip(data: &str) -> Option<IpAddr> {
    data.trim().parse().ok()
}

fn parse_mx(data: &str) -> Option<RecordData> {
    match data.split_whitespace().collect::<Vec<_>>().as_slice() {
        [preference, target] => Some(RecordData::MX {
            preference: preference.parse().ok()?,
            target: (*target).to_string(),
        }),
        _ => None,
    }
}

fn parse_srv(data: &str) -> Option<RecordData> {
    match data.split_whitespace().collect::<Vec<_>>().as_slice() {
        [priority, weight, port, target] => Some(RecordData::SRV {
            priority: priority.parse().ok()?,
            weight: weight.parse().ok()?,
            port: port.parse().ok()?,
            target: (*target).to_string(),
        }),
        _ => None,
    }
}

fn parse_caa(data: &str) -> Option<RecordData> {
    let (flags, rest) = split_field(data)?;
    let (tag, value) = split_field(rest)?;
    if value.is_empty() {
        return None;
    }
    Some(RecordData::CAA {
        flags: flags.parse().ok()?,
        tag: tag.to_string(),
        value: value.to_string(),
    })
}

/// Split off the first whitespace-delimited field; the remainder keeps inner whitespace.
fn split_field(s: &str) -> Option<(&str, &str)> {
    let (head, tail) = s.trim_start().split_once(char::is_whitespace)?;
    Some((head, tail.trim_start()))
}

/// Convert a typed record into the provider tuple for `zone`.
pub fn encode(record: &Record, zone: &str) -> ProviderRecord {
    ProviderRecord {
        id: record.id.unwrap_or(0),
        name: normalize(&record.name, zone),
        record_type: record.data.record_type().to_string(),
        data: encode_data(&record.data),
        ttl: ttl::to_seconds(record.ttl),
        priority: priority_of(&record.data),
    }
}

/// Encode the type-specific fields into the single data string.
pub fn encode_data(data: &RecordData) -> String {
    match data {
        RecordData::Address { ip } => ip.to_string(),
        RecordData::MX { preference, target } => format!("{preference} {target}"),
        RecordData::TXT { text } => text.clone(),
        RecordData::CNAME { target } | RecordData::NS { target } => target.clone(),
        RecordData::SRV {
            priority,
            weight,
            port,
            target,
        } => format!("{priority} {weight} {port} {target}"),
        RecordData::CAA { flags, tag, value } => format!("{flags} {tag} {value}"),
        RecordData::Raw { data, .. } => data.clone(),
    }
}

fn priority_of(data: &RecordData) -> Option<u16> {
    match data {
        RecordData::MX { preference, .. } => Some(*preference),
        RecordData::SRV { priority, .. } => Some(*priority),
        _ => None,
    }
}
