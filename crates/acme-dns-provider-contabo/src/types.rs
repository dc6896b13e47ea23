//! Contabo API wire types

use acme_dns_core::{DesiredRecord, DnsRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /v1/dns/zones/{zone}/records`
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub ttl: u32,
    pub prio: u32,
    pub data: &'a str,
}

impl<'a> From<&'a DesiredRecord> for CreateRecordRequest<'a> {
    fn from(record: &'a DesiredRecord) -> Self {
        Self {
            name: &record.name,
            record_type: &record.record_type,
            ttl: record.ttl,
            prio: record.priority,
            data: &record.data,
        }
    }
}

/// Response of `GET /v1/dns/zones/{zone}/records`
#[derive(Debug, Deserialize)]
pub(crate) struct ListRecordsResponse {
    #[serde(default)]
    pub data: Vec<ContaboRecord>,
}

/// Record ID as sent by the API
///
/// Documented as an integer; strings are accepted so an API change does not
/// break CleanUp.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One record in a list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContaboRecord {
    pub record_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub ttl: i64,
    #[serde(default)]
    pub prio: i64,
}

impl From<ContaboRecord> for DnsRecord {
    fn from(record: ContaboRecord) -> Self {
        DnsRecord {
            record_id: record.record_id.to_string(),
            name: record.name,
            record_type: record.record_type,
            data: record.data,
            ttl: u32::try_from(record.ttl).unwrap_or_default(),
            priority: u32::try_from(record.prio).unwrap_or_default(),
        }
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
}

/// Error body returned with non-success statuses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub message: String,
}

impl ApiErrorResponse {
    /// Provider message from a raw body, if one is present
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
    }
}
