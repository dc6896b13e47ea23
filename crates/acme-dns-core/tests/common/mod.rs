//! Test doubles and common utilities for reconciler contract tests
//!
//! The mock record API keeps records in memory and logs every call so
//! tests can assert on exactly which requests the reconciler issued.

#![allow(dead_code)]

use acme_dns_core::error::{Error, Operation, Result};
use acme_dns_core::traits::{RecordApi, RecordApiFactory};
use acme_dns_core::{Credentials, DesiredRecord, DnsRecord, SolverConfig};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call received by [`MockRecordApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Create { zone: String, record: DesiredRecord },
    List { zone: String, search: Option<String> },
    Delete { zone: String, record_id: String },
}

/// In-memory record API that logs calls
pub struct MockRecordApi {
    /// Stored records: (zone, record)
    records: Mutex<Vec<(String, DnsRecord)>>,
    /// Every call, in order
    calls: Mutex<Vec<ApiCall>>,
    /// Counter for generating record IDs
    next_id: AtomicUsize,
    /// Fail every create with this status
    fail_create: Option<u16>,
    /// Fail list with this status
    fail_list: Option<u16>,
    /// Record IDs whose delete fails
    fail_delete_ids: HashSet<String>,
    /// Delay applied to every call
    delay: Option<Duration>,
}

impl MockRecordApi {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            fail_create: None,
            fail_list: None,
            fail_delete_ids: HashSet::new(),
            delay: None,
        }
    }

    pub fn with_failure_on_create(mut self, status: u16) -> Self {
        self.fail_create = Some(status);
        self
    }

    pub fn with_failure_on_list(mut self, status: u16) -> Self {
        self.fail_list = Some(status);
        self
    }

    pub fn with_failure_on_delete(mut self, record_id: &str) -> Self {
        self.fail_delete_ids.insert(record_id.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Seed a record directly, bypassing the call log
    pub fn seed(&self, zone: &str, record_id: &str, name: &str, record_type: &str, data: &str) {
        self.records.lock().unwrap().push((
            zone.to_string(),
            DnsRecord {
                record_id: record_id.to_string(),
                name: name.to_string(),
                record_type: record_type.to_string(),
                data: data.to_string(),
                ttl: 120,
                priority: 0,
            },
        ));
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Record IDs passed to delete, in order
    pub fn deleted_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Delete { record_id, .. } => Some(record_id),
                _ => None,
            })
            .collect()
    }

    /// Records currently stored in `zone`
    pub fn records_in(&self, zone: &str) -> Vec<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(z, _)| z == zone)
            .map(|(_, r)| r.clone())
            .collect()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl RecordApi for MockRecordApi {
    async fn create_record(&self, zone: &str, record: &DesiredRecord) -> Result<()> {
        self.calls.lock().unwrap().push(ApiCall::Create {
            zone: zone.to_string(),
            record: record.clone(),
        });
        self.pause().await;

        if let Some(status) = self.fail_create {
            return Err(Error::api(Operation::Create, status, "mock create failure"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.seed(
            zone,
            &format!("record-{}", id),
            &record.name,
            &record.record_type,
            &record.data,
        );
        Ok(())
    }

    async fn list_records(&self, zone: &str, search: Option<&str>) -> Result<Vec<DnsRecord>> {
        self.calls.lock().unwrap().push(ApiCall::List {
            zone: zone.to_string(),
            search: search.map(str::to_string),
        });
        self.pause().await;

        if let Some(status) = self.fail_list {
            return Err(Error::api(Operation::List, status, "mock list failure"));
        }

        // Substring match, like a provider-side search
        Ok(self
            .records_in(zone)
            .into_iter()
            .filter(|r| search.is_none_or(|s| r.name.contains(s)))
            .collect())
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        self.calls.lock().unwrap().push(ApiCall::Delete {
            zone: zone.to_string(),
            record_id: record_id.to_string(),
        });
        self.pause().await;

        if self.fail_delete_ids.contains(record_id) {
            return Err(Error::api(Operation::Delete, 500, "mock delete failure"));
        }

        self.records
            .lock()
            .unwrap()
            .retain(|(z, r)| !(z == zone && r.record_id == record_id));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out a shared [`MockRecordApi`] and recording its inputs
pub struct MockFactory {
    api: Arc<MockRecordApi>,
    created: Mutex<Vec<(SolverConfig, Credentials)>>,
}

impl MockFactory {
    pub fn new(api: Arc<MockRecordApi>) -> Self {
        Self {
            api,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Configs and credentials passed to create(), in order
    pub fn created(&self) -> Vec<(SolverConfig, Credentials)> {
        self.created.lock().unwrap().clone()
    }
}

impl RecordApiFactory for MockFactory {
    fn create(
        &self,
        config: &SolverConfig,
        credentials: Credentials,
    ) -> Result<Arc<dyn RecordApi>> {
        self.created
            .lock()
            .unwrap()
            .push((config.clone(), credentials));
        let api: Arc<dyn RecordApi> = self.api.clone();
        Ok(api)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
