use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{NewWebhookLog, WebhookLog};

pub const DEFAULT_LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub(crate) struct LogRecord {
    pub received_at: DateTime<Utc>,
    pub log: WebhookLog,
}

#[derive(Debug, Clone)]
pub struct ListLogsParams {
    pub provider: Option<String>,
    pub limit: usize,
}

/// In-memory, capacity-bounded log of every inbound webhook.
///
/// Appends are serialized behind the write lock, so insertion order matches
/// arrival order. Once the store grows past its capacity the oldest entries
/// are dropped. Nothing survives a restart.
#[derive(Debug)]
pub struct LogStore {
    records: RwLock<VecDeque<LogRecord>>,
    capacity: usize,
}

impl LogStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    /// Stores a new entry and returns its generated id.
    pub fn append(&self, entry: NewWebhookLog) -> Uuid {
        self.insert(entry, Utc::now)
    }

    #[cfg(test)]
    pub(crate) fn append_at(&self, entry: NewWebhookLog, received_at: DateTime<Utc>) -> Uuid {
        self.insert(entry, || received_at)
    }

    fn insert(&self, entry: NewWebhookLog, clock: impl FnOnce() -> DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let mut records = self.write_guard();

        // Stamped under the lock so timestamps follow insertion order.
        let received_at = clock();
        let log = WebhookLog {
            id,
            provider: entry.provider,
            timestamp: format_utc(received_at),
            payload: entry.payload,
            results: entry.results,
            success: entry.success,
            error: entry.error,
        };

        info!(
            provider = %log.provider,
            log_id = %id,
            success = log.success,
            results = log.results.len(),
            "webhook logged"
        );

        records.push_back(LogRecord { received_at, log });

        let mut evicted = 0usize;
        while records.len() > self.capacity {
            records.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "evicted oldest log entries");
        }

        id
    }

    pub fn get(&self, id: Uuid) -> Option<WebhookLog> {
        self.read_guard()
            .iter()
            .find(|record| record.log.id == id)
            .map(|record| record.log.clone())
    }

    /// Newest entries first, optionally restricted to one provider.
    pub fn list(&self, params: &ListLogsParams) -> Vec<WebhookLog> {
        let records = self.read_guard();

        // Reverse insertion order keeps ties on timestamp deterministic.
        let mut matching: Vec<&LogRecord> = records
            .iter()
            .rev()
            .filter(|record| match params.provider.as_deref() {
                Some(provider) => record.log.provider == provider,
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.received_at.cmp(&a.received_at));

        matching
            .into_iter()
            .take(params.limit)
            .map(|record| record.log.clone())
            .collect()
    }

    /// Runs `f` against a consistent view of the stored records.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&VecDeque<LogRecord>) -> R) -> R {
        let records = self.read_guard();
        f(&records)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, VecDeque<LogRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, VecDeque<LogRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn format_utc(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
