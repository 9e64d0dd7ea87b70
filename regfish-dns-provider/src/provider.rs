//! Batch record operations against a regfish zone.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tokio_util::sync::CancellationToken;

use crate::convert::{decode, encode};
use crate::error::{Operation, ProviderError, ReconcileError, ReconcileResult};
use crate::matcher::{MatchPolicy, find, matching};
use crate::providers::RegfishClient;
use crate::traits::RecordClient;
use crate::types::{ProviderRecord, Record, RecordIdentity, RegfishCredentials};

const PROVIDER_NAME: &str = "regfish";

type Connector = Box<
    dyn Fn(&RegfishCredentials) -> crate::error::Result<Arc<dyn RecordClient>> + Send + Sync,
>;

/// Typed record operations for regfish-hosted zones.
///
/// Every batch operation holds an instance-wide lock from start to finish, so batches on
/// the same provider never interleave. The underlying [`RecordClient`] is built on first
/// use and shared by all later calls.
///
/// Batches run sequentially and stop at the first failing record. Records processed before
/// the failure stay applied.
pub struct RegfishProvider {
    credentials: RegfishCredentials,
    connector: Connector,
    client: OnceCell<Arc<dyn RecordClient>>,
    lock: Mutex<()>,
}

impl RegfishProvider {
    /// Provider backed by the regfish HTTP API.
    pub fn new(credentials: RegfishCredentials) -> Self {
        Self::with_connector(credentials, |credentials| {
            let client: Arc<dyn RecordClient> = Arc::new(RegfishClient::new(credentials)?);
            Ok(client)
        })
    }

    /// Provider whose client is built by `connector`.
    ///
    /// The connector runs at most once successfully per provider instance.
    pub fn with_connector<F>(credentials: RegfishCredentials, connector: F) -> Self
    where
        F: Fn(&RegfishCredentials) -> crate::error::Result<Arc<dyn RecordClient>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            credentials,
            connector: Box::new(connector),
            client: OnceCell::new(),
            lock: Mutex::new(()),
        }
    }

    /// Build the client if that has not happened yet.
    ///
    /// Calling this is optional: every batch operation initializes on demand. A failed
    /// initialization is not cached; the next call tries again.
    pub async fn ensure_initialized(&self) -> ReconcileResult<()> {
        self.client().await.map(|_| ())
    }

    async fn client(&self) -> ReconcileResult<Arc<dyn RecordClient>> {
        self.client
            .get_or_try_init(|| async {
                log::debug!("[{PROVIDER_NAME}] Initializing client");
                (self.connector)(&self.credentials).map_err(|e| ReconcileError::ClientInit {
                    provider: PROVIDER_NAME.to_string(),
                    detail: e.to_string(),
                })
            })
            .await
            .map(Arc::clone)
    }

    /// Take the lock and a ready client for one batch on `zone`.
    async fn session(
        &self,
        zone: &str,
        cancel: &CancellationToken,
    ) -> ReconcileResult<ZoneSession<'_>> {
        if cancel.is_cancelled() {
            return Err(ReconcileError::Cancelled {
                zone: zone.to_string(),
            });
        }
        let guard = self.lock.lock().await;
        let client = self.client().await?;
        Ok(ZoneSession {
            _guard: guard,
            client,
            zone: zone.to_string(),
        })
    }

    /// All records of `zone`, decoded.
    pub async fn list_records(
        &self,
        zone: &str,
        cancel: &CancellationToken,
    ) -> ReconcileResult<Vec<Record>> {
        let session = self.session(zone, cancel).await?;
        let existing = session.fetch().await.inspect_err(log_failure)?;
        Ok(existing.iter().map(|r| decode(r, zone)).collect())
    }

    /// Create every record in `records` without checking for existing ones.
    ///
    /// Returns the created records as stored by the provider.
    pub async fn append_records(
        &self,
        zone: &str,
        records: &[Record],
        cancel: &CancellationToken,
    ) -> ReconcileResult<Vec<Record>> {
        let session = self.session(zone, cancel).await?;
        log::debug!("[{PROVIDER_NAME}] Appending {} records to {zone}", records.len());

        let mut created = Vec::with_capacity(records.len());
        for record in records {
            created.push(session.append(record).await.inspect_err(log_failure)?);
        }
        Ok(created)
    }

    /// Create or overwrite every record in `records`.
    ///
    /// An existing record with the same name and type (or the same id) is updated, otherwise
    /// a new record is created. Returns the records as stored by the provider.
    pub async fn set_records(
        &self,
        zone: &str,
        records: &[Record],
        cancel: &CancellationToken,
    ) -> ReconcileResult<Vec<Record>> {
        let session = self.session(zone, cancel).await?;
        log::debug!("[{PROVIDER_NAME}] Setting {} records in {zone}", records.len());

        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            stored.push(session.upsert(record).await.inspect_err(log_failure)?);
        }
        Ok(stored)
    }

    /// Delete every record in `records`.
    ///
    /// Each record must match an existing one by name, type and data (or by id). A record
    /// without a match fails the batch with [`ReconcileError::RecordNotFound`] and nothing is
    /// deleted for it. Returns the input records.
    pub async fn delete_records(
        &self,
        zone: &str,
        records: &[Record],
        cancel: &CancellationToken,
    ) -> ReconcileResult<Vec<Record>> {
        let session = self.session(zone, cancel).await?;
        log::debug!("[{PROVIDER_NAME}] Deleting {} records from {zone}", records.len());

        let mut existing = session.fetch().await.inspect_err(log_failure)?;
        let mut deleted = Vec::with_capacity(records.len());
        for record in records {
            session
                .delete(&mut existing, record)
                .await
                .inspect_err(log_failure)?;
            deleted.push(record.clone());
        }
        Ok(deleted)
    }
}

impl std::fmt::Debug for RegfishProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegfishProvider")
            .field("credentials", &self.credentials)
            .field("initialized", &self.client.initialized())
            .finish_non_exhaustive()
    }
}

fn log_failure(e: &ReconcileError) {
    if e.is_expected() {
        log::warn!("[{PROVIDER_NAME}] {e}");
    } else {
        log::error!("[{PROVIDER_NAME}] {e}");
    }
}

/// Exclusive access to one zone for the duration of a batch.
struct ZoneSession<'a> {
    _guard: MutexGuard<'a, ()>,
    client: Arc<dyn RecordClient>,
    zone: String,
}

impl ZoneSession<'_> {
    fn record_error(
        &self,
        record: &Record,
        operation: Operation,
    ) -> impl FnOnce(ProviderError) -> ReconcileError + '_ {
        let identity = RecordIdentity::from(record);
        move |source| ReconcileError::Record {
            zone: self.zone.clone(),
            record: identity,
            operation,
            source,
        }
    }

    async fn fetch(&self) -> ReconcileResult<Vec<ProviderRecord>> {
        self.client
            .list_records(&self.zone)
            .await
            .map_err(|source| ReconcileError::Zone {
                zone: self.zone.clone(),
                operation: Operation::List,
                source,
            })
    }

    async fn append(&self, record: &Record) -> ReconcileResult<Record> {
        let candidate = encode(record, &self.zone);
        let created = self
            .client
            .create_record(&candidate)
            .await
            .map_err(self.record_error(record, Operation::Create))?;
        log::debug!(
            "[{PROVIDER_NAME}] Created record {} ({} {})",
            created.id,
            created.record_type,
            created.name
        );
        Ok(decode(&created, &self.zone))
    }

    /// Update the record matching `record` by name and type, or create it.
    async fn upsert(&self, record: &Record) -> ReconcileResult<Record> {
        let existing = self
            .client
            .list_records(&self.zone)
            .await
            .map_err(self.record_error(record, Operation::List))?;
        let candidate = encode(record, &self.zone);

        let mut hits = matching(&existing, &candidate, &self.zone, MatchPolicy::NameAndType);
        let Some(matched) = hits.next() else {
            return self.append(record).await;
        };
        let id = matched.id;
        // provider order decides which duplicate gets overwritten
        if hits.next().is_some() {
            log::warn!(
                "[{PROVIDER_NAME}] Several {} records named {} in {}, updating {id}",
                candidate.record_type,
                candidate.name,
                self.zone
            );
        }

        let updated = self
            .client
            .update_record(id, &candidate)
            .await
            .map_err(self.record_error(record, Operation::Update))?;
        log::debug!(
            "[{PROVIDER_NAME}] Updated record {id} ({} {})",
            updated.record_type,
            updated.name
        );
        Ok(decode(&updated, &self.zone))
    }

    /// Delete the record matching `record` by name, type and data, and drop it from
    /// `existing` so the same id is never targeted twice.
    async fn delete(
        &self,
        existing: &mut Vec<ProviderRecord>,
        record: &Record,
    ) -> ReconcileResult<()> {
        let candidate = encode(record, &self.zone);
        let Some(id) = find(existing, &candidate, &self.zone, MatchPolicy::NameTypeAndData)
            .map(|matched| matched.id)
        else {
            return Err(ReconcileError::RecordNotFound {
                zone: self.zone.clone(),
                record: RecordIdentity::from(record),
            });
        };

        self.client
            .delete_record(id)
            .await
            .map_err(self.record_error(record, Operation::Delete))?;
        log::debug!("[{PROVIDER_NAME}] Deleted record {id}");

        if let Some(pos) = existing.iter().position(|r| r.id == id) {
            existing.remove(pos);
        }
        Ok(())
    }
}
