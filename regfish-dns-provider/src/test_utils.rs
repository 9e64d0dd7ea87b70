//! 测试辅助模块
//!
//! 提供内存中的 `RecordClient` mock，记录每次调用并支持注入错误。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ProviderError, Result};
use crate::provider::RegfishProvider;
use crate::traits::RecordClient;
use crate::types::{ProviderRecord, RegfishCredentials};

/// mock 分配的第一个记录 ID
const FIRST_ASSIGNED_ID: u64 = 1000;

/// 一次 `RecordClient` 调用
///
/// 写操作在记录调用后让出一次执行权，使并发 batch 有机会交错
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    List(String),
    Create(ProviderRecord),
    Update(u64, ProviderRecord),
    Delete(u64),
}

// ===== MockRecordClient =====

pub struct MockRecordClient {
    records: RwLock<Vec<ProviderRecord>>,
    calls: RwLock<Vec<MockCall>>,
    next_id: AtomicU64,
    /// 如果 Some，list 时返回此错误
    list_error: RwLock<Option<ProviderError>>,
    /// data 命中时，create/update 返回对应错误
    data_errors: RwLock<HashMap<String, ProviderError>>,
}

impl MockRecordClient {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(FIRST_ASSIGNED_ID),
            list_error: RwLock::new(None),
            data_errors: RwLock::new(HashMap::new()),
        }
    }

    /// 构造一条已存在的记录
    pub fn stored(id: u64, name: &str, record_type: &str, data: &str, ttl: u32) -> ProviderRecord {
        ProviderRecord {
            id,
            name: name.to_string(),
            record_type: record_type.to_string(),
            data: data.to_string(),
            ttl,
            priority: None,
        }
    }

    pub async fn seed(&self, records: Vec<ProviderRecord>) {
        *self.records.write().await = records;
    }

    pub async fn fail_list(&self, err: ProviderError) {
        *self.list_error.write().await = Some(err);
    }

    pub async fn fail_on_data(&self, data: &str, err: ProviderError) {
        self.data_errors
            .write()
            .await
            .insert(data.to_string(), err);
    }

    pub async fn records(&self) -> Vec<ProviderRecord> {
        self.records.read().await.clone()
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    pub async fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.read().await.iter().filter(|&c| predicate(c)).count()
    }

    async fn check_data(&self, record: &ProviderRecord) -> Result<()> {
        match self.data_errors.read().await.get(&record.data) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(id: u64) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: "mock".to_string(),
            record_id: id,
            raw_message: None,
        }
    }
}

#[async_trait]
impl RecordClient for MockRecordClient {
    async fn list_records(&self, zone: &str) -> Result<Vec<ProviderRecord>> {
        self.calls.write().await.push(MockCall::List(zone.to_string()));
        if let Some(ref err) = *self.list_error.read().await {
            return Err(err.clone());
        }
        Ok(self.records.read().await.clone())
    }

    async fn create_record(&self, record: &ProviderRecord) -> Result<ProviderRecord> {
        self.calls
            .write()
            .await
            .push(MockCall::Create(record.clone()));
        tokio::task::yield_now().await;
        self.check_data(record).await?;

        let created = ProviderRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            ..record.clone()
        };
        self.records.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_record(&self, id: u64, record: &ProviderRecord) -> Result<ProviderRecord> {
        self.calls
            .write()
            .await
            .push(MockCall::Update(id, record.clone()));
        tokio::task::yield_now().await;
        self.check_data(record).await?;

        let mut records = self.records.write().await;
        let stored = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        *stored = ProviderRecord {
            id,
            ..record.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_record(&self, id: u64) -> Result<()> {
        self.calls.write().await.push(MockCall::Delete(id));
        tokio::task::yield_now().await;

        let mut records = self.records.write().await;
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        records.remove(pos);
        Ok(())
    }
}

/// 创建使用给定 mock 的 provider
pub fn provider_with(mock: Arc<MockRecordClient>) -> RegfishProvider {
    RegfishProvider::with_connector(RegfishCredentials::new("test-token"), move |_| {
        let client: Arc<dyn RecordClient> = mock.clone();
        Ok(client)
    })
}
