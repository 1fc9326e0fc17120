//! 인메모리 문서 저장소.
//!
//! `--dry-run` 실행과 테스트에서 사용합니다. Firestore와 같은 병합 규칙을 따르며
//! 서버 타임스탬프는 쓰기 시각으로 기록합니다.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::debug;

use venture_core::{FieldValue, MergeDocument};

use super::{merge_fields, DocumentStore, MergePolicy, StoredDocument};
use crate::{StoreError, StoreResult};

#[derive(Default)]
struct MemoryState {
    documents: HashMap<(String, String), StoredDocument>,
    failing_keys: HashSet<String>,
    writes: usize,
}

/// 인메모리 문서 저장소.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 문서 키에 대한 쓰기를 실패시킵니다 (장애 주입).
    pub async fn fail_key(&self, key: impl Into<String>) {
        self.state.lock().await.failing_keys.insert(key.into());
    }

    /// 기존 문서를 직접 넣습니다.
    pub async fn insert(&self, collection: &str, key: &str, document: StoredDocument) {
        self.state
            .lock()
            .await
            .documents
            .insert((collection.to_string(), key.to_string()), document);
    }

    /// 문서 조회.
    pub async fn get(&self, collection: &str, key: &str) -> Option<StoredDocument> {
        self.state
            .lock()
            .await
            .documents
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }

    /// 성공한 쓰기 횟수.
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "Memory"
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: &MergeDocument,
        policy: MergePolicy,
    ) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.failing_keys.contains(key) {
            return Err(StoreError::Unavailable(format!("쓰기 실패 주입: {}", key)));
        }

        let incoming = resolve_server_timestamps(document.fields().clone());
        let slot = (collection.to_string(), key.to_string());
        match policy {
            MergePolicy::Merge => {
                let existing = state.documents.entry(slot).or_default();
                merge_fields(existing, incoming);
            }
            MergePolicy::Replace => {
                state.documents.insert(slot, incoming);
            }
        }
        state.writes += 1;

        debug!(
            collection,
            key,
            ?policy,
            document = %document.to_json(),
            "메모리 문서 반영"
        );
        Ok(())
    }
}

fn resolve_server_timestamps(fields: StoredDocument) -> StoredDocument {
    let now = Utc::now();
    fields
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::ServerTimestamp => FieldValue::Timestamp(now),
                FieldValue::Map(nested) => FieldValue::Map(resolve_server_timestamps(nested)),
                other => other,
            };
            (name, value)
        })
        .collect()
}
