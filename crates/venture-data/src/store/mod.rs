//! 문서 저장소.
//!
//! 모든 쓰기는 `(컬렉션, 문서 키)` 단위의 Upsert입니다. `Merge` 정책에서는
//! 문서에 이미 있는 다른 필드(다른 프로파일이 기록한 중첩 매핑 포함)가 유지됩니다.

pub mod auth;
pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use std::collections::BTreeMap;
use venture_core::{FieldValue, MergeDocument};

use crate::StoreResult;

pub use auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// 시장 데이터 컬렉션 이름.
pub const MARKET_DATA_COLLECTION: &str = "market_data";

/// 저장된 문서 (최상위 필드 → 값).
pub type StoredDocument = BTreeMap<String, FieldValue>;

/// 기존 문서와의 충돌 처리 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// 기존 필드를 유지하고 새 필드만 추가/덮어쓰기 (중첩 매핑은 재귀 병합)
    #[default]
    Merge,
    /// 문서 전체를 교체
    Replace,
}

/// 문서 저장소 인터페이스.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 저장소 이름.
    fn name(&self) -> &str;

    /// 문서를 생성하거나 정책에 따라 기존 문서에 병합합니다.
    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: &MergeDocument,
        policy: MergePolicy,
    ) -> StoreResult<()>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: &MergeDocument,
        policy: MergePolicy,
    ) -> StoreResult<()> {
        (**self).upsert(collection, key, document, policy).await
    }
}

/// 필드를 기존 문서에 재귀적으로 병합합니다.
///
/// 양쪽이 모두 매핑이면 하위 필드 단위로 병합하고, 그 외에는 새 값으로 덮어씁니다.
pub fn merge_fields(target: &mut StoredDocument, source: StoredDocument) {
    for (name, value) in source {
        if let (Some(FieldValue::Map(existing)), FieldValue::Map(incoming)) =
            (target.get_mut(&name), &value)
        {
            merge_fields(existing, incoming.clone());
            continue;
        }
        target.insert(name, value);
    }
}
