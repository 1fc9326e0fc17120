//! Firestore REST 문서 저장소.
//!
//! `documents:commit`에 단일 `update` 쓰기를 보냅니다.
//!
//! - `Merge`: `updateMask.fieldPaths`에 문서가 가진 필드 경로만 지정하여
//!   나머지 필드(다른 프로파일의 중첩 매핑 등)를 유지합니다.
//! - `Replace`: 마스크 없이 문서 전체를 교체합니다.
//! - 서버 타임스탬프 필드는 `REQUEST_TIME` 변환으로 기록합니다.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use venture_core::{FieldValue, MergeDocument};

use super::auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource};
use super::{DocumentStore, MergePolicy};
use crate::{StoreError, StoreResult};

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";

/// Firestore 문서 저장소.
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    database: String,
    tokens: Arc<dyn TokenSource>,
}

impl FirestoreStore {
    /// 새 저장소를 생성합니다.
    pub fn new(
        project_id: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let client = build_client(timeout)?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            tokens,
        })
    }

    /// 서비스 계정 자격증명으로 저장소를 생성합니다.
    pub fn from_service_account(key: ServiceAccountKey, timeout: Duration) -> StoreResult<Self> {
        let project_id = key.project_id.clone();
        let tokens = Arc::new(ServiceAccountTokenSource::new(key, build_client(timeout)?));
        Self::new(project_id, tokens, timeout)
    }

    /// 로컬 에뮬레이터에 연결합니다 (`FIRESTORE_EMULATOR_HOST`).
    pub fn emulator(
        host: &str,
        project_id: impl Into<String>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let store = Self::new(project_id, Arc::new(StaticToken("owner".to_string())), timeout)?;
        Ok(store.with_base_url(format!("http://{}", host)))
    }

    /// 기본 URL을 설정합니다.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database)
    }

    fn document_name(&self, collection: &str, key: &str) -> String {
        format!("{}/documents/{}/{}", self.database_path(), collection, key)
    }

    /// commit 요청 본문 생성.
    fn commit_body(
        &self,
        collection: &str,
        key: &str,
        document: &MergeDocument,
        policy: MergePolicy,
    ) -> Value {
        let mut write = Map::new();
        write.insert(
            "update".to_string(),
            json!({
                "name": self.document_name(collection, key),
                "fields": encode_fields(document.fields().iter()),
            }),
        );

        if policy == MergePolicy::Merge {
            let paths: Vec<String> = document
                .field_paths()
                .iter()
                .map(|path| quote_field_path(path))
                .collect();
            write.insert("updateMask".to_string(), json!({ "fieldPaths": paths }));
        }

        let transforms: Vec<Value> = document
            .server_timestamp_fields()
            .map(|field| {
                json!({
                    "fieldPath": quote_field_path(field),
                    "setToServerValue": "REQUEST_TIME",
                })
            })
            .collect();
        if !transforms.is_empty() {
            write.insert("updateTransforms".to_string(), Value::Array(transforms));
        }

        json!({ "writes": [Value::Object(write)] })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "Firestore"
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: &MergeDocument,
        policy: MergePolicy,
    ) -> StoreResult<()> {
        let token = self.tokens.access_token().await?;
        let url = format!(
            "{}/v1/{}/documents:commit",
            self.base_url,
            self.database_path()
        );
        let body = self.commit_body(collection, key, document, policy);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(collection, key, "Firestore 문서 반영 완료");
            return Ok(());
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        match code {
            401 => {
                warn!(key, "Firestore 인증 만료, 토큰 폐기");
                self.tokens.invalidate().await;
                Err(StoreError::Auth(body))
            }
            429 | 500..=599 => Err(StoreError::Unavailable(format!("HTTP {}: {}", code, body))),
            _ => Err(StoreError::Rejected { code, body }),
        }
    }
}

fn build_client(timeout: Duration) -> StoreResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| StoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// 필드를 Firestore Value 형식으로 변환합니다 (서버 타임스탬프 제외).
fn encode_fields<'a>(fields: impl Iterator<Item = (&'a String, &'a FieldValue)>) -> Value {
    let encoded: Map<String, Value> = fields
        .filter_map(|(name, value)| encode_value(value).map(|v| (name.clone(), v)))
        .collect();
    Value::Object(encoded)
}

fn encode_value(value: &FieldValue) -> Option<Value> {
    let encoded = match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Number(n) => json!({ "doubleValue": n }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields.iter()) } }),
        FieldValue::Timestamp(ts) => json!({ "timestampValue": ts.to_rfc3339() }),
        FieldValue::ServerTimestamp => return None,
    };
    Some(encoded)
}

/// 필드 경로의 각 세그먼트를 필요 시 백틱으로 감쌉니다.
///
/// 영문자/밑줄로 시작하고 영숫자/밑줄만 포함한 세그먼트는 그대로 둡니다
/// (예: `52WeekHigh` → `` `52WeekHigh` ``).
fn quote_field_path(path: &str) -> String {
    path.split('.')
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_segment(segment: &str) -> String {
    let simple = segment
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        segment.to_string()
    } else {
        format!("`{}`", segment.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
