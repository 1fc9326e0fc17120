//! 시장 데이터 문서 (MarketRecord) 및 병합 문서.
//!
//! 정규화 키별로 저장되는 문서의 형태:
//!
//! ```text
//! {
//!   ticker: "ABA",
//!   fullTicker: "ABA.V",
//!   realtime: { price: 4.21, volume: ..., ... },   // 프로파일 이름의 중첩 매핑
//!   Price: 4.21, Volume: ..., ...                  // 하위 호환용 평면 필드
//!   lastUpdated: <서버 타임스탬프>,
//!   dataSource: "Yahoo Finance"
//! }
//! ```
//!
//! 쓰기는 항상 병합입니다. 다른 프로파일이 기록한 필드는 유지됩니다.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::{FieldProfile, QuoteSnapshot, Symbol};

/// 문서의 데이터 소스 태그.
pub const DATA_SOURCE: &str = "Yahoo Finance";

/// 정규화 키 필드 이름.
pub const FIELD_TICKER: &str = "ticker";
/// 원본 심볼 필드 이름.
pub const FIELD_FULL_TICKER: &str = "fullTicker";
/// 서버 타임스탬프 필드 이름.
pub const FIELD_LAST_UPDATED: &str = "lastUpdated";
/// 데이터 소스 필드 이름.
pub const FIELD_DATA_SOURCE: &str = "dataSource";

/// 문서 필드 값.
///
/// 저장소 구현이 각자의 전송 형식으로 변환합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 명시적 부재
    Null,
    /// 숫자 값
    Number(f64),
    /// 문자열 값
    String(String),
    /// 중첩 매핑
    Map(BTreeMap<String, FieldValue>),
    /// 저장소가 할당하는 현재 시각 (쓰기 요청 시)
    ServerTimestamp,
    /// 저장소가 기록한 시각 (읽기 결과)
    Timestamp(DateTime<Utc>),
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl FieldValue {
    /// 숫자 값 조회.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 문자열 값 조회.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 중첩 매핑 조회.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// 기록된 시각 조회.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// 명시적 부재인지 확인.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// 로그/덤프용 JSON 표현.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Number(n) => json!(n),
            FieldValue::String(s) => json!(s),
            FieldValue::Map(m) => Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            FieldValue::ServerTimestamp => json!("SERVER_TIMESTAMP"),
            FieldValue::Timestamp(ts) => json!(ts.to_rfc3339()),
        }
    }
}

/// 한 종목에 대한 병합 쓰기 문서.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeDocument {
    key: String,
    fields: BTreeMap<String, FieldValue>,
}

impl MergeDocument {
    /// 스냅샷을 활성 프로파일에 따라 병합 문서로 변환합니다.
    ///
    /// 값이 없는 필드도 `Null`로 포함하여 문서 스키마를 일정하게 유지합니다.
    pub fn build(symbol: &Symbol, profile: &FieldProfile, snapshot: &QuoteSnapshot) -> Self {
        let key = symbol.normalized_key();
        let extracted = profile.extract(snapshot);

        let mut nested = BTreeMap::new();
        let mut fields = BTreeMap::new();
        for (spec, value) in extracted {
            nested.insert(spec.output.to_string(), FieldValue::from(value));
            fields.insert(spec.flat.to_string(), FieldValue::from(value));
        }

        fields.insert(FIELD_TICKER.to_string(), FieldValue::from(key.as_str()));
        fields.insert(
            FIELD_FULL_TICKER.to_string(),
            FieldValue::from(symbol.as_str()),
        );
        fields.insert(profile.name().to_string(), FieldValue::Map(nested));
        fields.insert(FIELD_LAST_UPDATED.to_string(), FieldValue::ServerTimestamp);
        fields.insert(FIELD_DATA_SOURCE.to_string(), FieldValue::from(DATA_SOURCE));

        Self { key, fields }
    }

    /// 문서 키 (정규화 키).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 최상위 필드.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// 필드 조회.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// 병합 마스크로 사용하는 필드 경로 목록.
    ///
    /// 중첩 매핑은 `realtime.price`처럼 하위 경로로 펼칩니다.
    /// 서버 타임스탬프 필드는 포함하지 않습니다 (변환으로 기록됨).
    pub fn field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (name, value) in &self.fields {
            match value {
                FieldValue::ServerTimestamp => {}
                FieldValue::Map(nested) => {
                    paths.extend(nested.keys().map(|k| format!("{}.{}", name, k)));
                }
                _ => paths.push(name.clone()),
            }
        }
        paths
    }

    /// 로그/덤프용 JSON 표현.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// 서버 타임스탬프로 기록되는 필드 이름.
    pub fn server_timestamp_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, v)| matches!(v, FieldValue::ServerTimestamp))
            .map(|(k, _)| k.as_str())
    }
}
