//! 시세 스냅샷.
//!
//! 데이터 제공자가 한 시점에 반환한 단일 종목의 원시 응답입니다.
//! 제공자 필드 이름 → 숫자 값(또는 없음)의 순서 없는 매핑이며,
//! 저장되지 않고 한 번 소비된 뒤 버려집니다.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// 제공자 필드 이름 → 값 매핑.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSnapshot {
    fields: HashMap<String, Option<f64>>,
}

impl QuoteSnapshot {
    /// 빈 스냅샷.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 값 설정 (빌더).
    pub fn with(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.insert(name, value);
        self
    }

    /// 필드 값 설정.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.fields.insert(name.into(), value);
    }

    /// 이미 값이 없는 경우에만 설정합니다.
    pub fn insert_if_absent(&mut self, name: &str, value: Option<f64>) {
        if self.get(name).is_none() {
            self.fields.insert(name.to_string(), value);
        }
    }

    /// 필드 값 조회.
    ///
    /// 키 없음, 명시적 null, 유한하지 않은 숫자는 모두 없음으로 취급합니다.
    /// `0.0`은 유효한 값입니다.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields
            .get(name)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// 필드 수.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON 객체에서 스냅샷을 생성합니다.
    ///
    /// 일반 숫자와 Yahoo 형식 `{ "raw": n, "fmt": "..." }` 래퍼를 모두 읽습니다.
    /// 빈 객체, 문자열 등 숫자가 아닌 값은 없음으로 기록됩니다.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut snapshot = Self::new();
        snapshot.merge_json_map(map);
        snapshot
    }

    /// JSON 객체의 필드를 병합합니다 (기존 값 우선).
    pub fn merge_json_map(&mut self, map: &Map<String, Value>) {
        for (name, value) in map {
            self.insert_if_absent(name, numeric_value(value));
        }
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(obj) => obj.get("raw").and_then(Value::as_f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_null_are_none() {
        let snapshot = QuoteSnapshot::new().with("currentPrice", None);
        assert_eq!(snapshot.get("currentPrice"), None);
        assert_eq!(snapshot.get("missing"), None);
    }

    #[test]
    fn test_zero_is_present() {
        let snapshot = QuoteSnapshot::new().with("regularMarketChange", Some(0.0));
        assert_eq!(snapshot.get("regularMarketChange"), Some(0.0));
    }

    #[test]
    fn test_non_finite_is_absent() {
        let snapshot = QuoteSnapshot::new().with("trailingPE", Some(f64::INFINITY));
        assert_eq!(snapshot.get("trailingPE"), None);
    }

    #[test]
    fn test_from_json_map_reads_raw_wrappers() {
        let value = json!({
            "regularMarketPrice": { "raw": 4.21, "fmt": "4.21" },
            "volume": 12000,
            "currentPrice": {},
            "currency": "CAD",
            "beta": null
        });
        let snapshot = QuoteSnapshot::from_json_map(value.as_object().unwrap());
        assert_eq!(snapshot.get("regularMarketPrice"), Some(4.21));
        assert_eq!(snapshot.get("volume"), Some(12000.0));
        assert_eq!(snapshot.get("currentPrice"), None);
        assert_eq!(snapshot.get("currency"), None);
        assert_eq!(snapshot.get("beta"), None);
    }

    #[test]
    fn test_merge_keeps_existing_value() {
        let first = json!({ "marketCap": { "raw": 1000 } });
        let second = json!({ "marketCap": { "raw": 2000 }, "beta": 1.2 });
        let mut snapshot = QuoteSnapshot::from_json_map(first.as_object().unwrap());
        snapshot.merge_json_map(second.as_object().unwrap());
        assert_eq!(snapshot.get("marketCap"), Some(1000.0));
        assert_eq!(snapshot.get("beta"), Some(1.2));
    }
}
