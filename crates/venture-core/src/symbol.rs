//! 심볼 및 정규화 키 정의.
//!
//! 심볼은 기준 코드와 거래소 접미사로 구성됩니다 (예: `ABA.V`, `SNDL.CN`).
//! 문서 저장소의 기본 키는 끝의 거래소 접미사만 제거한 정규화 키입니다.
//!
//! - `ABA.V` → `ABA`
//! - `ORC-B.V` → `ORC-B` (내부 하이픈 유지)
//! - `BTC.PR.A.CN` → `BTC.PR.A` (끝 접미사만 제거)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, CoreResult};

/// 알려진 거래소 접미사 (긴 것부터 검사).
pub const KNOWN_SUFFIXES: [&str; 4] = [".CN", ".TO", ".NE", ".V"];

/// 거래소 식별자가 포함된 종목 심볼.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// 새 심볼을 생성합니다.
    ///
    /// 대소문자나 공백 정규화는 수행하지 않으며, 빈 문자열만 거부합니다.
    pub fn new(raw: impl Into<String>) -> CoreResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CoreError::InvalidSymbol(raw));
        }
        Ok(Self(raw))
    }

    /// 원본 심볼 문자열.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 문서 저장소 키로 사용하는 정규화 키.
    pub fn normalized_key(&self) -> String {
        normalize_symbol(&self.0)
    }

    /// 끝에 붙은 거래소 접미사 (점 제외, 예: "V", "CN").
    pub fn exchange(&self) -> Option<&'static str> {
        KNOWN_SUFFIXES
            .iter()
            .find(|suffix| self.0.len() > suffix.len() && self.0.ends_with(*suffix))
            .map(|suffix| &suffix[1..])
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 심볼 끝의 거래소 접미사를 제거합니다.
///
/// 알려진 접미사가 더 이상 남지 않을 때까지 반복하므로 멱등입니다.
/// 제거 결과가 빈 문자열이 되는 경우에는 제거하지 않습니다.
pub fn normalize_symbol(symbol: &str) -> String {
    let mut key = symbol;
    while let Some(stripped) = strip_one_suffix(key) {
        key = stripped;
    }
    key.to_string()
}

fn strip_one_suffix(symbol: &str) -> Option<&str> {
    KNOWN_SUFFIXES.iter().find_map(|suffix| {
        symbol
            .strip_suffix(suffix)
            .filter(|rest| !rest.is_empty())
    })
}
