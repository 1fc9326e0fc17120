//! 환경변수 기반 설정 모듈.

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;

use venture_data::store::MARKET_DATA_COLLECTION;
use venture_data::ServiceAccountKey;

use crate::{CollectorError, Result};

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 서비스 계정 자격증명 JSON (`FIREBASE_CREDENTIALS`)
    pub credentials: Option<SecretString>,
    /// 프로젝트 ID 재정의
    pub project_id: Option<String>,
    /// Firestore 에뮬레이터 주소 (`host:port`)
    pub emulator_host: Option<String>,
    /// 심볼 목록 파일
    pub symbols_file: Option<PathBuf>,
    /// 대상 컬렉션
    pub collection: String,
    /// 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 진행 로그 주기 (종목 수, 0이면 비활성화)
    pub progress_every: usize,
    /// 요청 타임아웃 (초)
    pub fetch_timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            project_id: None,
            emulator_host: None,
            symbols_file: None,
            collection: MARKET_DATA_COLLECTION.to_string(),
            request_delay_ms: 100,
            progress_every: 50,
            fetch_timeout_secs: 15,
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 주어진 조회 함수로 설정 로드
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            credentials: non_empty("FIREBASE_CREDENTIALS").map(|v| SecretString::new(v.into())),
            project_id: non_empty("FIREBASE_PROJECT_ID"),
            emulator_host: non_empty("FIRESTORE_EMULATOR_HOST"),
            symbols_file: non_empty("MARKET_SYMBOLS_FILE").map(PathBuf::from),
            collection: non_empty("COLLECTION_NAME").unwrap_or(defaults.collection),
            request_delay_ms: parse_or(&lookup, "REQUEST_DELAY_MS", defaults.request_delay_ms),
            progress_every: parse_or(&lookup, "PROGRESS_EVERY", defaults.progress_every),
            fetch_timeout_secs: parse_or(&lookup, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs),
        }
    }

    /// 요청 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// 서비스 계정 자격증명 파싱
    ///
    /// 자격증명이 없거나 형식이 잘못되면 설정 에러입니다.
    pub fn service_account(&self) -> Result<ServiceAccountKey> {
        let raw = self.credentials.as_ref().ok_or_else(|| {
            CollectorError::Config(
                "FIREBASE_CREDENTIALS 환경변수가 설정되지 않았습니다".to_string(),
            )
        })?;
        let mut key = ServiceAccountKey::from_json(raw.expose_secret())?;
        if let Some(project_id) = &self.project_id {
            key.project_id = project_id.clone();
        }
        Ok(key)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
