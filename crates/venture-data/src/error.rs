//! 데이터 제공자 및 저장소 에러 타입.

use thiserror::Error;

/// 시세 조회 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 예상하지 못한 HTTP 상태
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// 제공자가 심볼을 찾지 못함
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 응답 형식 오류
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// crumb/쿠키 획득 실패
    #[error("Crumb error: {0}")]
    Crumb(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// 시세 조회 Result 타입.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// 문서 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 저장소 사용 불가 (5xx, 타임아웃)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// 쓰기 거부 (4xx)
    #[error("Write rejected (HTTP {code}): {body}")]
    Rejected { code: u16, body: String },

    /// 액세스 토큰 발급 실패
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 자격증명 형식 오류
    #[error("Invalid credentials: {0}")]
    Credentials(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

/// 저장소 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;
