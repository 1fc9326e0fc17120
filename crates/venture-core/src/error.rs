//! 도메인 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 알 수 없는 업데이트 프로파일
    #[error("Unknown update type: {0} (valid types: intraday, daily, weekly)")]
    UnknownProfile(String),

    /// 잘못된 심볼
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// 유니버스 구성 에러
    #[error("Universe error: {0}")]
    Universe(String),

    /// 파일 I/O 에러
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
