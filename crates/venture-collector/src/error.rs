//! 에러 타입 정의.
//!
//! 여기의 에러는 실행 전 설정 단계에서만 발생합니다.
//! 종목별 조회/저장 실패는 [`crate::SymbolOutcome::Failed`]로 집계됩니다.

use thiserror::Error;
use venture_core::CoreError;
use venture_data::{ProviderError, StoreError};

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 프로파일/유니버스 에러
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 저장소 초기화 에러 (자격증명 포함)
    #[error("Store setup error: {0}")]
    Store(#[from] StoreError),

    /// 데이터 제공자 초기화 에러
    #[error("Provider setup error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
