//! Scheduled market-data updater for TSX Venture and CSE listings.
//!
//! 이 crate는 외부 스케줄러가 호출하는 배치 바이너리를 제공합니다:
//! - 트리거(`intraday`/`daily`/`weekly`)에 따른 필드 프로파일 선택
//! - 종목별 조회 → 변환 → 병합 저장 파이프라인
//! - 고정 간격 요청 조절
//! - 실행 통계 보고

pub mod config;
pub mod error;
pub mod governor;
pub mod pipeline;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use governor::RateGovernor;
pub use pipeline::{Pipeline, PipelineConfig, SymbolOutcome};
pub use stats::{FailureDetail, FailureStage, RunStats};

use tokio_util::sync::CancellationToken;
use venture_core::{ProfileKind, SymbolUniverse};
use venture_data::{DocumentStore, QuoteProvider};

/// 트리거에 해당하는 프로파일로 한 번의 갱신을 실행합니다.
///
/// 순서: 트리거 해석 → 유니버스 결정 → 저장소 연결(`connect`) → 파이프라인 실행.
/// 앞 단계가 실패하면 저장소 연결이나 조회는 일어나지 않습니다.
pub async fn run_update<P, S>(
    trigger: Option<&str>,
    symbols: Option<&str>,
    config: &CollectorConfig,
    provider: P,
    connect: impl FnOnce(&CollectorConfig) -> Result<S>,
    cancel: &CancellationToken,
) -> Result<RunStats>
where
    P: QuoteProvider,
    S: DocumentStore,
{
    let profile = ProfileKind::from_trigger(trigger)?;
    let universe = resolve_universe(symbols, config)?;
    let store = connect(config)?;

    let pipeline = Pipeline::new(provider, store, PipelineConfig::from(config));
    Ok(pipeline.run(&universe, profile, cancel).await)
}

/// 실행할 유니버스를 결정합니다.
///
/// 우선순위: 명시적 목록 → 심볼 파일 → 기본 유니버스.
pub fn resolve_universe(explicit: Option<&str>, config: &CollectorConfig) -> Result<SymbolUniverse> {
    if let Some(list) = explicit {
        let universe = SymbolUniverse::parse_list(list)?;
        if universe.is_empty() {
            return Err(CollectorError::Config(
                "--symbols 목록이 비어 있습니다".to_string(),
            ));
        }
        return Ok(universe);
    }
    if let Some(path) = &config.symbols_file {
        return Ok(SymbolUniverse::from_file(path)?);
    }
    Ok(SymbolUniverse::default_universe())
}

impl From<&CollectorConfig> for PipelineConfig {
    fn from(config: &CollectorConfig) -> Self {
        Self {
            collection: config.collection.clone(),
            request_delay: config.request_delay(),
            progress_every: config.progress_every,
            ..Default::default()
        }
    }
}
