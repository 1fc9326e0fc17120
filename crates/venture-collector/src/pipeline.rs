//! 조회 → 변환 → 저장 파이프라인.
//!
//! 유니버스를 순서대로 한 번씩 처리합니다. 종목별 실패는 해당 종목의
//! [`SymbolOutcome::Failed`]로 끝나며 다음 종목 처리에 영향을 주지 않습니다.
//! 재시도는 하지 않습니다.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use venture_core::{FieldProfile, MergeDocument, ProfileKind, Symbol, SymbolUniverse};
use venture_data::store::MARKET_DATA_COLLECTION;
use venture_data::{DocumentStore, MergePolicy, QuoteProvider};

use crate::{FailureStage, RateGovernor, RunStats};

/// 파이프라인 설정
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 대상 컬렉션
    pub collection: String,
    /// 쓰기 정책
    pub policy: MergePolicy,
    /// 요청 간 딜레이
    pub request_delay: Duration,
    /// 진행 로그 주기 (0이면 비활성화)
    pub progress_every: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: MARKET_DATA_COLLECTION.to_string(),
            policy: MergePolicy::Merge,
            request_delay: Duration::from_millis(100),
            progress_every: 50,
        }
    }
}

/// 종목 하나의 처리 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// 문서 반영 완료
    Updated {
        /// 문서 키
        key: String,
    },
    /// 처리 실패
    Failed {
        /// 원본 심볼
        symbol: String,
        /// 실패 단계
        stage: FailureStage,
        /// 원인
        cause: String,
    },
}

/// 시장 데이터 갱신 파이프라인.
pub struct Pipeline<P, S> {
    provider: P,
    store: S,
    config: PipelineConfig,
    governor: RateGovernor,
}

impl<P: QuoteProvider, S: DocumentStore> Pipeline<P, S> {
    /// 새 파이프라인을 생성합니다.
    pub fn new(provider: P, store: S, config: PipelineConfig) -> Self {
        let governor = RateGovernor::new(config.request_delay);
        Self {
            provider,
            store,
            config,
            governor,
        }
    }

    /// 종목 하나를 조회하고 병합 저장합니다.
    pub async fn process_symbol(&self, symbol: &Symbol, profile: &FieldProfile) -> SymbolOutcome {
        let snapshot = match self.provider.fetch_quote(symbol).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    symbol = %symbol,
                    exchange = ?symbol.exchange(),
                    error = %e,
                    "시세 조회 실패"
                );
                return SymbolOutcome::Failed {
                    symbol: symbol.to_string(),
                    stage: FailureStage::Fetch,
                    cause: e.to_string(),
                };
            }
        };

        let document = MergeDocument::build(symbol, profile, &snapshot);
        let key = document.key().to_string();

        match self
            .store
            .upsert(&self.config.collection, &key, &document, self.config.policy)
            .await
        {
            Ok(()) => {
                debug!(symbol = %symbol, key = %key, "문서 갱신 완료");
                SymbolOutcome::Updated { key }
            }
            Err(e) => {
                warn!(
                    symbol = %symbol,
                    exchange = ?symbol.exchange(),
                    key = %key,
                    error = %e,
                    "문서 저장 실패"
                );
                SymbolOutcome::Failed {
                    symbol: symbol.to_string(),
                    stage: FailureStage::Store,
                    cause: e.to_string(),
                }
            }
        }
    }

    /// 유니버스 전체를 처리합니다.
    ///
    /// 취소 토큰은 종목 사이에서 확인합니다. 취소되면 남은 종목은 시도하지 않고
    /// 집계에서도 제외됩니다.
    pub async fn run(
        &self,
        universe: &SymbolUniverse,
        profile: ProfileKind,
        cancel: &CancellationToken,
    ) -> RunStats {
        let fields = profile.profile();
        let mut stats = RunStats::new(profile, universe.len());
        stats.log_start();
        info!(
            provider = self.provider.name(),
            store = self.store.name(),
            collection = %self.config.collection,
            delay_ms = self.governor.spacing().as_millis() as u64,
            "파이프라인 구성"
        );

        let mut cancelled = false;
        for symbol in universe {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let outcome = self.process_symbol(symbol, &fields).await;
            stats.record(&outcome);

            if stats.is_progress_point(self.config.progress_every) {
                stats.log_progress();
            }

            tokio::select! {
                _ = self.governor.pace() => {}
                _ = cancel.cancelled() => {}
            }
        }

        if cancelled {
            warn!(
                processed = stats.attempted(),
                universe_size = universe.len(),
                "취소 요청으로 실행 중단"
            );
        }

        stats.finish(cancelled);
        stats
    }
}
