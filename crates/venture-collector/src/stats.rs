//! 실행 통계 및 보고.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use venture_core::ProfileKind;

use crate::SymbolOutcome;

/// 실패가 발생한 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// 시세 조회
    Fetch,
    /// 문서 저장
    Store,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// 종목별 실패 상세.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDetail {
    /// 원본 심볼
    pub symbol: String,
    /// 실패 단계
    pub stage: FailureStage,
    /// 원인
    pub cause: String,
}

/// 한 번의 실행에 대한 통계
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// 활성 프로파일
    pub profile: ProfileKind,
    /// 유니버스 크기
    pub universe_size: usize,
    /// 성공 횟수
    pub success: usize,
    /// 실패 횟수
    pub failed: usize,
    /// 시작 시각
    pub started_at: DateTime<Utc>,
    /// 종료 시각
    pub finished_at: Option<DateTime<Utc>>,
    /// 취소로 중단되었는지 여부
    pub cancelled: bool,
    /// 실패 목록
    pub failures: Vec<FailureDetail>,
}

impl RunStats {
    /// 새 통계 객체 생성
    pub fn new(profile: ProfileKind, universe_size: usize) -> Self {
        Self {
            profile,
            universe_size,
            success: 0,
            failed: 0,
            started_at: Utc::now(),
            finished_at: None,
            cancelled: false,
            failures: Vec::new(),
        }
    }

    /// 종목 결과 반영
    pub fn record(&mut self, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Updated { .. } => self.success += 1,
            SymbolOutcome::Failed {
                symbol,
                stage,
                cause,
            } => {
                self.failed += 1;
                self.failures.push(FailureDetail {
                    symbol: symbol.clone(),
                    stage: *stage,
                    cause: cause.clone(),
                });
            }
        }
    }

    /// 시도한 종목 수
    pub fn attempted(&self) -> usize {
        self.success + self.failed
    }

    /// 진행 로그를 남길 시점인지 확인 (`every`개마다, 0이면 비활성화)
    pub fn is_progress_point(&self, every: usize) -> bool {
        let attempted = self.attempted();
        every > 0 && attempted > 0 && attempted % every == 0
    }

    /// 실행 종료 기록
    pub fn finish(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
        self.finished_at = Some(Utc::now());
    }

    /// 소요 시간
    pub fn elapsed(&self) -> Duration {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).to_std().unwrap_or_default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            0.0
        } else {
            (self.success as f64 / attempted as f64) * 100.0
        }
    }

    /// 시작 로그 출력
    pub fn log_start(&self) {
        tracing::info!(
            profile = %self.profile,
            universe_size = self.universe_size,
            started_at = %self.started_at.to_rfc3339(),
            "시장 데이터 갱신 시작"
        );
    }

    /// 진행 로그 출력
    pub fn log_progress(&self) {
        tracing::info!(
            profile = %self.profile,
            processed = self.attempted(),
            universe_size = self.universe_size,
            success = self.success,
            failed = self.failed,
            "진행 상황"
        );
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self) {
        let finished_at = self
            .finished_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        tracing::info!(
            profile = %self.profile,
            universe_size = self.universe_size,
            success = self.success,
            failed = self.failed,
            cancelled = self.cancelled,
            finished_at = %finished_at,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed().as_secs_f64()),
            "시장 데이터 갱신 완료"
        );

        if !self.failures.is_empty() {
            let symbols: Vec<&str> = self.failures.iter().map(|f| f.symbol.as_str()).collect();
            tracing::warn!(count = symbols.len(), symbols = ?symbols, "실패 종목");
        }
    }
}
