//! 요청 간격 제어.

use std::time::Duration;

/// 고정 간격 요청 조절기.
///
/// 시도마다(성공/실패 무관) 같은 시간만큼 대기합니다. 간격이 0이면 대기하지 않습니다.
#[derive(Debug, Clone, Copy)]
pub struct RateGovernor {
    spacing: Duration,
}

impl RateGovernor {
    /// 새 조절기를 생성합니다.
    pub fn new(spacing: Duration) -> Self {
        Self { spacing }
    }

    /// 요청 간격.
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// 다음 요청 전까지 대기합니다.
    pub async fn pace(&self) {
        if !self.spacing.is_zero() {
            tokio::time::sleep(self.spacing).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_pace_sleeps_fixed_spacing() {
        let governor = RateGovernor::new(Duration::from_millis(100));
        let start = Instant::now();
        governor.pace().await;
        governor.pace().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(210));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_spacing_does_not_sleep() {
        let governor = RateGovernor::new(Duration::ZERO);
        let start = Instant::now();
        governor.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
