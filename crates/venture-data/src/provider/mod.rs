//! 시세 데이터 제공자.

pub mod yahoo;

use async_trait::async_trait;
use venture_core::{QuoteSnapshot, Symbol};

use crate::ProviderResult;

pub use yahoo::{YahooConfig, YahooQuoteProvider};

/// 종목 하나의 시세 스냅샷을 조회하는 외부 제공자.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 제공자 이름.
    fn name(&self) -> &str;

    /// 심볼의 현재 스냅샷 조회.
    async fn fetch_quote(&self, symbol: &Symbol) -> ProviderResult<QuoteSnapshot>;
}

#[async_trait]
impl<P: QuoteProvider + ?Sized> QuoteProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> ProviderResult<QuoteSnapshot> {
        (**self).fetch_quote(symbol).await
    }
}
