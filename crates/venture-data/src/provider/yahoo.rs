//! Yahoo Finance quoteSummary 시세 제공자.
//!
//! `/v10/finance/quoteSummary/{symbol}` 엔드포인트에서 여러 모듈을 한 번에 조회하고
//! 모든 모듈의 필드를 하나의 스냅샷으로 평탄화합니다.
//!
//! # 인증
//!
//! quoteSummary는 쿠키와 crumb를 요구합니다:
//! 1. 동의 쿠키 획득 (`fc.yahoo.com`, 응답 상태는 무시)
//! 2. `/v1/test/getcrumb`에서 crumb 획득 후 캐시
//! 3. 401 응답 시 캐시된 crumb를 폐기 (다음 종목에서 재발급)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use venture_data::{QuoteProvider, YahooConfig, YahooQuoteProvider};
//!
//! let provider = YahooQuoteProvider::new(YahooConfig::default())?;
//! let snapshot = provider.fetch_quote(&Symbol::new("ABA.V")?).await?;
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use venture_core::{QuoteSnapshot, Symbol};

use super::QuoteProvider;
use crate::{ProviderError, ProviderResult};

/// 조회할 quoteSummary 모듈 (앞쪽 모듈의 값이 우선).
pub const QUOTE_MODULES: [&str; 4] = [
    "summaryDetail",
    "price",
    "defaultKeyStatistics",
    "financialData",
];

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// 에러 메시지에 포함할 응답 본문 최대 길이
const MAX_ERROR_BODY: usize = 200;

/// Yahoo Finance 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// API 기본 URL
    pub api_base: String,
    /// 동의 쿠키를 받을 URL
    pub cookie_url: String,
    /// 요청 타임아웃
    pub timeout: Duration,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            api_base: "https://query2.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl YahooConfig {
    /// 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 기본 URL을 설정합니다 (테스트/프록시용).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.cookie_url = format!("{}/consent", base);
        self.api_base = base;
        self
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<Map<String, Value>>>,
    error: Option<QuoteSummaryError>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryError {
    code: String,
    #[serde(default)]
    description: String,
}

/// Yahoo Finance 시세 제공자.
pub struct YahooQuoteProvider {
    client: reqwest::Client,
    config: YahooConfig,
    crumb: Mutex<Option<String>>,
}

impl YahooQuoteProvider {
    /// 새 제공자를 생성합니다.
    pub fn new(config: YahooConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            config,
            crumb: Mutex::new(None),
        })
    }

    /// 캐시된 crumb를 반환하거나 새로 발급받습니다.
    async fn crumb(&self) -> ProviderResult<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // 쿠키만 필요하므로 응답 상태는 확인하지 않음
        if let Err(e) = self.client.get(&self.config.cookie_url).send().await {
            debug!(error = %e, "동의 쿠키 요청 실패");
        }

        let response = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.config.api_base))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Crumb(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body)
            )));
        }

        let crumb = body.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(ProviderError::Crumb("빈 crumb 응답".to_string()));
        }

        debug!("Yahoo crumb 발급 완료");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        self.crumb.lock().await.take();
    }

    /// quoteSummary 응답 본문을 스냅샷으로 변환합니다.
    fn parse_summary(symbol: &Symbol, body: &str) -> ProviderResult<QuoteSnapshot> {
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(body)?;
        let summary = envelope.quote_summary;

        if let Some(error) = summary.error {
            return Err(if error.code.eq_ignore_ascii_case("not found") {
                ProviderError::SymbolNotFound(symbol.to_string())
            } else {
                ProviderError::Malformed(format!("{}: {}", error.code, error.description))
            });
        }

        let result = summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ProviderError::SymbolNotFound(symbol.to_string()))?;

        let mut snapshot = QuoteSnapshot::new();
        for module in QUOTE_MODULES {
            if let Some(Value::Object(fields)) = result.get(module) {
                snapshot.merge_json_map(fields);
            }
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> ProviderResult<QuoteSnapshot> {
        let crumb = self.crumb().await?;
        let url = format!(
            "{}/v10/finance/quoteSummary/{}",
            self.config.api_base,
            symbol.as_str()
        );

        let response = self
            .client
            .get(url)
            .query(&[("modules", QUOTE_MODULES.join(",")), ("crumb", crumb)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status.as_u16() {
            200 => {
                let snapshot = Self::parse_summary(symbol, &body)?;
                debug!(symbol = %symbol, fields = snapshot.len(), "Yahoo 스냅샷 수신");
                Ok(snapshot)
            }
            404 => Err(ProviderError::SymbolNotFound(symbol.to_string())),
            401 => {
                warn!(symbol = %symbol, "Yahoo crumb 만료, 다음 요청에서 재발급");
                self.invalidate_crumb().await;
                Err(ProviderError::Status {
                    code: 401,
                    body: truncate(&body),
                })
            }
            code => Err(ProviderError::Status {
                code,
                body: truncate(&body),
            }),
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
