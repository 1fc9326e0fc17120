//! 인메모리 제공자/저장소로 파이프라인 전체를 검증합니다.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use venture_collector::{
    resolve_universe, run_update, CollectorConfig, CollectorError, FailureStage, Pipeline,
    PipelineConfig, RunStats, SymbolOutcome,
};
use venture_core::{CoreError, FieldProfile, FieldValue, ProfileKind, QuoteSnapshot, Symbol, SymbolUniverse};
use venture_data::{
    MemoryStore, MergePolicy, ProviderError, ProviderResult, QuoteProvider, StoredDocument,
};

const COLLECTION: &str = "market_data";

/// 미리 정해둔 스냅샷을 돌려주는 제공자. 등록되지 않은 심볼은 찾을 수 없음.
#[derive(Default)]
struct StubProvider {
    quotes: HashMap<String, QuoteSnapshot>,
    calls: Mutex<Vec<String>>,
    cancel_on_first_fetch: Option<CancellationToken>,
}

impl StubProvider {
    fn with_quote(mut self, symbol: &str, snapshot: QuoteSnapshot) -> Self {
        self.quotes.insert(symbol.to_string(), snapshot);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for StubProvider {
    fn name(&self) -> &str {
        "Stub"
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> ProviderResult<QuoteSnapshot> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(token) = &self.cancel_on_first_fetch {
            token.cancel();
        }
        self.quotes
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| ProviderError::SymbolNotFound(symbol.to_string()))
    }
}

fn universe(symbols: &[&str]) -> SymbolUniverse {
    SymbolUniverse::new(symbols.iter().map(|s| Symbol::new(*s).unwrap()))
}

fn realtime_quote(price: f64) -> QuoteSnapshot {
    QuoteSnapshot::new()
        .with("currentPrice", Some(price))
        .with("volume", Some(12_000.0))
}

fn config(delay_ms: u64) -> PipelineConfig {
    PipelineConfig {
        collection: COLLECTION.to_string(),
        policy: MergePolicy::Merge,
        request_delay: Duration::from_millis(delay_ms),
        progress_every: 2,
    }
}

fn pipeline(provider: StubProvider, store: Arc<MemoryStore>) -> Pipeline<Arc<StubProvider>, Arc<MemoryStore>> {
    Pipeline::new(Arc::new(provider), store, config(0))
}

async fn run(
    pipeline: &Pipeline<Arc<StubProvider>, Arc<MemoryStore>>,
    symbols: &[&str],
    profile: ProfileKind,
) -> RunStats {
    pipeline
        .run(&universe(symbols), profile, &CancellationToken::new())
        .await
}

fn number(doc: &StoredDocument, field: &str) -> Option<f64> {
    doc.get(field).and_then(FieldValue::as_f64)
}

fn nested_number(doc: &StoredDocument, profile: &str, field: &str) -> Option<f64> {
    doc.get(profile)
        .and_then(FieldValue::as_map)
        .and_then(|m| m.get(field))
        .and_then(FieldValue::as_f64)
}

#[tokio::test]
async fn test_fetch_failure_does_not_block_other_symbols() {
    let store = Arc::new(MemoryStore::new());
    let mut previous = StoredDocument::new();
    previous.insert("Price".to_string(), FieldValue::Number(0.5));
    store.insert(COLLECTION, "XYZ", previous.clone()).await;

    let provider = StubProvider::default()
        .with_quote("ABC.V", realtime_quote(1.25))
        .with_quote("SNDL.CN", realtime_quote(2.5));
    let pipeline = pipeline(provider, store.clone());

    let stats = run(&pipeline, &["ABC.V", "XYZ.V", "SNDL.CN"], ProfileKind::Realtime).await;

    assert_eq!(stats.universe_size, 3);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.success + stats.failed, stats.universe_size);
    assert!(!stats.cancelled);
    assert_eq!(stats.failures[0].symbol, "XYZ.V");
    assert_eq!(stats.failures[0].stage, FailureStage::Fetch);

    let abc = store.get(COLLECTION, "ABC").await.unwrap();
    assert_eq!(number(&abc, "Price"), Some(1.25));
    assert_eq!(store.get(COLLECTION, "XYZ").await.unwrap(), previous);
    assert!(store.get(COLLECTION, "SNDL").await.is_some());
}

#[tokio::test]
async fn test_each_symbol_attempted_once_in_order() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(
        StubProvider::default()
            .with_quote("ABA.V", realtime_quote(4.0))
            .with_quote("ORC-B.V", realtime_quote(0.3)),
    );
    let pipeline = Pipeline::new(provider.clone(), store.clone(), config(0));

    let stats = pipeline
        .run(
            &universe(&["ABA.V", "MISSING.V", "ORC-B.V"]),
            ProfileKind::Realtime,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(provider.calls(), vec!["ABA.V", "MISSING.V", "ORC-B.V"]);
    assert_eq!(stats.success, 2);
    assert_eq!(store.write_count().await, 2);
}

#[tokio::test]
async fn test_empty_universe() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(StubProvider::default(), store.clone());

    let stats = run(&pipeline, &[], ProfileKind::Daily).await;

    assert_eq!(stats.universe_size, 0);
    assert_eq!(stats.success, 0);
    assert_eq!(stats.failed, 0);
    assert!(stats.finished_at.is_some());
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn test_daily_merge_keeps_realtime_fields() {
    let store = Arc::new(MemoryStore::new());

    let realtime = pipeline(
        StubProvider::default().with_quote("ABA.V", realtime_quote(4.0)),
        store.clone(),
    );
    run(&realtime, &["ABA.V"], ProfileKind::Realtime).await;

    let daily = pipeline(
        StubProvider::default().with_quote(
            "ABA.V",
            QuoteSnapshot::new()
                .with("marketCap", Some(52_000_000.0))
                .with("beta", Some(1.4)),
        ),
        store.clone(),
    );
    let stats = run(&daily, &["ABA.V"], ProfileKind::Daily).await;
    assert_eq!(stats.success, 1);

    let doc = store.get(COLLECTION, "ABA").await.unwrap();
    assert_eq!(number(&doc, "Price"), Some(4.0));
    assert_eq!(nested_number(&doc, "realtime", "price"), Some(4.0));
    assert_eq!(number(&doc, "MarketCap"), Some(52_000_000.0));
    assert_eq!(nested_number(&doc, "daily", "beta"), Some(1.4));
    assert!(doc["PE"].is_null());
    assert_eq!(doc["ticker"].as_str(), Some("ABA"));
    assert_eq!(doc["fullTicker"].as_str(), Some("ABA.V"));
    assert!(doc["lastUpdated"].as_timestamp().is_some());
}

#[tokio::test]
async fn test_price_falls_back_to_regular_market_price() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(
        StubProvider::default().with_quote(
            "ABA.V",
            QuoteSnapshot::new()
                .with("currentPrice", None)
                .with("regularMarketPrice", Some(4.21)),
        ),
        store.clone(),
    );

    run(&pipeline, &["ABA.V"], ProfileKind::Realtime).await;

    let doc = store.get(COLLECTION, "ABA").await.unwrap();
    assert_eq!(number(&doc, "Price"), Some(4.21));
    assert_eq!(nested_number(&doc, "realtime", "price"), Some(4.21));
}

#[tokio::test]
async fn test_upsert_failure_is_isolated() {
    let store = Arc::new(MemoryStore::new());
    store.fail_key("ABA").await;
    let pipeline = pipeline(
        StubProvider::default()
            .with_quote("ABA.V", realtime_quote(4.0))
            .with_quote("SNDL.CN", realtime_quote(2.5)),
        store.clone(),
    );

    let stats = run(&pipeline, &["ABA.V", "SNDL.CN"], ProfileKind::Realtime).await;

    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.failures[0].stage, FailureStage::Store);
    assert!(store.get(COLLECTION, "ABA").await.is_none());
    assert!(store.get(COLLECTION, "SNDL").await.is_some());
}

#[tokio::test]
async fn test_process_symbol_outcome() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(
        StubProvider::default().with_quote("BTC.PR.A.CN", realtime_quote(0.9)),
        store,
    );

    let outcome = pipeline
        .process_symbol(&Symbol::new("BTC.PR.A.CN").unwrap(), &FieldProfile::REALTIME)
        .await;
    assert_eq!(
        outcome,
        SymbolOutcome::Updated {
            key: "BTC.PR.A".to_string()
        }
    );
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(
        StubProvider::default().with_quote("ABA.V", realtime_quote(4.0)),
        store.clone(),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let stats = pipeline
        .run(&universe(&["ABA.V"]), ProfileKind::Realtime, &cancel)
        .await;

    assert!(stats.cancelled);
    assert_eq!(stats.success + stats.failed, 0);
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_stops_before_next_symbol() {
    let cancel = CancellationToken::new();
    let store = Arc::new(MemoryStore::new());
    let provider = StubProvider {
        cancel_on_first_fetch: Some(cancel.clone()),
        ..Default::default()
    }
    .with_quote("ABA.V", realtime_quote(4.0))
    .with_quote("SNDL.CN", realtime_quote(2.5));
    let pipeline = Pipeline::new(Arc::new(provider), store.clone(), config(1_000));

    let stats = pipeline
        .run(&universe(&["ABA.V", "SNDL.CN"]), ProfileKind::Realtime, &cancel)
        .await;

    assert!(stats.cancelled);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.universe_size, 2);
    assert!(store.get(COLLECTION, "SNDL").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_pacing_after_every_attempt() {
    let store = Arc::new(MemoryStore::new());
    let provider = StubProvider::default()
        .with_quote("ABA.V", realtime_quote(4.0))
        .with_quote("SNDL.CN", realtime_quote(2.5));
    let pipeline = Pipeline::new(Arc::new(provider), store, config(100));

    let start = Instant::now();
    let stats = pipeline
        .run(
            &universe(&["ABA.V", "XYZ.V", "SNDL.CN"]),
            ProfileKind::Realtime,
            &CancellationToken::new(),
        )
        .await;
    let elapsed = start.elapsed();

    assert_eq!(stats.success + stats.failed, 3);
    assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(400), "elapsed {:?}", elapsed);
}

#[test]
fn test_resolve_universe_precedence() {
    let path = std::env::temp_dir().join(format!("venture-symbols-{}.txt", std::process::id()));
    std::fs::write(&path, "# watchlist\nABA.V\nSNDL.CN\n").unwrap();
    let config = CollectorConfig {
        symbols_file: Some(path.clone()),
        ..Default::default()
    };

    let explicit = resolve_universe(Some("ORC-B.V, ABA.V"), &config).unwrap();
    assert_eq!(explicit.len(), 2);
    assert_eq!(explicit.iter().next().unwrap().as_str(), "ORC-B.V");

    let from_file = resolve_universe(None, &config).unwrap();
    assert_eq!(from_file.len(), 2);

    let builtin = resolve_universe(None, &CollectorConfig::default()).unwrap();
    assert!(builtin.len() > 800);

    assert!(resolve_universe(Some(" , "), &config).is_err());
    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_unknown_trigger_makes_no_fetch_or_connect() {
    let provider = Arc::new(StubProvider::default().with_quote("ABA.V", realtime_quote(4.0)));
    let store = Arc::new(MemoryStore::new());
    let mut connected = false;

    let result = run_update(
        Some("monthly"),
        Some("ABA.V"),
        &CollectorConfig::default(),
        provider.clone(),
        |_| {
            connected = true;
            Ok(store.clone())
        },
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(CollectorError::Core(CoreError::UnknownProfile(ref v))) if v == "monthly"
    ));
    assert!(!connected);
    assert!(provider.calls().is_empty());
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn test_invalid_symbols_fail_before_connect() {
    let provider = Arc::new(StubProvider::default());
    let mut connected = false;

    let result = run_update(
        Some("daily"),
        Some(" , "),
        &CollectorConfig::default(),
        provider.clone(),
        |_| {
            connected = true;
            Ok(Arc::new(MemoryStore::new()))
        },
        &CancellationToken::new(),
    )
    .await;

    assert!(result.is_err());
    assert!(!connected);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_run_update_daily_with_explicit_symbols() {
    let provider = Arc::new(
        StubProvider::default()
            .with_quote("ABA.V", realtime_quote(4.0))
            .with_quote("SNDL.CN", realtime_quote(2.5)),
    );
    let store = Arc::new(MemoryStore::new());
    let config = CollectorConfig {
        request_delay_ms: 0,
        ..Default::default()
    };

    let stats = run_update(
        Some("daily"),
        Some("ABA.V,SNDL.CN"),
        &config,
        provider.clone(),
        |_| Ok(store.clone()),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(stats.profile, ProfileKind::Daily);
    assert_eq!(stats.universe_size, 2);
    assert_eq!(stats.success, 2);
    assert_eq!(provider.calls(), vec!["ABA.V", "SNDL.CN"]);
    assert_eq!(store.write_count().await, 2);
    assert!(store.get(COLLECTION, "SNDL").await.is_some());
}
