//! Market-data updater CLI.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use venture_collector::{run_update, CollectorConfig, CollectorError, Result, RunStats};
use venture_core::{init_logging, CoreError, LogConfig};
use venture_data::{FirestoreStore, MemoryStore, YahooConfig, YahooQuoteProvider};

#[derive(Parser)]
#[command(name = "venture-collector")]
#[command(about = "TSX Venture / CSE market-data updater", long_about = None)]
#[command(version)]
struct Cli {
    /// 업데이트 유형 (intraday, daily, weekly). 생략 시 intraday
    trigger: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 특정 심볼만 처리 (쉼표로 구분, 예: "ABA.V,SNDL.CN")
    #[arg(long)]
    symbols: Option<String>,

    /// 인메모리 저장소 사용 (자격증명 불필요)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig::from_env(cli.log_level.as_str())) {
        eprintln!("로깅 초기화 실패: {}", e);
    }

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("종료 신호 수신, 현재 종목 처리 후 중단");
            signal_token.cancel();
        }
    });

    match run(&cli, &cancel).await {
        Ok(stats) => {
            stats.log_summary();
            ExitCode::SUCCESS
        }
        Err(CollectorError::Core(CoreError::UnknownProfile(value))) => {
            eprintln!("{}", CoreError::UnknownProfile(value));
            eprintln!("Usage: venture-collector [intraday|daily|weekly]");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "실행 준비 실패");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, cancel: &CancellationToken) -> Result<RunStats> {
    let config = CollectorConfig::from_env();
    tracing::debug!(
        collection = %config.collection,
        request_delay_ms = config.request_delay_ms,
        dry_run = cli.dry_run,
        "설정 로드 완료"
    );

    let provider =
        YahooQuoteProvider::new(YahooConfig::default().with_timeout(config.fetch_timeout()))?;
    let trigger = cli.trigger.as_deref();
    let symbols = cli.symbols.as_deref();

    if cli.dry_run {
        let store = Arc::new(MemoryStore::new());
        let stats = run_update(
            trigger,
            symbols,
            &config,
            provider,
            |_| {
                tracing::info!("dry-run: 인메모리 저장소 사용");
                Ok(store.clone())
            },
            cancel,
        )
        .await?;
        tracing::info!(writes = store.write_count().await, "dry-run 쓰기 결과");
        return Ok(stats);
    }

    run_update(trigger, symbols, &config, provider, connect_firestore, cancel).await
}

fn connect_firestore(config: &CollectorConfig) -> Result<FirestoreStore> {
    let timeout = config.fetch_timeout();
    if let Some(host) = &config.emulator_host {
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| "demo-venture".to_string());
        tracing::info!(host = %host, project_id = %project_id, "Firestore 에뮬레이터 사용");
        return Ok(FirestoreStore::emulator(host, project_id, timeout)?);
    }

    let key = config.service_account()?;
    tracing::info!(project_id = %key.project_id, "Firestore 연결 준비");
    Ok(FirestoreStore::from_service_account(key, timeout)?)
}
