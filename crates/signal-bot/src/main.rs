//! 트레이딩 시그널 봇 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 파이프라인 1회 실행 (수집 -> feature -> 학습 -> 예측)
//! signal-bot run
//!
//! # 데몬 모드: BOT_SCHEDULE_IN_MINUTE 주기로 반복 실행
//! signal-bot daemon
//!
//! # JSON 로그로 실행
//! signal-bot --log-format json daemon
//! ```

use clap::{Parser, Subcommand};
use signal_core::{init_logging, BotConfig, LogConfig, LogFormat};
use signal_data::TwelveDataClient;
use tracing::{error, info};

mod error;
mod report;
mod tick;

#[derive(Parser)]
#[command(name = "signal-bot")]
#[command(about = "Candle-driven trading signal bot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 파이프라인을 한 번 실행
    Run,

    /// 데몬 모드: 주기적으로 전체 파이프라인 실행
    Daemon,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format: LogFormat = cli
        .log_format
        .parse()
        .map_err(|e| anyhow::anyhow!("잘못된 로그 형식: {e}"))?;
    init_logging(LogConfig::new(cli.log_level).with_format(format))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    info!("시그널 봇 시작");

    // 설정 로드
    let config = BotConfig::from_env()?;
    info!(
        ticker = %config.ticker,
        interval = %config.interval,
        lags = config.lag_count,
        artifact = %config.artifact_path.display(),
        "설정 로드 완료"
    );

    let provider = TwelveDataClient::new(config.require_api_key()?);

    match cli.command {
        Commands::Run => {
            tick::run_tick(&config, &provider).await?;
        }
        Commands::Daemon => {
            info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.schedule_minutes
            );

            let mut interval = tokio::time::interval(config.schedule());
            // 이전 틱이 끝나지 않았으면 밀린 틱은 건너뜀 (큐잉 안 함)
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        // 틱 내부의 모든 실패는 여기서 흡수: 로그만 남기고
                        // 프로세스는 계속 돈다. 재시도는 다음 틱.
                        if let Err(e) = tick::run_tick(&config, &provider).await {
                            error!(error = %e, "틱 실패 - 다음 주기에 재시도");
                        }

                        info!(
                            "=== 틱 완료, 다음 실행: {}분 후 ===",
                            config.schedule_minutes
                        );
                    }
                }
            }
        }
    }

    info!("시그널 봇 종료");

    Ok(())
}
