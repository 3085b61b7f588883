//! 단일 틱 파이프라인.
//!
//! 수집 -> feature 생성 -> 학습/평가 -> 아티팩트 저장 -> 예측을
//! 하나의 순차 작업으로 실행합니다. 틱 안에서는 재시도하지 않으며,
//! 실패는 그대로 틱 경계로 전파됩니다.

use crate::error::TickError;
use crate::report;
use signal_analytics::{
    FeatureBuilder, FeatureConfig, ModelArtifact, ModelTrainer, SignalPredictor,
};
use signal_core::{BotConfig, PredictionResult};
use signal_data::CandleProvider;
use tracing::info;

/// 파이프라인을 한 번 실행하고 예측 결과를 반환합니다.
pub async fn run_tick<P>(config: &BotConfig, provider: &P) -> Result<PredictionResult, TickError>
where
    P: CandleProvider + ?Sized,
{
    info!(ticker = %config.ticker, interval = %config.interval, "=== 틱 시작 ===");

    // 1. 데이터 수집
    let series = provider
        .fetch_series(&config.ticker, config.interval, config.output_size)
        .await?;
    info!(candles = series.len(), "캔들 수신");

    // 2. feature 생성
    let builder = FeatureBuilder::new(FeatureConfig::with_lag_count(config.lag_count));
    let table = builder.build(&series)?;
    info!(
        rows = table.len(),
        labeled = table.labeled_count(),
        features = table.feature_names().len(),
        "feature 테이블 생성"
    );

    // 3. 학습 및 평가
    let trainer = ModelTrainer::with_defaults();
    let (artifact, evaluation) = trainer.train_and_evaluate(&table)?;
    evaluation.log_summary();

    // 4. 아티팩트 영속화 (원자적 교체)
    artifact.save(&config.artifact_path)?;

    // 5. 예측 - 아티팩트는 매 틱 디스크에서 새로 로드 (메모리 캐시 없음)
    let loaded = ModelArtifact::load(&config.artifact_path)?;
    let prediction = SignalPredictor::new().predict(&table, &loaded)?;

    report::log_operation(&config.ticker, config.interval, &prediction);

    Ok(prediction)
}
