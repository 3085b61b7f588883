//! 최신 feature 행에 대한 방향 예측.

use crate::ml::artifact::ModelArtifact;
use crate::ml::error::{MlError, MlResult};
use crate::ml::features::FeatureTable;
use signal_core::{Direction, PredictionResult};
use tracing::debug;

/// 학습된 아티팩트로 최신 캔들의 방향을 예측하는 predictor.
#[derive(Debug, Default)]
pub struct SignalPredictor;

impl SignalPredictor {
    /// 새 predictor를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 테이블에서 타임스탬프가 가장 큰 행을 골라 점수를 매깁니다.
    ///
    /// 테이블의 feature 스키마가 아티팩트에 저장된 이름 목록과
    /// 이름·순서까지 정확히 일치하지 않으면 `SchemaMismatch`로 즉시
    /// 실패합니다. 조용한 재정렬이나 0 채움은 오래된 아티팩트를
    /// 숨기므로 하지 않습니다. 선택된 행은 레이블이 없어도 됩니다
    /// (보통 점수 대상인 현재 캔들이 그렇습니다).
    pub fn predict(
        &self,
        table: &FeatureTable,
        artifact: &ModelArtifact,
    ) -> MlResult<PredictionResult> {
        if table.feature_names() != artifact.feature_names.as_slice() {
            return Err(MlError::SchemaMismatch {
                expected: artifact.feature_names.join(", "),
                actual: table.feature_names().join(", "),
            });
        }

        let row = table
            .rows()
            .iter()
            .max_by_key(|row| row.timestamp)
            .ok_or(MlError::InsufficientData {
                required: 1,
                actual: 0,
            })?;

        let probabilities = artifact.model.predict_proba_one(&row.values);

        // argmax; 동률이면 첫 클래스(down)
        let direction = if probabilities[1] > probabilities[0] {
            Direction::Up
        } else {
            Direction::Down
        };
        let confidence = match direction {
            Direction::Up => probabilities[1],
            Direction::Down => probabilities[0],
        };

        debug!(
            timestamp = %row.timestamp,
            direction = direction.label(),
            confidence,
            "예측 완료"
        );

        Ok(PredictionResult {
            direction,
            confidence,
            probabilities,
            patterns: row.patterns,
            timestamp: row.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::features::{FeatureBuilder, FeatureConfig, FeatureTable};
    use crate::ml::forest::ForestConfig;
    use crate::ml::trainer::{ModelTrainer, TrainerConfig};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use signal_core::{Candle, CandleSeries, Timeframe};

    fn synthetic_series(count: usize) -> CandleSeries {
        let candles: Vec<Candle> = (0..count)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.2).sin() * 3.0;
                let open = Decimal::from_f64_retain(base).unwrap_or(dec!(100));
                let close = Decimal::from_f64_retain(base + ((i % 4) as f64 - 1.5) * 0.2)
                    .unwrap_or(open);
                Candle::new(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                        + chrono::Duration::minutes(5 * i as i64),
                    open,
                    open.max(close) + dec!(0.1),
                    open.min(close) - dec!(0.1),
                    close,
                    dec!(1000),
                )
            })
            .collect();

        CandleSeries::new("EUR/USD", Timeframe::M5, candles).unwrap()
    }

    fn small_config() -> FeatureConfig {
        FeatureConfig {
            lag_count: 2,
            ema_periods: vec![3, 5],
            rsi_period: 5,
        }
    }

    fn trained(table: &FeatureTable) -> ModelArtifact {
        let trainer = ModelTrainer::new(TrainerConfig {
            test_ratio: 0.2,
            forest: ForestConfig {
                n_trees: 10,
                min_samples_leaf: 2,
                ..Default::default()
            },
        });
        trainer.train_and_evaluate(table).unwrap().0
    }

    #[test]
    fn test_predict_roundtrip_self_consistency() {
        let table = FeatureBuilder::new(small_config())
            .build(&synthetic_series(100))
            .unwrap();
        let artifact = trained(&table);

        // 같은 builder로 만든 테이블은 절대 SchemaMismatch가 나지 않음
        let result = SignalPredictor::new().predict(&table, &artifact).unwrap();

        assert!(result.confidence >= 0.5 && result.confidence <= 1.0);
        assert!((result.probabilities[0] + result.probabilities[1] - 1.0).abs() < 1e-9);
        // 최신(레이블 없는) 행이 점수 대상
        assert_eq!(
            result.timestamp,
            table.rows().last().unwrap().timestamp
        );
    }

    #[test]
    fn test_predict_schema_mismatch_fails_fast() {
        let table = FeatureBuilder::new(small_config())
            .build(&synthetic_series(100))
            .unwrap();
        let artifact = trained(&table);

        // lag 수가 다른 builder -> feature 이름 목록 불일치
        let drifted = FeatureBuilder::new(FeatureConfig {
            lag_count: 3,
            ema_periods: vec![3, 5],
            rsi_period: 5,
        })
        .build(&synthetic_series(100))
        .unwrap();

        let result = SignalPredictor::new().predict(&drifted, &artifact);
        assert!(matches!(result, Err(MlError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_confidence_matches_predicted_class() {
        let table = FeatureBuilder::new(small_config())
            .build(&synthetic_series(100))
            .unwrap();
        let artifact = trained(&table);

        let result = SignalPredictor::new().predict(&table, &artifact).unwrap();

        let expected = match result.direction {
            Direction::Up => result.probabilities[1],
            Direction::Down => result.probabilities[0],
        };
        assert_eq!(result.confidence, expected);
    }
}
