//! End-to-end integration test for the signal pipeline.
//!
//! Drives the complete flow on synthetic candle data:
//! 1. Build the feature table from a candle series
//! 2. Train and evaluate on a chronological split
//! 3. Persist the artifact and load it back
//! 4. Predict the latest row with the loaded artifact

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signal_analytics::ml::forest::ForestConfig;
use signal_analytics::{
    FeatureBuilder, FeatureConfig, MlError, ModelArtifact, ModelTrainer, SignalPredictor,
    TrainerConfig,
};
use signal_core::{Candle, CandleSeries, Timeframe};

fn candle_at(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::minutes(5 * i as i64),
        Decimal::from_f64_retain(open).unwrap_or(dec!(1)),
        Decimal::from_f64_retain(high).unwrap_or(dec!(1)),
        Decimal::from_f64_retain(low).unwrap_or(dec!(1)),
        Decimal::from_f64_retain(close).unwrap_or(dec!(1)),
        dec!(1000),
    )
}

/// Deterministic pseudo random walk without external RNG state.
fn random_walk_series(count: usize, seed: u64) -> CandleSeries {
    let mut price = 100.0;
    let candles: Vec<Candle> = (0..count)
        .map(|i| {
            let noise = (((i as u64).wrapping_mul(6364136223846793005).wrapping_add(seed)
                >> 33) % 1000) as f64
                / 1000.0
                - 0.5;
            let open = price;
            let close = open + noise;
            price = close;
            let high = open.max(close) + 0.1;
            let low = open.min(close) - 0.1;
            candle_at(i, open, high, low, close)
        })
        .collect();

    CandleSeries::new("EUR/USD", Timeframe::M5, candles).unwrap()
}

fn fast_trainer() -> ModelTrainer {
    ModelTrainer::new(TrainerConfig {
        test_ratio: 0.2,
        forest: ForestConfig {
            n_trees: 15,
            min_samples_leaf: 5,
            ..Default::default()
        },
    })
}

#[test]
fn full_pipeline_roundtrip() {
    let series = random_walk_series(220, 7);

    // 1. Features (default config: lag 5, EMA 5/15/100, RSI 14)
    let builder = FeatureBuilder::with_defaults();
    let table = builder.build(&series).unwrap();
    assert_eq!(table.len(), 220 - 99);

    // 2. Train on a chronological split
    let (artifact, evaluation) = fast_trainer().train_and_evaluate(&table).unwrap();
    assert!(evaluation.accuracy >= 0.0 && evaluation.accuracy <= 1.0);
    assert_eq!(
        evaluation.feature_importance.len(),
        table.feature_names().len()
    );

    // 3. Persist atomically and reload
    let dir = std::env::temp_dir().join(format!("signal-pipeline-{}", std::process::id()));
    let path = dir.join("model.json");
    artifact.save(&path).unwrap();
    let loaded = ModelArtifact::load(&path).unwrap();
    assert_eq!(loaded.feature_names, table.feature_names());

    // 4. Predict with the reloaded artifact: never a schema mismatch
    let result = SignalPredictor::new().predict(&table, &loaded).unwrap();
    assert!((result.probabilities[0] + result.probabilities[1] - 1.0).abs() < 1e-9);
    assert_eq!(result.timestamp, table.rows().last().unwrap().timestamp);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn pipeline_is_deterministic_end_to_end() {
    let series = random_walk_series(180, 42);
    let builder = FeatureBuilder::with_defaults();

    let table_a = builder.build(&series).unwrap();
    let table_b = builder.build(&series).unwrap();
    assert_eq!(table_a, table_b);

    let (artifact_a, eval_a) = fast_trainer().train_and_evaluate(&table_a).unwrap();
    let (artifact_b, eval_b) = fast_trainer().train_and_evaluate(&table_b).unwrap();

    assert_eq!(eval_a.accuracy, eval_b.accuracy);
    assert_eq!(eval_a.confusion, eval_b.confusion);

    let probe = &table_a.rows().last().unwrap().values;
    assert_eq!(
        artifact_a.model.predict_proba_one(probe),
        artifact_b.model.predict_proba_one(probe)
    );
}

#[test]
fn stale_artifact_is_rejected() {
    let series = random_walk_series(200, 3);

    let table = FeatureBuilder::with_defaults().build(&series).unwrap();
    let (artifact, _) = fast_trainer().train_and_evaluate(&table).unwrap();

    // Feature schema drifts: an extra lag column
    let drifted_table = FeatureBuilder::new(FeatureConfig::with_lag_count(6))
        .build(&series)
        .unwrap();

    let result = SignalPredictor::new().predict(&drifted_table, &artifact);
    assert!(matches!(result, Err(MlError::SchemaMismatch { .. })));
}

#[test]
fn degenerate_input_fails_before_training() {
    // Too short for the warm-up: feature building already refuses
    let series = random_walk_series(40, 9);
    let result = FeatureBuilder::with_defaults().build(&series);
    assert!(matches!(result, Err(MlError::InsufficientData { .. })));
}

#[test]
fn flat_series_never_divides_by_zero() {
    // All candles have zero range and zero body
    let candles: Vec<Candle> = (0..160).map(|i| candle_at(i, 1.0, 1.0, 1.0, 1.0)).collect();
    let series = CandleSeries::new("EUR/USD", Timeframe::M5, candles).unwrap();

    let table = FeatureBuilder::with_defaults().build(&series).unwrap();

    for row in table.rows() {
        assert!(row.values.iter().all(|v| v.is_finite()));
        assert_eq!(row.patterns.marubozu, 0);
        assert_eq!(row.patterns.pin_bar, 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// For any sufficiently long well-formed series, the feature table
    /// contains no undefined values and keeps ascending timestamps.
    #[test]
    fn feature_table_has_no_undefined_values(seed in 0u64..1000, count in 120usize..200) {
        let series = random_walk_series(count, seed);
        let table = FeatureBuilder::with_defaults().build(&series).unwrap();

        prop_assert!(table.len() >= 1);
        for row in table.rows() {
            prop_assert_eq!(row.values.len(), table.feature_names().len());
            for value in &row.values {
                prop_assert!(value.is_finite());
            }
        }

        for pair in table.rows().windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }
}
