//! 캔들 시리즈에서 feature 테이블을 생성하는 feature engineering.
//!
//! 각 캔들에 대해 lag 수익률, EMA/RSI 지표, 캔들 패턴 시그널을
//! 계산하고 다음 캔들 종가로 이진 레이블을 만듭니다. 워밍업 구간
//! 때문에 feature가 하나라도 정의되지 않은 행은 버려집니다.
//! 유지되는 모든 행에는 미정의 값이 없습니다.

use crate::indicators::{
    EmaParams, MomentumCalculator, PatternDetector, RsiParams, TrendIndicators,
};
use crate::ml::error::{MlError, MlResult};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use signal_core::{CandleSeries, PatternSnapshot, Timeframe};

/// feature 추출을 위한 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// lag 수익률 feature 수 (1 이상)
    pub lag_count: usize,
    /// 계산할 EMA 기간
    pub ema_periods: Vec<usize>,
    /// RSI 기간
    pub rsi_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lag_count: 5,
            ema_periods: vec![5, 15, 100],
            rsi_period: 14,
        }
    }
}

impl FeatureConfig {
    /// lag 수만 바꾼 기본 설정을 생성합니다.
    pub fn with_lag_count(lag_count: usize) -> Self {
        Self {
            lag_count,
            ..Default::default()
        }
    }

    /// 고정 순서의 feature 이름 목록을 반환합니다.
    ///
    /// 이 순서가 모델 아티팩트에 저장되는 feature 스키마입니다.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_count());

        for k in 1..=self.lag_count {
            names.push(format!("lag_{}", k));
        }
        for period in &self.ema_periods {
            names.push(format!("ema_{}", period));
        }
        names.push(format!("rsi_{}", self.rsi_period));
        names.push("engulfing".to_string());
        names.push("pin_bar".to_string());
        names.push("inside_bar".to_string());
        names.push("marubozu".to_string());

        names
    }

    /// 예상되는 feature 벡터 크기를 반환합니다.
    pub fn feature_count(&self) -> usize {
        // lag + EMA + RSI(1) + 패턴(4)
        self.lag_count + self.ema_periods.len() + 1 + 4
    }

    /// 최소한 한 행이 살아남기 위해 필요한 캔들 수를 반환합니다.
    pub fn min_candles_required(&self) -> usize {
        let max_ema = self.ema_periods.iter().max().copied().unwrap_or(0);

        *[
            self.lag_count + 1,
            max_ema,
            self.rsi_period + 1,
        ]
        .iter()
        .max()
        .unwrap_or(&1)
    }
}

/// 단일 캔들에서 파생된 feature 행.
///
/// feature 벡터는 테이블의 feature 이름 목록과 같은 순서이며, 원시
/// 가격과 레이블은 벡터 밖에 별도로 보관됩니다 (모델 입력에 섞이지
/// 않음).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// 원본 캔들의 시작 시간
    pub timestamp: DateTime<Utc>,
    /// feature 값 (feature_names와 같은 순서)
    pub values: Vec<f64>,
    /// 원본 캔들의 종가 (레이블링/리포트용)
    pub close: Decimal,
    /// 다음 캔들의 종가 (마지막 행은 None)
    pub price_future: Option<Decimal>,
    /// 이진 레이블: price_future > close 이면 1 (마지막 행은 None)
    pub target: Option<u8>,
    /// 패턴 플래그 스냅샷 (감사/로깅용)
    pub patterns: PatternSnapshot,
}

/// 시간 오름차순 feature 행들의 테이블.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// 종목 식별자
    pub symbol: String,
    /// 캔들 간격
    pub timeframe: Timeframe,
    feature_names: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// feature 이름 목록 (고정 순서).
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// 모든 행 (시간 오름차순).
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 테이블이 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 레이블이 있는 행 수 (학습 가능 샘플 수).
    pub fn labeled_count(&self) -> usize {
        self.rows.iter().filter(|r| r.target.is_some()).count()
    }
}

/// 행 조립 중간 결과. feature가 아직 `Option`인 상태.
struct RawRow {
    timestamp: DateTime<Utc>,
    values: Vec<Option<f64>>,
    close: Decimal,
    price_future: Option<Decimal>,
    target: Option<u8>,
    patterns: PatternSnapshot,
}

/// 캔들 시리즈를 feature 테이블로 변환하는 builder.
///
/// 출력은 입력 시리즈와 설정만의 순수 함수입니다 (난수도 외부
/// 입출력도 없음).
pub struct FeatureBuilder {
    config: FeatureConfig,
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    patterns: PatternDetector,
}

impl FeatureBuilder {
    /// 주어진 설정으로 builder를 생성합니다.
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            config,
            trend: TrendIndicators::new(),
            momentum: MomentumCalculator::new(),
            patterns: PatternDetector::new(),
        }
    }

    /// 기본 설정으로 builder를 생성합니다.
    pub fn with_defaults() -> Self {
        Self::new(FeatureConfig::default())
    }

    /// 설정을 반환합니다.
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// feature 테이블을 생성합니다.
    ///
    /// 워밍업 구간에 걸려 feature가 미정의인 행은 버려지며, 남은 행이
    /// `lag_count + 1`개 미만이면 `InsufficientData`를 반환합니다.
    /// 레이블이 없는 마지막 행은 학습에서 제외될 뿐 테이블에는
    /// 유지됩니다 (예측 대상 행).
    pub fn build(&self, series: &CandleSeries) -> MlResult<FeatureTable> {
        let required = self.config.min_candles_required();
        if series.len() < required {
            return Err(MlError::InsufficientData {
                required,
                actual: series.len(),
            });
        }

        let raw_rows = self.assemble(series)?;

        let rows: Vec<FeatureRow> = raw_rows
            .into_iter()
            .filter_map(|raw| {
                let values: Option<Vec<f64>> = raw.values.into_iter().collect();
                values.map(|values| FeatureRow {
                    timestamp: raw.timestamp,
                    values,
                    close: raw.close,
                    price_future: raw.price_future,
                    target: raw.target,
                    patterns: raw.patterns,
                })
            })
            .collect();

        let min_rows = self.config.lag_count + 1;
        if rows.len() < min_rows {
            return Err(MlError::InsufficientData {
                required: min_rows,
                actual: rows.len(),
            });
        }

        Ok(FeatureTable {
            symbol: series.symbol.clone(),
            timeframe: series.timeframe,
            feature_names: self.config.feature_names(),
            rows,
        })
    }

    /// 모든 캔들에 대해 feature와 레이블을 조립합니다 (워밍업 드롭 전).
    fn assemble(&self, series: &CandleSeries) -> MlResult<Vec<RawRow>> {
        let candles = series.candles();
        let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();

        // 지표 계산 (캔들별 Option 시리즈)
        let mut emas = Vec::with_capacity(self.config.ema_periods.len());
        for period in &self.config.ema_periods {
            emas.push(self.trend.ema(&closes, EmaParams { period: *period })?);
        }
        let rsi = self.momentum.rsi(
            &closes,
            RsiParams {
                period: self.config.rsi_period,
            },
        )?;
        let patterns = self.patterns.detect_all(candles);

        let mut rows = Vec::with_capacity(candles.len());

        for (i, candle) in candles.iter().enumerate() {
            let mut values = Vec::with_capacity(self.config.feature_count());

            // lag 수익률: k 구간 퍼센트 변화
            for k in 1..=self.config.lag_count {
                let lag = if i >= k && !closes[i - k].is_zero() {
                    ((closes[i] - closes[i - k]) / closes[i - k]).to_f64()
                } else {
                    None
                };
                values.push(lag);
            }

            for ema in &emas {
                values.push(ema[i].and_then(|d| d.to_f64()));
            }

            values.push(rsi[i].and_then(|d| d.to_f64()));

            values.push(Some(f64::from(patterns[i].engulfing)));
            values.push(Some(f64::from(patterns[i].pin_bar)));
            values.push(Some(f64::from(patterns[i].inside_bar)));
            values.push(Some(f64::from(patterns[i].marubozu)));

            let price_future = candles.get(i + 1).map(|next| next.close);
            let target = price_future.map(|future| u8::from(future > candle.close));

            rows.push(RawRow {
                timestamp: candle.open_time,
                values,
                close: candle.close,
                price_future,
                target,
                patterns: patterns[i],
            });
        }

        Ok(rows)
    }
}
