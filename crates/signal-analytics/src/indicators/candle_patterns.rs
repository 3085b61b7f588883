//! 캔들 패턴 감지 지표.
//!
//! 캔들 시퀀스에서 캔들별 범주형 시그널을 계산합니다. 모든 감지기는
//! 현재 캔들과 최대 1개의 이전 캔들만 참조하는 순수 함수입니다.
//!
//! ## 지원 패턴
//! - **장악형 (Engulfing)**: -1 / 0 / +1
//! - **핀 바 (Pin Bar)**: -1 (유성형) / 0 / +1 (망치형)
//! - **인사이드 바 (Inside Bar)**: 0 / 1
//! - **마루보주 (Marubozu)**: -1 / 0 / +1

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use signal_core::{Candle, PatternSnapshot};

/// 캔들 패턴 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PatternParams {
    /// 마루보주 몸통/범위 비율 임계값 (기본: 0.95).
    pub marubozu_body_ratio: Decimal,
    /// 핀 바 그림자/몸통 배수 임계값 (기본: 2.0).
    pub wick_body_multiplier: Decimal,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            marubozu_body_ratio: dec!(0.95),
            wick_body_multiplier: dec!(2.0),
        }
    }
}

/// 캔들 패턴 감지기.
#[derive(Debug, Default)]
pub struct PatternDetector {
    params: PatternParams,
}

impl PatternDetector {
    /// 기본 파라미터로 감지기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 파라미터로 감지기를 생성합니다.
    pub fn with_params(params: PatternParams) -> Self {
        Self { params }
    }

    /// 장악형 패턴 감지.
    ///
    /// 강세 장악형(+1): 이전 캔들이 음봉, 현재 캔들이 양봉이며 현재
    /// 몸통이 이전 몸통을 완전히 포함. 약세 장악형(-1)은 반대 조건.
    ///
    /// 두 조건은 구성상 상호 배타적이지만, 강세 조건을 먼저 평가하므로
    /// 혹시라도 둘 다 성립하면 강세가 우선합니다. 이전 캔들이 없는 첫
    /// 캔들은 0입니다.
    pub fn engulfing(&self, candles: &[Candle]) -> Vec<i8> {
        let mut result = vec![0i8; candles.len()];

        for i in 1..candles.len() {
            let prev = &candles[i - 1];
            let curr = &candles[i];

            if prev.is_bearish()
                && curr.is_bullish()
                && curr.close > prev.open
                && curr.open < prev.close
            {
                result[i] = 1;
            } else if prev.is_bullish()
                && curr.is_bearish()
                && curr.close < prev.open
                && curr.open > prev.close
            {
                result[i] = -1;
            }
        }

        result
    }

    /// 핀 바 패턴 감지.
    ///
    /// 망치형(+1): 상단 그림자 > 몸통 × 2 이고 하단 그림자 < 몸통.
    /// 유성형(-1): 하단 그림자 > 몸통 × 2 이고 상단 그림자 < 몸통.
    ///
    /// 엄격한 부등호를 사용하며, 비율 대신 곱셈으로 비교하므로 몸통이
    /// 0인 캔들에서도 나눗셈이 발생하지 않습니다 (몸통 0이면 두 조건
    /// 모두 성립할 수 없어 자연히 0).
    pub fn pin_bar(&self, candles: &[Candle]) -> Vec<i8> {
        let mult = self.params.wick_body_multiplier;

        candles
            .iter()
            .map(|c| {
                let body = c.body();
                let upper = c.upper_wick();
                let lower = c.lower_wick();

                if upper > body * mult && lower < body {
                    1
                } else if lower > body * mult && upper < body {
                    -1
                } else {
                    0
                }
            })
            .collect()
    }

    /// 인사이드 바 패턴 감지.
    ///
    /// 현재 고가 < 이전 고가 이고 현재 저가 > 이전 저가이면 1.
    pub fn inside_bar(&self, candles: &[Candle]) -> Vec<i8> {
        let mut result = vec![0i8; candles.len()];

        for i in 1..candles.len() {
            let prev = &candles[i - 1];
            let curr = &candles[i];

            if curr.high < prev.high && curr.low > prev.low {
                result[i] = 1;
            }
        }

        result
    }

    /// 마루보주 패턴 감지.
    ///
    /// 몸통/범위 비율이 임계값을 넘으면 종가-시가 방향으로 ±1.
    /// 범위가 0이면 비율이 정의되지 않으므로 "마루보주 아님"(0)으로
    /// 처리하며, 나눗셈 전에 반드시 범위를 확인합니다.
    pub fn marubozu(&self, candles: &[Candle]) -> Vec<i8> {
        let threshold = self.params.marubozu_body_ratio;

        candles
            .iter()
            .map(|c| {
                let range = c.range();
                if range == Decimal::ZERO {
                    return 0;
                }

                if c.body() / range > threshold {
                    if c.is_bullish() {
                        1
                    } else if c.is_bearish() {
                        -1
                    } else {
                        0
                    }
                } else {
                    0
                }
            })
            .collect()
    }

    /// 네 가지 패턴을 모두 계산하여 캔들별 스냅샷으로 반환합니다.
    pub fn detect_all(&self, candles: &[Candle]) -> Vec<PatternSnapshot> {
        let engulfing = self.engulfing(candles);
        let pin_bar = self.pin_bar(candles);
        let inside_bar = self.inside_bar(candles);
        let marubozu = self.marubozu(candles);

        (0..candles.len())
            .map(|i| PatternSnapshot {
                engulfing: engulfing[i],
                pin_bar: pin_bar[i],
                inside_bar: inside_bar[i],
                marubozu: marubozu[i],
            })
            .collect()
    }
}
