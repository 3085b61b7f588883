//! OHLCV 캔들 및 캔들 시리즈.

use crate::error::{CoreError, CoreResult};
use crate::types::Timeframe;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들스틱 데이터.
///
/// 데이터 소스에서 가져온 후에는 불변입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 상단 그림자(고가 - 몸통 상단)를 반환합니다.
    pub fn upper_wick(&self) -> Decimal {
        self.high - self.open.max(self.close)
    }

    /// 하단 그림자(몸통 하단 - 저가)를 반환합니다.
    pub fn lower_wick(&self) -> Decimal {
        self.open.min(self.close) - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// 타임스탬프 오름차순으로 정렬된 캔들 시퀀스.
///
/// 생성 시 타임스탬프가 엄격하게 증가하는지 검증합니다.
/// 갭은 허용하되 채우지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleSeries {
    /// 종목 식별자 (예: "EUR/USD")
    pub symbol: String,
    /// 캔들 간격
    pub timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// 검증된 캔들 시리즈를 생성합니다.
    ///
    /// 타임스탬프가 엄격하게 증가하지 않으면 에러를 반환합니다.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> CoreResult<Self> {
        for pair in candles.windows(2) {
            if pair[1].open_time <= pair[0].open_time {
                return Err(CoreError::InvalidSeries(format!(
                    "타임스탬프가 증가하지 않습니다: {} -> {}",
                    pair[0].open_time, pair[1].open_time
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            candles,
        })
    }

    /// 캔들 슬라이스를 반환합니다.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 시리즈가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 가장 최근 캔들을 반환합니다.
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn candle_at(minute: u32) -> Candle {
        Candle::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap(),
            dec!(100),
            dec!(101),
            dec!(99),
            dec!(100.5),
            dec!(1000),
        )
    }

    #[test]
    fn test_candle_geometry() {
        let c = Candle::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            dec!(100),
            dec!(103),
            dec!(98),
            dec!(102),
            dec!(500),
        );

        assert_eq!(c.body(), dec!(2));
        assert_eq!(c.range(), dec!(5));
        assert_eq!(c.upper_wick(), dec!(1)); // 103 - 102
        assert_eq!(c.lower_wick(), dec!(2)); // 100 - 98
        assert!(c.is_bullish());
        assert!(!c.is_bearish());
    }

    #[test]
    fn test_series_accepts_ascending() {
        let series =
            CandleSeries::new("EUR/USD", Timeframe::M5, vec![candle_at(0), candle_at(5)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().open_time, candle_at(5).open_time);
    }

    #[test]
    fn test_series_rejects_regression() {
        let result =
            CandleSeries::new("EUR/USD", Timeframe::M5, vec![candle_at(5), candle_at(0)]);
        assert!(matches!(result, Err(CoreError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamp() {
        let result =
            CandleSeries::new("EUR/USD", Timeframe::M5, vec![candle_at(5), candle_at(5)]);
        assert!(matches!(result, Err(CoreError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_tolerates_gaps() {
        // 9:00 -> 9:15는 5분봉 기준 갭이지만 허용
        let series =
            CandleSeries::new("EUR/USD", Timeframe::M5, vec![candle_at(0), candle_at(15)]);
        assert!(series.is_ok());
    }
}
