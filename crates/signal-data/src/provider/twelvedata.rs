//! Twelve Data REST API 클라이언트.
//!
//! Twelve Data `time_series` 엔드포인트에서 OHLCV 캔들 데이터를
//! 수집합니다. 응답은 최신순으로 내려오므로 오름차순으로 뒤집어
//! 도메인 시리즈로 변환합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use signal_data::TwelveDataClient;
//! use signal_core::Timeframe;
//!
//! let client = TwelveDataClient::new("YOUR_API_KEY");
//! let series = client.fetch_series("EUR/USD", Timeframe::M5, 5000).await?;
//! ```

use crate::error::{DataError, DataResult};
use crate::provider::CandleProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use signal_core::{Candle, CandleSeries, Timeframe};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// Twelve Data API 클라이언트.
#[derive(Clone)]
pub struct TwelveDataClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// `time_series` 응답 래퍼.
///
/// 성공 시 `values`가 채워지고, 실패 시 `status == "error"`와 함께
/// `message`가 내려옵니다.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    values: Vec<RawCandle>,
    status: Option<String>,
    message: Option<String>,
}

/// 응답의 개별 캔들. 모든 수치 필드가 문자열로 내려옵니다.
#[derive(Debug, Deserialize)]
struct RawCandle {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    /// 외환 종목에는 거래량이 없을 수 있음
    #[serde(default)]
    volume: Option<String>,
}

impl TwelveDataClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 기본 URL을 재정의합니다 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn parse_candle(raw: &RawCandle) -> DataResult<Candle> {
        let open_time = parse_datetime(&raw.datetime)?;

        let open = parse_decimal("open", &raw.open)?;
        let high = parse_decimal("high", &raw.high)?;
        let low = parse_decimal("low", &raw.low)?;
        let close = parse_decimal("close", &raw.close)?;
        let volume = match &raw.volume {
            Some(v) => parse_decimal("volume", v)?,
            None => Decimal::ZERO,
        };

        Ok(Candle::new(open_time, open, high, low, close, volume))
    }
}

#[async_trait]
impl CandleProvider for TwelveDataClient {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        output_size: usize,
    ) -> DataResult<CandleSeries> {
        let url = format!("{}/time_series", self.base_url);

        debug!(%symbol, interval = %timeframe, output_size, "Fetching time series");

        let response: TimeSeriesResponse = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", timeframe.to_twelvedata_interval()),
                ("outputsize", &output_size.to_string()),
                ("timezone", "UTC"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        if response.status.as_deref() == Some("error") {
            return Err(DataError::Api(
                response
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        if response.values.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
            });
        }

        // 최신순 -> 오름차순
        let mut candles = response
            .values
            .iter()
            .map(Self::parse_candle)
            .collect::<DataResult<Vec<_>>>()?;
        candles.reverse();

        let series = CandleSeries::new(symbol, timeframe, candles)
            .map_err(|e| DataError::InvalidSeries(e.to_string()))?;

        debug!(%symbol, candles = series.len(), "Time series fetched");

        Ok(series)
    }
}

fn parse_decimal(field: &str, raw: &str) -> DataResult<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| DataError::Decode(format!("invalid {field} value '{raw}'")))
}

/// "2024-01-01 12:35:00" 또는 일봉 형식 "2024-01-01"을 UTC로 파싱합니다.
fn parse_datetime(raw: &str) -> DataResult<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    Err(DataError::Decode(format!("invalid datetime '{raw}'")))
}
