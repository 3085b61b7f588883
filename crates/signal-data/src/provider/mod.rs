//! 캔들 데이터 Provider 모듈.
//!
//! 다양한 소스에서 캔들 데이터를 가져오는 Provider들을 정의합니다.
//!
//! ## Twelve Data
//! - `TwelveDataClient`: Twelve Data REST API 클라이언트 (API 키 필요)
//! - 분/시간 단위 OHLCV 시계열

pub mod twelvedata;

pub use twelvedata::TwelveDataClient;

use crate::error::DataResult;
use async_trait::async_trait;
use signal_core::{CandleSeries, Timeframe};

/// 캔들 시계열 Provider 추상화.
///
/// 구현체는 타임스탬프 오름차순으로 정렬된 시리즈를 반환해야 하며,
/// 데이터가 전혀 없으면 `DataError::Empty`를 반환해야 합니다.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// 가장 최근 `output_size`개의 캔들을 오름차순으로 가져옵니다.
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        output_size: usize,
    ) -> DataResult<CandleSeries>;
}
