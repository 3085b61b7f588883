//! 데이터 수집 에러 타입.

use thiserror::Error;

/// 데이터 수집에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum DataError {
    /// 네트워크 에러
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 데이터 소스가 보고한 API 에러
    #[error("Data source error: {0}")]
    Api(String),

    /// 업스트림 시리즈가 비어있음 (틱 단위로 치명적)
    #[error("No data available for '{symbol}'")]
    Empty { symbol: String },

    /// 응답 필드 디코딩 실패
    #[error("Decode error: {0}")]
    Decode(String),

    /// 수신한 시리즈가 도메인 불변식을 위반함
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

/// 데이터 작업을 위한 Result 타입.
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// 다음 틱에서 재시도할 가치가 있는 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::Network(_) | DataError::Empty { .. })
    }
}
