//! 틱 경계 에러 타입.
//!
//! 파이프라인의 모든 실패는 이 타입으로 모여 틱 경계에서 로그되고,
//! 데몬은 크래시 없이 다음 틱으로 넘어갑니다.

use signal_analytics::MlError;
use signal_data::DataError;
use thiserror::Error;

/// 단일 틱에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum TickError {
    /// 데이터 수집 실패 (DataUnavailable 포함)
    #[error("데이터 수집 실패: {0}")]
    Data(#[from] DataError),

    /// feature/학습/예측 파이프라인 실패
    #[error("파이프라인 실패: {0}")]
    Pipeline(#[from] MlError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_data_error() {
        let err: TickError = DataError::Empty {
            symbol: "EUR/USD".to_string(),
        }
        .into();
        assert!(err.to_string().contains("EUR/USD"));
    }

    #[test]
    fn test_wraps_ml_error() {
        let err: TickError = MlError::InsufficientData {
            required: 5,
            actual: 1,
        }
        .into();
        assert!(err.to_string().contains("Insufficient data"));
    }
}
