//! ML 파이프라인 에러 타입.

use crate::indicators::IndicatorError;
use thiserror::Error;

/// ML 파이프라인에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum MlError {
    /// 학습/예측에 필요한 데이터 부족
    #[error("Insufficient data: need {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// 아티팩트의 feature 스키마가 현재 테이블과 불일치
    ///
    /// 버전 드리프트 신호이므로 조용히 재정렬하거나 0으로 채우지 않고
    /// 즉시 실패합니다.
    #[error("Feature schema mismatch: model trained on [{expected}], table provides [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    /// 그 외 수치 계산 에러
    #[error("Computation error: {0}")]
    Computation(String),

    /// 아티팩트 입출력/직렬화 에러
    #[error("Artifact error: {0}")]
    Artifact(String),
}

/// ML 작업을 위한 Result 타입.
pub type MlResult<T> = Result<T, MlError>;

impl MlError {
    /// 다음 틱에서 새 데이터로 해소될 수 있는 에러인지 확인합니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MlError::InsufficientData { .. })
    }
}

impl From<IndicatorError> for MlError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { required, provided } => {
                MlError::InsufficientData {
                    required,
                    actual: provided,
                }
            }
            other => MlError::Computation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MlError::InsufficientData {
            required: 100,
            actual: 50,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: need 100 samples, got 50"
        );
    }

    #[test]
    fn test_schema_mismatch_display() {
        let err = MlError::SchemaMismatch {
            expected: "lag_1, rsi_14".to_string(),
            actual: "lag_1".to_string(),
        };
        assert!(err.to_string().contains("lag_1, rsi_14"));
    }

    #[test]
    fn test_recoverable() {
        let err = MlError::InsufficientData {
            required: 100,
            actual: 50,
        };
        assert!(err.is_recoverable());

        let err = MlError::SchemaMismatch {
            expected: "a".to_string(),
            actual: "b".to_string(),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_from_indicator_error() {
        let err: MlError = IndicatorError::InsufficientData {
            required: 14,
            provided: 3,
        }
        .into();
        assert!(matches!(
            err,
            MlError::InsufficientData {
                required: 14,
                actual: 3
            }
        ));
    }
}
