//! 시그널 봇 핵심 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 캔들 시리즈 (정렬 위반, 중복 타임스탬프 등)
    #[error("잘못된 캔들 시리즈: {0}")]
    InvalidSeries(String),
}

/// 핵심 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
