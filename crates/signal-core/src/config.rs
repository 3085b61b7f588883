//! 환경변수 기반 설정 모듈.

use crate::error::{CoreError, CoreResult};
use crate::types::Timeframe;
use std::path::PathBuf;
use std::time::Duration;

/// 봇 전체 설정.
///
/// `.env` 파일과 환경변수에서 로드되며, API 키를 제외한 모든 항목에
/// 기본값이 있습니다.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// 종목 식별자 (예: "EUR/USD")
    pub ticker: String,
    /// 캔들 간격
    pub interval: Timeframe,
    /// lag 수익률 feature 수
    pub lag_count: usize,
    /// 틱 실행 주기 (분 단위)
    pub schedule_minutes: u64,
    /// 요청할 캔들 수
    pub output_size: usize,
    /// 모델 아티팩트 경로
    pub artifact_path: PathBuf,
    /// Twelve Data API 키
    pub api_key: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            ticker: "EUR/USD".to_string(),
            interval: Timeframe::M5,
            lag_count: 5,
            schedule_minutes: 15,
            output_size: 5000,
            artifact_path: PathBuf::from("artifacts/model.json"),
            api_key: None,
        }
    }
}

impl BotConfig {
    /// 환경변수에서 설정을 로드합니다.
    pub fn from_env() -> CoreResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let ticker = std::env::var("TICKER").unwrap_or(defaults.ticker);

        let interval = match std::env::var("TICKER_INTERVAL") {
            Ok(raw) => raw.parse::<Timeframe>().map_err(CoreError::Config)?,
            Err(_) => defaults.interval,
        };

        let lag_count = parse_env("LAGS", defaults.lag_count)?;
        if lag_count < 1 {
            return Err(CoreError::Config("LAGS는 1 이상이어야 합니다".to_string()));
        }

        let schedule_minutes = parse_env("BOT_SCHEDULE_IN_MINUTE", defaults.schedule_minutes)?;
        if schedule_minutes < 1 {
            return Err(CoreError::Config(
                "BOT_SCHEDULE_IN_MINUTE은 1 이상이어야 합니다".to_string(),
            ));
        }

        let output_size = parse_env("OUTPUT_SIZE", defaults.output_size)?;

        let artifact_path = std::env::var("ARTIFACT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.artifact_path);

        let api_key = std::env::var("TWELVE_DATA_API_KEY").ok();

        Ok(Self {
            ticker,
            interval,
            lag_count,
            schedule_minutes,
            output_size,
            artifact_path,
            api_key,
        })
    }

    /// 틱 실행 주기를 반환합니다.
    pub fn schedule(&self) -> Duration {
        Duration::from_secs(self.schedule_minutes * 60)
    }

    /// API 키를 반환하거나 설정 에러를 냅니다.
    pub fn require_api_key(&self) -> CoreResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            CoreError::Config(
                "TWELVE_DATA_API_KEY 환경변수가 설정되지 않았습니다 \
                 (https://twelvedata.com/apikey 에서 무료 키 발급)"
                    .to_string(),
            )
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> CoreResult<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| CoreError::Config(format!("{name} 값 '{raw}'을(를) 파싱할 수 없습니다"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.ticker, "EUR/USD");
        assert_eq!(config.interval, Timeframe::M5);
        assert_eq!(config.lag_count, 5);
        assert_eq!(config.schedule_minutes, 15);
        assert_eq!(config.schedule(), Duration::from_secs(900));
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = BotConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_require_api_key_present() {
        let config = BotConfig {
            api_key: Some("demo".to_string()),
            ..Default::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "demo");
    }
}
