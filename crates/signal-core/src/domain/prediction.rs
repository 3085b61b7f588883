//! 방향 예측 결과 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 예측된 가격 이동 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 가격 상승 예상
    Up,
    /// 가격 하락 예상
    Down,
}

impl Direction {
    /// 표시용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }
}

/// 예측에 사용된 캔들의 패턴 플래그 스냅샷.
///
/// 감사/로깅 용도로 예측 결과에 그대로 실려 나갑니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSnapshot {
    /// 장악형 (-1: 약세, 0: 없음, +1: 강세)
    pub engulfing: i8,
    /// 핀 바 (-1: 유성형, 0: 없음, +1: 망치형)
    pub pin_bar: i8,
    /// 인사이드 바 (0 또는 1)
    pub inside_bar: i8,
    /// 마루보주 (-1: 약세, 0: 없음, +1: 강세)
    pub marubozu: i8,
}

impl PatternSnapshot {
    /// 감지된 패턴이 하나라도 있는지 확인합니다.
    pub fn any(&self) -> bool {
        self.engulfing != 0 || self.pin_bar != 0 || self.inside_bar != 0 || self.marubozu != 0
    }
}

/// 단일 틱의 방향 예측 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 예측된 방향
    pub direction: Direction,
    /// 신뢰도 점수 (0.0 ~ 1.0) - 예측된 클래스에 할당된 확률 질량
    pub confidence: f64,
    /// 원시 클래스 확률 [down, up]
    pub probabilities: [f64; 2],
    /// 예측에 사용된 캔들의 패턴 스냅샷
    pub patterns: PatternSnapshot,
    /// 예측에 사용된 캔들의 시작 시간
    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    /// 신뢰도를 퍼센트로 반환합니다.
    pub fn confidence_pct(&self) -> f64 {
        self.confidence * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_label() {
        assert_eq!(Direction::Up.label(), "UP");
        assert_eq!(Direction::Down.label(), "DOWN");
    }

    #[test]
    fn test_pattern_snapshot_any() {
        let empty = PatternSnapshot::default();
        assert!(!empty.any());

        let with_pattern = PatternSnapshot {
            engulfing: 1,
            ..Default::default()
        };
        assert!(with_pattern.any());
    }

    #[test]
    fn test_confidence_pct() {
        let result = PredictionResult {
            direction: Direction::Up,
            confidence: 0.65,
            probabilities: [0.35, 0.65],
            patterns: PatternSnapshot::default(),
            timestamp: Utc::now(),
        };
        assert!((result.confidence_pct() - 65.0).abs() < 1e-9);
    }
}
