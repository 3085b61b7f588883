//! 예측 결과 운영 리포트.
//!
//! 틱이 끝날 때마다 사람이 읽는 운영 요약을 로그로 내보냅니다:
//! 종목, 간격, 진입/만료 시각, 방향, 신뢰도, 감지된 패턴 목록.

use chrono::Duration;
use signal_core::{Direction, PatternSnapshot, PredictionResult, Timeframe};
use tracing::info;

/// 방향을 화살표가 붙은 표시 문자열로 변환합니다.
fn format_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "상승 ⬆️",
        Direction::Down => "하락 ⬇️",
    }
}

/// 패턴 스냅샷을 사람이 읽는 설명 목록으로 변환합니다.
pub fn pattern_messages(patterns: &PatternSnapshot) -> Vec<&'static str> {
    let mut messages = Vec::new();

    match patterns.engulfing {
        1 => messages.push("강세 장악형 (Bullish Engulfing)"),
        -1 => messages.push("약세 장악형 (Bearish Engulfing)"),
        _ => {}
    }
    match patterns.pin_bar {
        1 => messages.push("망치형 핀 바 (Hammer)"),
        -1 => messages.push("유성형 핀 바 (Shooting Star)"),
        _ => {}
    }
    if patterns.inside_bar == 1 {
        messages.push("인사이드 바 (Inside Bar)");
    }
    match patterns.marubozu {
        1 => messages.push("강세 마루보주 (Bullish Marubozu)"),
        -1 => messages.push("약세 마루보주 (Bearish Marubozu)"),
        _ => {}
    }

    if messages.is_empty() {
        messages.push("뚜렷한 패턴 없음 - 지표 기반 판단");
    }

    messages
}

/// 운영 요약을 로그로 출력합니다.
pub fn log_operation(ticker: &str, interval: Timeframe, prediction: &PredictionResult) {
    let entry_time = prediction.timestamp;
    let expiry_time = entry_time + Duration::minutes(interval.as_minutes() as i64);
    let confidence = format!("{:.2}%", prediction.confidence_pct());

    info!(
        ticker = %ticker,
        interval = %interval,
        entry = %entry_time.format("%H:%M:%S"),
        expiry = %expiry_time.format("%H:%M:%S"),
        direction = format_direction(prediction.direction),
        confidence = %confidence,
        "예측 결과"
    );

    for message in pattern_messages(&prediction.patterns) {
        info!(pattern = message, "감지된 패턴");
    }
}
