//! 모델 평가 지표.
//!
//! 홀드아웃 구간에 대한 정확도, 클래스별 precision/recall/F1, 혼동
//! 행렬과 feature importance 순위를 제공합니다.

use serde::{Deserialize, Serialize};
use tracing::info;

/// 2×2 혼동 행렬 (음성 = down, 양성 = up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// 실제 down, 예측 down
    pub true_negatives: usize,
    /// 실제 down, 예측 up
    pub false_positives: usize,
    /// 실제 up, 예측 down
    pub false_negatives: usize,
    /// 실제 up, 예측 up
    pub true_positives: usize,
}

impl ConfusionMatrix {
    /// 실제/예측 레이블 쌍에서 혼동 행렬을 집계합니다.
    pub fn from_predictions(y_true: &[f64], y_pred: &[f64]) -> Self {
        let mut matrix = Self::default();

        for (&actual, &predicted) in y_true.iter().zip(y_pred.iter()) {
            match (actual > 0.5, predicted > 0.5) {
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_positives += 1,
                (true, false) => matrix.false_negatives += 1,
                (true, true) => matrix.true_positives += 1,
            }
        }

        matrix
    }

    /// 전체 샘플 수.
    pub fn total(&self) -> usize {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }
}

/// 단일 클래스에 대한 분류 지표.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// 정밀도 (분모가 0이면 0)
    pub precision: f64,
    /// 재현율 (분모가 0이면 0)
    pub recall: f64,
    /// F1 점수
    pub f1: f64,
    /// 해당 클래스의 실제 샘플 수
    pub support: usize,
}

impl ClassMetrics {
    fn compute(predicted_correct: usize, predicted_total: usize, actual_total: usize) -> Self {
        let precision = ratio(predicted_correct, predicted_total);
        let recall = ratio(predicted_correct, actual_total);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
            support: actual_total,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// 홀드아웃 평가 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// 전체 정확도
    pub accuracy: f64,
    /// down 클래스 지표
    pub down: ClassMetrics,
    /// up 클래스 지표
    pub up: ClassMetrics,
    /// 혼동 행렬
    pub confusion: ConfusionMatrix,
    /// feature importance 내림차순 순위 (진단용)
    pub feature_importance: Vec<(String, f64)>,
}

impl Evaluation {
    /// 실제/예측 레이블과 feature importance로 평가를 계산합니다.
    pub fn compute(
        y_true: &[f64],
        y_pred: &[f64],
        feature_importance: Vec<(String, f64)>,
    ) -> Self {
        let confusion = ConfusionMatrix::from_predictions(y_true, y_pred);

        let accuracy = ratio(
            confusion.true_positives + confusion.true_negatives,
            confusion.total(),
        );

        let down = ClassMetrics::compute(
            confusion.true_negatives,
            confusion.true_negatives + confusion.false_negatives,
            confusion.true_negatives + confusion.false_positives,
        );
        let up = ClassMetrics::compute(
            confusion.true_positives,
            confusion.true_positives + confusion.false_positives,
            confusion.true_positives + confusion.false_negatives,
        );

        Self {
            accuracy,
            down,
            up,
            confusion,
            feature_importance,
        }
    }

    /// 평가 요약을 로그로 출력합니다.
    pub fn log_summary(&self) {
        info!(
            accuracy = self.accuracy,
            test_samples = self.confusion.total(),
            "모델 평가 완료"
        );
        info!(
            precision = self.down.precision,
            recall = self.down.recall,
            f1 = self.down.f1,
            support = self.down.support,
            "클래스 DOWN"
        );
        info!(
            precision = self.up.precision,
            recall = self.up.recall,
            f1 = self.up.f1,
            support = self.up.support,
            "클래스 UP"
        );
        info!(
            true_negatives = self.confusion.true_negatives,
            false_positives = self.confusion.false_positives,
            false_negatives = self.confusion.false_negatives,
            true_positives = self.confusion.true_positives,
            "혼동 행렬"
        );

        for (name, importance) in self.feature_importance.iter().take(5) {
            info!(feature = %name, importance = *importance, "상위 feature");
        }
    }
}
