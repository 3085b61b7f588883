//! 시간순 분할 학습 및 평가 엔진.

use crate::ml::artifact::ModelArtifact;
use crate::ml::dataset::Dataset;
use crate::ml::error::{MlError, MlResult};
use crate::ml::features::FeatureTable;
use crate::ml::forest::{ForestClassifier, ForestConfig};
use crate::ml::metrics::Evaluation;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 학습 엔진 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// 홀드아웃 비율 (기본: 0.2)
    pub test_ratio: f64,
    /// 포레스트 하이퍼파라미터
    pub forest: ForestConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            forest: ForestConfig::default(),
        }
    }
}

/// 학습/평가 엔진.
///
/// feature 테이블을 **엄격한 시간순**으로 분할합니다. 앞쪽
/// `ceil(n × 0.8)`개 행이 학습, 나머지가 홀드아웃입니다. 셔플은
/// 미래 정보를 학습에 누출시키므로 금지됩니다.
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    /// 주어진 설정으로 엔진을 생성합니다.
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// 기본 설정으로 엔진을 생성합니다.
    pub fn with_defaults() -> Self {
        Self::new(TrainerConfig::default())
    }

    /// 설정을 반환합니다.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// 레이블된 행으로 분류기를 학습하고 홀드아웃 구간에서 평가합니다.
    ///
    /// 두 구간 중 하나라도 비면 `InsufficientData`로 실패하며 학습하지
    /// 않습니다. 클래스 불균형은 학습 구간의 균형 가중치로 보정합니다.
    pub fn train_and_evaluate(
        &self,
        table: &FeatureTable,
    ) -> MlResult<(ModelArtifact, Evaluation)> {
        if !(0.0..1.0).contains(&self.config.test_ratio) || self.config.test_ratio == 0.0 {
            return Err(MlError::Computation(format!(
                "invalid test_ratio {}",
                self.config.test_ratio
            )));
        }

        let dataset = Dataset::from_table(table);
        let n = dataset.n_samples();

        let split = dataset.chronological_split(self.config.test_ratio);
        if split.train.n_samples() == 0 || split.test.n_samples() == 0 {
            // 분할 양쪽이 비지 않는 최소 샘플 수
            let required = (1.0 / self.config.test_ratio).ceil() as usize;
            return Err(MlError::InsufficientData {
                required,
                actual: n,
            });
        }

        info!(
            total = n,
            train = split.train.n_samples(),
            test = split.test.n_samples(),
            "시간순 분할 완료"
        );

        let mut train = split.train;
        train.apply_balanced_weights();

        let mut model = ForestClassifier::new(self.config.forest.clone());
        model.fit(&train);

        let y_pred = model.predict(&split.test);
        let evaluation = Evaluation::compute(
            &split.test.labels,
            &y_pred,
            model.feature_importance_ranking(),
        );

        let artifact = ModelArtifact::new(table, model);

        Ok((artifact, evaluation))
    }
}
