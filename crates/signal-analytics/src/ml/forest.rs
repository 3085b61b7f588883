//! 랜덤 포레스트 이진 분류기.
//!
//! 부트스트랩 배깅 + feature 부분집합 샘플링으로 결정 트리 앙상블을
//! 구성합니다. 모든 난수는 설정된 시드에서 유도되므로 같은 데이터에
//! 대한 학습 결과는 완전히 재현 가능합니다. 트리는 순차적으로
//! 학습됩니다 (틱 파이프라인은 단일 스레드 동기 실행).

use crate::ml::dataset::Dataset;
use crate::ml::tree::{DecisionTree, TreeConfig};
use serde::{Deserialize, Serialize};

/// 랜덤 포레스트 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// 트리 수
    pub n_trees: usize,
    /// 각 트리의 최대 깊이
    pub max_depth: usize,
    /// 분할에 필요한 최소 샘플 수
    pub min_samples_split: usize,
    /// 리프 노드의 최소 샘플 수
    pub min_samples_leaf: usize,
    /// 분할마다 고려할 feature 수 (None이면 sqrt(n_features))
    pub max_features: Option<usize>,
    /// 부트스트랩 샘플링 사용 여부
    pub bootstrap: bool,
    /// 재현성을 위한 랜덤 시드
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 10,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// 랜덤 포레스트 모델.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl ForestClassifier {
    /// 새 랜덤 포레스트를 생성합니다.
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// 포레스트를 학습시킵니다.
    pub fn fit(&mut self, dataset: &Dataset) {
        self.feature_names = dataset.feature_names.clone();
        let n_features = dataset.n_features();

        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize);

        let mut trees = Vec::with_capacity(self.config.n_trees);
        for i in 0..self.config.n_trees {
            let tree_config = TreeConfig {
                max_depth: self.config.max_depth,
                min_samples_split: self.config.min_samples_split,
                min_samples_leaf: self.config.min_samples_leaf,
                max_features: Some(max_features),
                seed: self.config.seed.wrapping_add(i as u64),
            };

            let mut tree = DecisionTree::new(tree_config);

            if self.config.bootstrap {
                let bootstrap_data = dataset.bootstrap_sample(self.config.seed + i as u64);
                tree.fit(&bootstrap_data);
            } else {
                tree.fit(dataset);
            }

            trees.push(tree);
        }

        self.trees = trees;

        // feature importance 집계
        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (i, &imp) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[i] += imp;
            }
        }

        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }
    }

    /// 단일 샘플의 클래스 확률 [down, up]을 예측합니다.
    ///
    /// 각 트리의 리프 확률을 평균합니다.
    pub fn predict_proba_one(&self, features: &[f64]) -> [f64; 2] {
        if self.trees.is_empty() {
            return [0.5, 0.5];
        }

        let mut down = 0.0;
        let mut up = 0.0;
        for tree in &self.trees {
            let probs = tree.predict_proba_one(features);
            down += probs[0];
            up += probs[1];
        }

        let n = self.trees.len() as f64;
        [down / n, up / n]
    }

    /// 단일 샘플의 클래스를 예측합니다 (0.0 또는 1.0).
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        let probs = self.predict_proba_one(features);
        if probs[1] > probs[0] {
            1.0
        } else {
            0.0
        }
    }

    /// 데이터셋 전체에 대한 클래스 예측.
    pub fn predict(&self, dataset: &Dataset) -> Vec<f64> {
        dataset
            .features
            .iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// 학습에 사용된 feature 이름 (고정 순서).
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// 학습된 트리 수.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// 예측에 기대하는 feature 수.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// feature importance를 중요도 내림차순으로 반환합니다.
    pub fn feature_importance_ranking(&self) -> Vec<(String, f64)> {
        let mut ranking: Vec<(String, f64)> = self
            .feature_names
            .iter()
            .cloned()
            .zip(self.feature_importances.iter().copied())
            .collect();

        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranking
    }
}
