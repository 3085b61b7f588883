//! 가중치 기반 CART 결정 트리.
//!
//! 랜덤 포레스트의 구성 요소로, 샘플 가중치를 반영한 지니 불순도로
//! 분할하는 이진 분류 트리입니다.

use crate::ml::dataset::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// 결정 트리 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// 최대 깊이
    pub max_depth: usize,
    /// 분할에 필요한 최소 샘플 수
    pub min_samples_split: usize,
    /// 리프 노드의 최소 샘플 수
    pub min_samples_leaf: usize,
    /// 분할마다 고려할 최대 feature 수 (None이면 전체)
    pub max_features: Option<usize>,
    /// 재현성을 위한 랜덤 시드
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 10,
            max_features: None,
            seed: 42,
        }
    }
}

/// 트리 노드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// 분할 feature 인덱스 (리프면 None)
    pub feature_idx: Option<usize>,
    /// 분할 임계값 (리프면 None)
    pub threshold: Option<f64>,
    /// 가중 클래스 확률 [down, up]
    pub class_probs: [f64; 2],
    /// 이 노드의 샘플 수
    pub n_samples: usize,
    /// 왼쪽 자식 (feature <= threshold)
    pub left: Option<Box<TreeNode>>,
    /// 오른쪽 자식
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(class_probs: [f64; 2], n_samples: usize) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            class_probs,
            n_samples,
            left: None,
            right: None,
        }
    }

    /// 리프 노드 여부.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// 결정 트리 모델.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    /// 새 결정 트리를 생성합니다.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_importances: Vec::new(),
        }
    }

    /// 트리를 학습시킵니다.
    pub fn fit(&mut self, dataset: &Dataset) {
        let n_features = dataset.n_features();
        self.feature_importances = vec![0.0; n_features];

        let indices: Vec<usize> = (0..dataset.n_samples()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let root = self.build_tree(dataset, &indices, 0, &mut rng);
        self.root = Some(root);

        // feature importance 정규화
        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }
    }

    /// 재귀적으로 트리를 구성합니다.
    fn build_tree(
        &mut self,
        dataset: &Dataset,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let impurity = self.gini(dataset, indices);
        let probs = self.class_probabilities(dataset, indices);

        // 중단 조건
        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || impurity < 1e-10
        {
            return TreeNode::leaf(probs, n);
        }

        match self.find_best_split(dataset, indices, rng) {
            Some((feature_idx, threshold, left_indices, right_indices, importance)) => {
                if left_indices.len() < self.config.min_samples_leaf
                    || right_indices.len() < self.config.min_samples_leaf
                {
                    return TreeNode::leaf(probs, n);
                }

                self.feature_importances[feature_idx] += importance;

                let left = self.build_tree(dataset, &left_indices, depth + 1, rng);
                let right = self.build_tree(dataset, &right_indices, depth + 1, rng);

                TreeNode {
                    feature_idx: Some(feature_idx),
                    threshold: Some(threshold),
                    class_probs: probs,
                    n_samples: n,
                    left: Some(Box::new(left)),
                    right: Some(Box::new(right)),
                }
            }
            None => TreeNode::leaf(probs, n),
        }
    }

    /// 최적 분할 탐색.
    ///
    /// feature 부분집합을 시드 고정 셔플로 고른 뒤, 정렬된 고유값의
    /// 중간점을 임계값 후보로 사용합니다.
    #[allow(clippy::type_complexity)]
    fn find_best_split(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>, f64)> {
        let n_features = dataset.n_features();
        let max_features = self.config.max_features.unwrap_or(n_features);

        let mut feature_indices: Vec<usize> = (0..n_features).collect();
        feature_indices.shuffle(rng);
        feature_indices.truncate(max_features);

        let parent_impurity = self.gini(dataset, indices);
        let parent_weight = self.total_weight(dataset, indices);

        let mut best_gain = 0.0;
        let mut best_split: Option<(usize, f64, Vec<usize>, Vec<usize>, f64)> = None;

        for &feature_idx in &feature_indices {
            let mut values: Vec<f64> = indices
                .iter()
                .map(|&i| dataset.features[i][feature_idx])
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;

                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| dataset.features[i][feature_idx] <= threshold);

                if left_idx.is_empty() || right_idx.is_empty() {
                    continue;
                }

                let left_weight = self.total_weight(dataset, &left_idx);
                let right_weight = self.total_weight(dataset, &right_idx);
                let left_impurity = self.gini(dataset, &left_idx);
                let right_impurity = self.gini(dataset, &right_idx);

                let weighted_impurity = (left_weight * left_impurity
                    + right_weight * right_impurity)
                    / (left_weight + right_weight);
                let gain = parent_impurity - weighted_impurity;

                if gain > best_gain {
                    best_gain = gain;
                    let importance = gain * parent_weight;
                    best_split = Some((feature_idx, threshold, left_idx, right_idx, importance));
                }
            }
        }

        best_split
    }

    /// 단일 샘플의 클래스 확률 [down, up]을 예측합니다.
    pub fn predict_proba_one(&self, features: &[f64]) -> [f64; 2] {
        match &self.root {
            Some(node) => self.traverse(node, features),
            None => [0.5, 0.5],
        }
    }

    fn traverse(&self, node: &TreeNode, features: &[f64]) -> [f64; 2] {
        if node.is_leaf() {
            return node.class_probs;
        }

        // 내부 노드는 항상 분할 정보와 두 자식을 가짐
        let (Some(feature_idx), Some(threshold), Some(left), Some(right)) = (
            node.feature_idx,
            node.threshold,
            node.left.as_deref(),
            node.right.as_deref(),
        ) else {
            return node.class_probs;
        };

        if features[feature_idx] <= threshold {
            self.traverse(left, features)
        } else {
            self.traverse(right, features)
        }
    }

    /// feature importance를 반환합니다.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    // === 가중 불순도 헬퍼 ===

    fn total_weight(&self, dataset: &Dataset, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| dataset.weights[i]).sum()
    }

    /// 가중 지니 불순도: 2p(1-p), p = 양성 가중 비율.
    fn gini(&self, dataset: &Dataset, indices: &[usize]) -> f64 {
        let total = self.total_weight(dataset, indices);
        if total <= 0.0 {
            return 0.0;
        }

        let positive: f64 = indices
            .iter()
            .filter(|&&i| dataset.labels[i] > 0.5)
            .map(|&i| dataset.weights[i])
            .sum();
        let p = positive / total;

        2.0 * p * (1.0 - p)
    }

    /// 가중 클래스 확률 [down, up].
    fn class_probabilities(&self, dataset: &Dataset, indices: &[usize]) -> [f64; 2] {
        let total = self.total_weight(dataset, indices);
        if total <= 0.0 {
            return [0.5, 0.5];
        }

        let positive: f64 = indices
            .iter()
            .filter(|&&i| dataset.labels[i] > 0.5)
            .map(|&i| dataset.weights[i])
            .sum();
        let p = positive / total;

        [1.0 - p, p]
    }
}
