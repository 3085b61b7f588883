//! 학습용 데이터셋 구조.

use crate::ml::features::FeatureTable;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// feature 행렬, 레이블, 샘플 가중치를 담는 학습 데이터셋.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// feature 이름 (고정 순서)
    pub feature_names: Vec<String>,
    /// feature 행렬 (n_samples × n_features)
    pub features: Vec<Vec<f64>>,
    /// 이진 레이블 (0.0 / 1.0)
    pub labels: Vec<f64>,
    /// 각 샘플의 타임스탬프 (unix 초)
    pub timestamps: Vec<i64>,
    /// 샘플 가중치 (기본 1.0, 클래스 불균형 보정에 사용)
    pub weights: Vec<f64>,
}

/// 학습/테스트 분할 결과.
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// 빈 데이터셋을 생성합니다.
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            feature_names,
            features: Vec::new(),
            labels: Vec::new(),
            timestamps: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// feature 테이블의 레이블된 행으로부터 데이터셋을 생성합니다.
    ///
    /// 레이블이 없는 행(마지막 캔들)은 학습에서 제외됩니다.
    /// 원시 OHLCV, price_future, target은 feature 벡터에 포함되지
    /// 않으므로 별도의 컬럼 제외가 필요 없습니다.
    pub fn from_table(table: &FeatureTable) -> Self {
        let mut dataset = Self::new(table.feature_names().to_vec());

        for row in table.rows() {
            if let Some(target) = row.target {
                dataset.add_sample(row.values.clone(), f64::from(target), row.timestamp.timestamp());
            }
        }

        dataset
    }

    /// 샘플 수를 반환합니다.
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// feature 수를 반환합니다.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// 샘플을 추가합니다 (가중치 1.0).
    pub fn add_sample(&mut self, features: Vec<f64>, label: f64, timestamp: i64) {
        debug_assert_eq!(features.len(), self.feature_names.len());
        self.features.push(features);
        self.labels.push(label);
        self.timestamps.push(timestamp);
        self.weights.push(1.0);
    }

    /// 시간순 분할 (셔플 없음).
    ///
    /// 학습 구간은 앞쪽 `ceil(n × (1 - test_ratio))`개 행입니다.
    /// 시계열에서 미래 정보가 학습에 새어 들어가는 것을 막기 위해
    /// 순서를 절대 섞지 않습니다.
    pub fn chronological_split(&self, test_ratio: f64) -> Split {
        let n = self.n_samples();
        // train = ceil(n × (1 - ratio))  <=>  test = floor(n × ratio)
        let test_size = (n as f64 * test_ratio).floor() as usize;
        let train_size = n - test_size;

        Split {
            train: self.slice(0, train_size),
            test: self.slice(train_size, n),
        }
    }

    fn slice(&self, start: usize, end: usize) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: self.features[start..end].to_vec(),
            labels: self.labels[start..end].to_vec(),
            timestamps: self.timestamps[start..end].to_vec(),
            weights: self.weights[start..end].to_vec(),
        }
    }

    /// 인덱스 목록으로 부분 데이터셋을 생성합니다.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            timestamps: indices.iter().map(|&i| self.timestamps[i]).collect(),
            weights: indices.iter().map(|&i| self.weights[i]).collect(),
        }
    }

    /// 부트스트랩 샘플 (복원 추출, 시드 고정).
    pub fn bootstrap_sample(&self, seed: u64) -> Dataset {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();

        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
        self.subset(&indices)
    }

    /// 클래스 균형 가중치를 적용합니다.
    ///
    /// w_c = n / (클래스 수 × count_c). 레이블 분포가 한쪽으로 치우쳐도
    /// 결정 임계값이 편향되지 않도록 합니다. 한 클래스만 존재하면
    /// 가중치를 그대로 둡니다.
    pub fn apply_balanced_weights(&mut self) {
        let n = self.n_samples();
        let positives = self.labels.iter().filter(|&&l| l > 0.5).count();
        let negatives = n - positives;

        if positives == 0 || negatives == 0 {
            return;
        }

        let w_pos = n as f64 / (2.0 * positives as f64);
        let w_neg = n as f64 / (2.0 * negatives as f64);

        for (weight, label) in self.weights.iter_mut().zip(self.labels.iter()) {
            *weight = if *label > 0.5 { w_pos } else { w_neg };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset(n: usize) -> Dataset {
        let mut dataset = Dataset::new(vec!["x".to_string()]);
        for i in 0..n {
            dataset.add_sample(vec![i as f64], (i % 2) as f64, i as i64);
        }
        dataset
    }

    #[test]
    fn test_chronological_split_sizes() {
        let dataset = sample_dataset(10);
        let split = dataset.chronological_split(0.2);

        assert_eq!(split.train.n_samples(), 8);
        assert_eq!(split.test.n_samples(), 2);
    }

    #[test]
    fn test_chronological_split_is_ordered() {
        let dataset = sample_dataset(10);
        let split = dataset.chronological_split(0.2);

        let max_train = split.train.timestamps.iter().max().unwrap();
        let min_test = split.test.timestamps.iter().min().unwrap();
        assert!(max_train < min_test);
    }

    #[test]
    fn test_split_small_n_leaves_empty_test() {
        // n <= 4이면 ceil(0.8n) == n이라 테스트 구간이 빔
        for n in 1..=4 {
            let split = sample_dataset(n).chronological_split(0.2);
            assert_eq!(split.train.n_samples(), n);
            assert_eq!(split.test.n_samples(), 0);
        }

        let split = sample_dataset(5).chronological_split(0.2);
        assert_eq!(split.test.n_samples(), 1);
    }

    #[test]
    fn test_bootstrap_is_deterministic() {
        let dataset = sample_dataset(20);

        let a = dataset.bootstrap_sample(7);
        let b = dataset.bootstrap_sample(7);
        assert_eq!(a.timestamps, b.timestamps);

        let c = dataset.bootstrap_sample(8);
        assert_ne!(a.timestamps, c.timestamps);
    }

    #[test]
    fn test_balanced_weights() {
        let mut dataset = Dataset::new(vec!["x".to_string()]);
        // 3:1 불균형
        dataset.add_sample(vec![0.0], 1.0, 0);
        dataset.add_sample(vec![1.0], 1.0, 1);
        dataset.add_sample(vec![2.0], 1.0, 2);
        dataset.add_sample(vec![3.0], 0.0, 3);

        dataset.apply_balanced_weights();

        // w_pos = 4 / (2*3), w_neg = 4 / (2*1)
        assert!((dataset.weights[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((dataset.weights[3] - 2.0).abs() < 1e-12);

        // 가중 합은 클래스별로 동일
        let pos_sum: f64 = dataset
            .weights
            .iter()
            .zip(&dataset.labels)
            .filter(|(_, &l)| l > 0.5)
            .map(|(w, _)| w)
            .sum();
        let neg_sum: f64 = dataset
            .weights
            .iter()
            .zip(&dataset.labels)
            .filter(|(_, &l)| l < 0.5)
            .map(|(w, _)| w)
            .sum();
        assert!((pos_sum - neg_sum).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_weights_single_class_noop() {
        let mut dataset = Dataset::new(vec!["x".to_string()]);
        dataset.add_sample(vec![0.0], 1.0, 0);
        dataset.add_sample(vec![1.0], 1.0, 1);

        dataset.apply_balanced_weights();
        assert_eq!(dataset.weights, vec![1.0, 1.0]);
    }
}
