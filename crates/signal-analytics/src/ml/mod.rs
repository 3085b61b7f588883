//! 머신러닝 파이프라인.
//!
//! 이 모듈은 캔들 데이터에서 방향 예측까지의 ML 파이프라인을
//! 제공합니다:
//!
//! - **Feature Engineering**: lag 수익률, EMA/RSI, 캔들 패턴
//! - **모델 학습**: 시간순 분할 + 시드 고정 랜덤 포레스트
//! - **아티팩트 영속화**: 모델 + feature 이름 목록의 원자적 저장
//! - **예측**: 최신 feature 행에 대한 방향/신뢰도 산출
//!
//! # 아키텍처
//!
//! ```text
//! CandleSeries
//!       │
//!       ▼
//! ┌─────────────────┐
//! │ FeatureBuilder  │ ← 지표 + 패턴 + 레이블
//! └────────┬────────┘
//!          │ FeatureTable
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ModelTrainer   │ ──▶ │  ModelArtifact   │ (디스크, 원자적 교체)
//! │ (시간순 분할)   │     └────────┬─────────┘
//! └─────────────────┘              │
//!                                  ▼
//!                         ┌─────────────────┐
//!                         │ SignalPredictor │ ← 방향 + 신뢰도
//!                         └─────────────────┘
//! ```

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod features;
pub mod forest;
pub mod metrics;
pub mod predictor;
pub mod trainer;
pub mod tree;

pub use artifact::{ModelArtifact, ARTIFACT_SCHEMA_VERSION};
pub use dataset::{Dataset, Split};
pub use error::{MlError, MlResult};
pub use features::{FeatureBuilder, FeatureConfig, FeatureRow, FeatureTable};
pub use forest::{ForestClassifier, ForestConfig};
pub use metrics::{ClassMetrics, ConfusionMatrix, Evaluation};
pub use predictor::SignalPredictor;
pub use trainer::{ModelTrainer, TrainerConfig};
