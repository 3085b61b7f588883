//! 모델 아티팩트 영속화.
//!
//! 학습된 포레스트와 학습에 사용된 feature 이름 목록을 하나의 JSON
//! 파일로 묶어 저장합니다. 쓰기는 임시 파일에 기록한 뒤 rename으로
//! 교체하므로 동시에 읽는 쪽이 부분적으로 쓰인 아티팩트를 볼 수
//! 없습니다. 틱 사이에 살아남는 상태는 이 파일이 유일합니다.

use crate::ml::error::{MlError, MlResult};
use crate::ml::features::FeatureTable;
use crate::ml::forest::ForestClassifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signal_core::Timeframe;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// 아티팩트 파일 스키마 버전.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// 학습된 모델과 feature 스키마를 담는 아티팩트.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// 아티팩트 파일 스키마 버전
    pub schema_version: u32,
    /// 학습 종목
    pub symbol: String,
    /// 학습 캔들 간격
    pub timeframe: Timeframe,
    /// 학습 시각
    pub trained_at: DateTime<Utc>,
    /// 학습에 사용된 feature 이름 (고정 순서)
    ///
    /// 예측 시 이 목록과 정확히 같은 이름/순서의 행만 허용됩니다.
    pub feature_names: Vec<String>,
    /// 학습된 랜덤 포레스트
    pub model: ForestClassifier,
}

impl ModelArtifact {
    /// 학습 결과로부터 아티팩트를 생성합니다.
    pub fn new(table: &FeatureTable, model: ForestClassifier) -> Self {
        Self {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            symbol: table.symbol.clone(),
            timeframe: table.timeframe,
            trained_at: Utc::now(),
            feature_names: table.feature_names().to_vec(),
            model,
        }
    }

    /// 아티팩트를 원자적으로 저장합니다.
    ///
    /// `<path>.tmp`에 전체를 기록한 뒤 rename으로 기존 파일을
    /// 교체합니다. 기존 아티팩트는 항상 통째로 대체되며 제자리에서
    /// 수정되지 않습니다.
    pub fn save(&self, path: &Path) -> MlResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    MlError::Artifact(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }

        let tmp_path = path.with_extension("tmp");

        let file = File::create(&tmp_path)
            .map_err(|e| MlError::Artifact(format!("cannot create {}: {e}", tmp_path.display())))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| MlError::Artifact(format!("serialize failed: {e}")))?;

        fs::rename(&tmp_path, path).map_err(|e| {
            MlError::Artifact(format!(
                "rename {} -> {} failed: {e}",
                tmp_path.display(),
                path.display()
            ))
        })?;

        info!(path = %path.display(), features = self.feature_names.len(), "모델 아티팩트 저장");

        Ok(())
    }

    /// 아티팩트를 로드합니다.
    pub fn load(path: &Path) -> MlResult<Self> {
        let file = File::open(path)
            .map_err(|e| MlError::Artifact(format!("cannot open {}: {e}", path.display())))?;

        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| MlError::Artifact(format!("deserialize failed: {e}")))?;

        if artifact.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(MlError::Artifact(format!(
                "unsupported artifact schema version {} (expected {})",
                artifact.schema_version, ARTIFACT_SCHEMA_VERSION
            )));
        }

        debug!(
            path = %path.display(),
            symbol = %artifact.symbol,
            trained_at = %artifact.trained_at,
            "모델 아티팩트 로드"
        );

        Ok(artifact)
    }
}
