//! 분석 모듈 오류 타입.

use hedge_core::HedgeError;
use thiserror::Error;

/// 통계 계산 오류.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 표준편차가 0이라 비율이 정의되지 않음
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// 쌍으로 계산할 시계열의 길이가 다름
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// 관측치 부족
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl From<AnalyticsError> for HedgeError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::DegenerateSeries(_) | AnalyticsError::InsufficientData(_) => {
                HedgeError::DegenerateSeries(err.to_string())
            }
            AnalyticsError::LengthMismatch { .. } => HedgeError::Internal(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
