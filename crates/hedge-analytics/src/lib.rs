//! 시계열 분석.
//!
//! 이 crate는 다음을 제공합니다:
//! - 두 시계열의 공통 거래일 정렬
//! - 장중/전일 대비 수익률과 지수 폴백 정책
//! - 표준편차, 공분산, 상관계수, 베타, 헤지 비율

pub mod align;
pub mod error;
pub mod returns;
pub mod statistics;

pub use align::{align_by_date, truncate_to_common};
pub use error::{AnalyticsError, Result};
pub use returns::{index_returns_with_fallback, intraday, overnight, price_changes};
pub use statistics::{
    beta, correlation, covariance, hedge_ratio, std_dev, variance, HedgeStatistics,
};
