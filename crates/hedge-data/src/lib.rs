//! 시세 데이터 조회 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 시세 제공자 추상화와 MOEX ISS 클라이언트 (커서 페이지네이션)
//! - 종목별 일간 수익률 SQLite 캐시
//! - 베타 리포트 SQLite 저장소

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};
pub use provider::{HistoryCursor, HistoryPage, MarketDataProvider, MoexClient};
pub use storage::profits::ProfitCache;
pub use storage::report::{ReportRow, ReportStore};
