//! 종목 메타데이터.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 거래소에서 조회한 종목 정보 (주 보드 기준).
///
/// 한 번 조회되면 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// 종목 코드 (예: "SBER", "IMOEX")
    pub ticker: String,
    /// 보드 ID (예: "TQBR")
    pub board: String,
    /// 거래 엔진 (예: "stock", "futures")
    pub engine: String,
    /// 시장 (예: "shares", "index", "forts")
    pub market: String,
    /// 보드 이름
    pub title: String,
    /// 과거 데이터 시작일
    pub history_from: Option<NaiveDate>,
    /// 과거 데이터 종료일
    pub history_till: Option<NaiveDate>,
    pub is_primary: bool,
}

impl Instrument {
    /// 요청 시작일과 데이터 가용 시작일 중 늦은 날짜.
    pub fn effective_from(&self, requested: NaiveDate) -> NaiveDate {
        match self.history_from {
            Some(available) if available > requested => available,
            _ => requested,
        }
    }
}

/// 데이터 제공자가 보고하는 과거 데이터 가용 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub till: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, till: NaiveDate) -> Self {
        Self { from, till }
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.till
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.from, self.till)
    }
}
