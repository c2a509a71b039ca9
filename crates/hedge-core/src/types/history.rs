//! 일별 시세 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 거래일 기준으로 정렬 가능한 레코드.
pub trait Dated {
    fn trade_date(&self) -> NaiveDate;
}

/// 하루치 OHLC 시세.
///
/// 거래일 오름차순, (종목, 거래일)당 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub trade_date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub board: String,
    pub secid: String,
}

impl HistoryItem {
    /// 계산에 필요한 필드만으로 생성합니다 (테스트/합성 데이터용).
    pub fn new(trade_date: NaiveDate, open: f64, close: f64) -> Self {
        Self {
            trade_date,
            open,
            close,
            high: open.max(close),
            low: open.min(close),
            volume: 0.0,
            board: String::new(),
            secid: String::new(),
        }
    }
}

impl Dated for HistoryItem {
    fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }
}

impl<T: Dated> Dated for &T {
    fn trade_date(&self) -> NaiveDate {
        T::trade_date(*self)
    }
}
