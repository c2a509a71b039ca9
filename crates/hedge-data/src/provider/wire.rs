//! MOEX ISS 응답 구조.
//!
//! `iss.json=extended` 응답은 `[ {charsetinfo}, {블록...} ]` 형태의 2원소 배열입니다.
//! 두 번째 원소가 없으면 빈 블록으로 취급합니다.

use chrono::NaiveDate;
use hedge_core::{DateRange, HistoryItem, Instrument};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{DataError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// extended 응답에서 데이터 블록을 꺼냅니다.
pub fn payload<T: DeserializeOwned + Default>(body: &str) -> Result<T> {
    let mut parts: Vec<serde_json::Value> = serde_json::from_str(body)?;
    if parts.len() < 2 {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(parts.swap_remove(1))?)
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DataError::ParseError(format!("invalid date '{}': {}", value, e)))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value {
        Some(v) if !v.is_empty() => parse_date(v).map(Some),
        _ => Ok(None),
    }
}

/// `iss.only=boards`
#[derive(Debug, Default, Deserialize)]
pub struct BoardsBlock {
    #[serde(default)]
    pub boards: Vec<BoardRow>,
}

#[derive(Debug, Deserialize)]
pub struct BoardRow {
    pub secid: String,
    pub boardid: String,
    #[serde(default)]
    pub title: String,
    pub market: String,
    pub engine: String,
    #[serde(default)]
    pub history_from: Option<String>,
    #[serde(default)]
    pub history_till: Option<String>,
    #[serde(default)]
    pub is_primary: i64,
}

impl BoardRow {
    pub fn into_instrument(self) -> Result<Instrument> {
        Ok(Instrument {
            history_from: parse_optional_date(self.history_from.as_deref())?,
            history_till: parse_optional_date(self.history_till.as_deref())?,
            is_primary: self.is_primary == 1,
            ticker: self.secid,
            board: self.boardid,
            engine: self.engine,
            market: self.market,
            title: self.title,
        })
    }
}

/// `iss.only=history,history.cursor`
#[derive(Debug, Default, Deserialize)]
pub struct HistoryBlock {
    #[serde(default)]
    pub history: Vec<HistoryRow>,
    #[serde(rename = "history.cursor", default)]
    pub cursor: Vec<CursorRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct HistoryRow {
    #[serde(default)]
    pub boardid: String,
    pub tradedate: String,
    #[serde(default)]
    pub secid: String,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
}

impl HistoryRow {
    /// 값이 없는 가격 필드는 0으로 채웁니다.
    pub fn into_item(self) -> Result<HistoryItem> {
        Ok(HistoryItem {
            trade_date: parse_date(&self.tradedate)?,
            open: self.open.unwrap_or_default(),
            close: self.close.unwrap_or_default(),
            high: self.high.unwrap_or_default(),
            low: self.low.unwrap_or_default(),
            volume: self.volume.unwrap_or_default(),
            board: self.boardid,
            secid: self.secid,
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct CursorRow {
    pub index: u64,
    pub total: u64,
    pub pagesize: u64,
}

/// `.../dates.json`
#[derive(Debug, Default, Deserialize)]
pub struct DatesBlock {
    #[serde(default)]
    pub dates: Vec<DatesRow>,
}

#[derive(Debug, Deserialize)]
pub struct DatesRow {
    pub from: String,
    pub till: String,
}

impl DatesRow {
    pub fn into_range(self) -> Result<DateRange> {
        Ok(DateRange::new(parse_date(&self.from)?, parse_date(&self.till)?))
    }
}

/// `engines/futures/markets/forts/securities/{f}.json?iss.only=securities`
#[derive(Debug, Default, Deserialize)]
pub struct SecuritiesBlock {
    #[serde(default)]
    pub securities: Vec<SecurityRow>,
}

#[derive(Debug, Deserialize)]
pub struct SecurityRow {
    #[serde(rename = "SECID", default)]
    pub secid: String,
    #[serde(rename = "ASSETCODE", default)]
    pub assetcode: Option<String>,
}
