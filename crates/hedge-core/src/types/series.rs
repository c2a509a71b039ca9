//! 수익률 시계열.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::history::Dated;

/// 수익률 산출 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Derivation {
    /// (종가 - 시가) / 시가
    Intraday,
    /// (종가[i] - 종가[i-1]) / 종가[i-1]
    Overnight,
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derivation::Intraday => write!(f, "intraday"),
            Derivation::Overnight => write!(f, "overnight"),
        }
    }
}

/// 거래일별 수익률 값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl Dated for ReturnPoint {
    fn trade_date(&self) -> NaiveDate {
        self.date
    }
}

/// 시세 시퀀스에서 파생된 수익률 시계열.
///
/// 길이는 항상 원본 시세 시퀀스 길이와 같습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub derivation: Derivation,
    pub points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(derivation: Derivation, points: Vec<ReturnPoint>) -> Self {
        Self { derivation, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn sum(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}
