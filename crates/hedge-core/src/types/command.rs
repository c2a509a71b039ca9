//! 사용자 명령과 검증.
//!
//! 검증은 네트워크나 캐시에 접근하기 전에 수행됩니다.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{HedgeError, HedgeResult};

/// 명령 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// 지수 대비 베타
    Beta,
    /// 선물 헤지 비율
    Hedge,
    /// 종목 정보와 캐시 범위
    Info,
}

impl FromStr for CommandKind {
    type Err = HedgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beta" => Ok(Self::Beta),
            "hedge" => Ok(Self::Hedge),
            "info" => Ok(Self::Info),
            other => Err(HedgeError::InvalidCommand(format!(
                "unknown command '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Beta => write!(f, "beta"),
            CommandKind::Hedge => write!(f, "hedge"),
            CommandKind::Info => write!(f, "info"),
        }
    }
}

/// 계산 명령.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    /// 대상 종목 (쉼표 구분)
    pub assets: String,
    /// 기준 종목: beta는 지수, hedge는 헤지 선물
    pub reference: String,
    /// 조회 기간 (개월)
    pub depth_months: u32,
    /// 리포트 SQLite 경로
    pub report: Option<PathBuf>,
}

impl Command {
    pub fn beta(assets: impl Into<String>, index: impl Into<String>, depth_months: u32) -> Self {
        Self {
            kind: CommandKind::Beta,
            assets: assets.into(),
            reference: index.into(),
            depth_months,
            report: None,
        }
    }

    /// `asset`이 비어 있으면 헤지 선물의 기초자산을 사용합니다.
    pub fn hedge(hedge: impl Into<String>, asset: impl Into<String>, depth_months: u32) -> Self {
        Self {
            kind: CommandKind::Hedge,
            assets: asset.into(),
            reference: hedge.into(),
            depth_months,
            report: None,
        }
    }

    pub fn info(ticker: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Info,
            assets: ticker.into(),
            reference: String::new(),
            depth_months: 0,
            report: None,
        }
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report = Some(path.into());
        self
    }

    /// 대상 종목 목록. 공백 제거, 빈 항목 제외, 중복은 첫 항목만 유지.
    pub fn target_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = Vec::new();
        for ticker in self.assets.split(',').map(str::trim) {
            if !ticker.is_empty() && !tickers.iter().any(|t| t == ticker) {
                tickers.push(ticker.to_string());
            }
        }
        tickers
    }

    pub fn reference_ticker(&self) -> &str {
        self.reference.trim()
    }

    pub fn validate(&self) -> HedgeResult<()> {
        match self.kind {
            CommandKind::Beta => {
                if self.reference_ticker().is_empty() {
                    return Err(HedgeError::InvalidCommand(
                        "index ticker is empty".to_string(),
                    ));
                }
                if self.target_tickers().is_empty() {
                    return Err(HedgeError::InvalidCommand(
                        "no assets to compare".to_string(),
                    ));
                }
                self.validate_depth()
            }
            CommandKind::Hedge => {
                if self.reference_ticker().is_empty() {
                    return Err(HedgeError::InvalidCommand(
                        "hedge ticker is empty".to_string(),
                    ));
                }
                if self.target_tickers().len() > 1 {
                    return Err(HedgeError::InvalidCommand(
                        "hedge accepts a single asset".to_string(),
                    ));
                }
                self.validate_depth()
            }
            CommandKind::Info => {
                if self.target_tickers().is_empty() {
                    return Err(HedgeError::InvalidCommand("ticker is empty".to_string()));
                }
                Ok(())
            }
        }
    }

    fn validate_depth(&self) -> HedgeResult<()> {
        if self.depth_months == 0 {
            return Err(HedgeError::InvalidCommand(
                "history depth must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 조회 시작일: `today`에서 `depth_months`개월 전.
    pub fn window_start(&self, today: NaiveDate) -> HedgeResult<NaiveDate> {
        today
            .checked_sub_months(Months::new(self.depth_months))
            .ok_or_else(|| {
                HedgeError::InvalidCommand(format!(
                    "history depth {} months is out of range",
                    self.depth_months
                ))
            })
    }
}
