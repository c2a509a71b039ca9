//! MOEX ISS API 클라이언트.
//!
//! 모스크바 거래소 ISS의 extended JSON 형식(`iss.json=extended&iss.meta=off`)을 사용합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use hedge_data::{MarketDataProvider, MoexClient};
//!
//! let client = MoexClient::new(&config.provider)?;
//! let sber = client.describe("SBER").await?;
//! let history = client.history(&sber, from, till).await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::{DateRange, HedgeResult, Instrument, ProviderConfig};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use super::wire::{self, BoardsBlock, DatesBlock, HistoryBlock, SecuritiesBlock};
use super::{HistoryCursor, HistoryPage, MarketDataProvider};
use crate::error::{DataError, Result};

/// MOEX ISS 클라이언트.
#[derive(Clone)]
pub struct MoexClient {
    client: reqwest::Client,
    base_url: String,
}

impl MoexClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DataError::FetchError(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 기본 설정에 URL만 바꿔 생성합니다.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let config = ProviderConfig {
            base_url: base_url.into(),
            ..ProviderConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// extended JSON 요청 후 데이터 블록을 반환합니다.
    async fn query<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, params = ?params, "Query MOEX");

        let response = self
            .client
            .get(&url)
            .query(&[("iss.json", "extended"), ("iss.meta", "off")])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::FetchError(format!("{} returned {}", path, status)));
        }

        let body = response.text().await?;
        wire::payload(&body)
    }

    fn history_path(instrument: &Instrument) -> String {
        format!(
            "/iss/history/engines/{}/markets/{}/boards/{}/securities/{}",
            instrument.engine, instrument.market, instrument.board, instrument.ticker
        )
    }

    async fn fetch_description(&self, ticker: &str) -> Result<Instrument> {
        let block: BoardsBlock = self
            .query(
                &format!("/iss/securities/{}.json", ticker),
                &[("iss.only", "boards".to_string())],
            )
            .await?;

        let board = block
            .boards
            .into_iter()
            .next()
            .ok_or_else(|| DataError::InstrumentNotFound(ticker.to_string()))?;

        let instrument = board.into_instrument()?;
        if !instrument.is_primary {
            return Err(DataError::InstrumentNotFound(format!(
                "{}: first board {} is not primary",
                ticker, instrument.board
            )));
        }

        debug!(
            ticker = ticker,
            engine = %instrument.engine,
            market = %instrument.market,
            board = %instrument.board,
            "종목 조회 완료"
        );
        Ok(instrument)
    }

    async fn fetch_page(
        &self,
        instrument: &Instrument,
        from: NaiveDate,
        till: NaiveDate,
        start: u64,
    ) -> Result<HistoryPage> {
        let block: HistoryBlock = self
            .query(
                &format!("{}.json", Self::history_path(instrument)),
                &[
                    ("iss.only", "history,history.cursor".to_string()),
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("till", till.format("%Y-%m-%d").to_string()),
                    ("marketprice_board", "1".to_string()),
                    ("start", start.to_string()),
                ],
            )
            .await?;

        let items = block
            .history
            .into_iter()
            .map(|row| row.into_item())
            .collect::<Result<Vec<_>>>()?;

        let cursor = block.cursor.first().map(|c| HistoryCursor {
            index: c.index,
            total: c.total,
            page_size: c.pagesize,
        });

        debug!(
            ticker = %instrument.ticker,
            start = start,
            rows = items.len(),
            total = cursor.map(|c| c.total),
            "과거 시세 페이지 수신"
        );
        Ok(HistoryPage { items, cursor })
    }

    async fn fetch_range(&self, instrument: &Instrument) -> Result<DateRange> {
        let block: DatesBlock = self
            .query(
                &format!("{}/dates.json", Self::history_path(instrument)),
                &[("marketprice_board", "1".to_string())],
            )
            .await?;

        let range = block
            .dates
            .into_iter()
            .next()
            .ok_or_else(|| {
                DataError::InvalidData(format!("{}: no history dates", instrument.ticker))
            })?
            .into_range()?;

        debug!(ticker = %instrument.ticker, range = %range, "과거 데이터 가용 범위");
        Ok(range)
    }

    async fn fetch_underlying(&self, future: &str) -> Result<String> {
        let block: SecuritiesBlock = self
            .query(
                &format!("/iss/engines/futures/markets/forts/securities/{}.json", future),
                &[("iss.only", "securities".to_string())],
            )
            .await?;

        let asset = block
            .securities
            .into_iter()
            .next()
            .and_then(|s| s.assetcode)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| DataError::InstrumentNotFound(format!("{}: no underlying asset", future)))?;

        Ok(normalize_asset_code(&asset))
    }
}

/// 거래소가 `GLDRUB_TOM` 대신 `GLDRUBTOM`을 반환하는 경우를 보정합니다.
pub fn normalize_asset_code(code: &str) -> String {
    match code.strip_suffix("TOM") {
        Some(prefix) if !prefix.ends_with('_') => format!("{}_TOM", prefix),
        _ => code.to_string(),
    }
}

#[async_trait]
impl MarketDataProvider for MoexClient {
    #[instrument(skip(self))]
    async fn describe(&self, ticker: &str) -> HedgeResult<Instrument> {
        Ok(self.fetch_description(ticker).await?)
    }

    async fn history_page(
        &self,
        instrument: &Instrument,
        from: NaiveDate,
        till: NaiveDate,
        start: u64,
    ) -> HedgeResult<HistoryPage> {
        Ok(self.fetch_page(instrument, from, till, start).await?)
    }

    #[instrument(skip(self, instrument), fields(ticker = %instrument.ticker))]
    async fn history_range(&self, instrument: &Instrument) -> HedgeResult<DateRange> {
        Ok(self.fetch_range(instrument).await?)
    }

    #[instrument(skip(self))]
    async fn future_underlying(&self, future: &str) -> HedgeResult<String> {
        Ok(self.fetch_underlying(future).await?)
    }
}
