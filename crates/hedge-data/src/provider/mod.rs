//! 시세 제공자.
//!
//! [`MarketDataProvider`]는 종목 메타데이터와 과거 시세를 조회합니다.
//! 과거 시세는 커서 기반 페이지로 제공되며, 기본 구현 [`MarketDataProvider::history`]가
//! 페이지를 순서대로 이어 붙입니다.

pub mod moex;
pub mod wire;

pub use moex::MoexClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::{DateRange, HedgeError, HedgeResult, HistoryItem, Instrument};
use tracing::{debug, warn};

/// 응답의 `history.cursor` 블록.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCursor {
    /// 이 페이지의 시작 오프셋
    pub index: u64,
    /// 전체 레코드 수
    pub total: u64,
    pub page_size: u64,
}

/// 과거 시세 한 페이지.
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    pub items: Vec<HistoryItem>,
    /// 없으면 이 페이지가 전부
    pub cursor: Option<HistoryCursor>,
}

/// 시세 제공자 trait.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 종목의 주 보드 정보를 조회합니다.
    ///
    /// 결과가 비어 있거나 첫 보드가 주 보드가 아니면 `InstrumentNotFound`.
    async fn describe(&self, ticker: &str) -> HedgeResult<Instrument>;

    /// `start` 오프셋부터 한 페이지를 조회합니다.
    async fn history_page(
        &self,
        instrument: &Instrument,
        from: NaiveDate,
        till: NaiveDate,
        start: u64,
    ) -> HedgeResult<HistoryPage>;

    /// 제공자가 보고하는 과거 데이터 가용 범위.
    async fn history_range(&self, instrument: &Instrument) -> HedgeResult<DateRange>;

    /// 선물의 기초자산 종목 코드.
    async fn future_underlying(&self, future: &str) -> HedgeResult<String>;

    /// `[max(from, history_from), till]` 구간의 전체 과거 시세.
    ///
    /// `start = 0, PAGESIZE, 2*PAGESIZE, ...`로 요청하며 누적 건수가 `TOTAL`에
    /// 도달하면 멈춥니다. `TOTAL` 이전에 빈 페이지가 오면 에러입니다.
    async fn history(
        &self,
        instrument: &Instrument,
        from: NaiveDate,
        till: NaiveDate,
    ) -> HedgeResult<Vec<HistoryItem>> {
        let from = instrument.effective_from(from);
        if from > till {
            debug!(
                ticker = %instrument.ticker,
                from = %from,
                till = %till,
                "조회 구간이 비어 있음"
            );
            return Ok(Vec::new());
        }

        let mut items: Vec<HistoryItem> = Vec::new();
        let mut start = 0u64;
        let mut pages = 0usize;

        loop {
            let page = self.history_page(instrument, from, till, start).await?;
            pages += 1;
            let received = page.items.len() as u64;
            items.extend(page.items);

            let Some(cursor) = page.cursor else {
                break;
            };
            if items.len() as u64 >= cursor.total {
                break;
            }
            if received == 0 {
                return Err(HedgeError::ProviderQueryFailed(format!(
                    "{}: empty history page at start={} ({} of {} rows received)",
                    instrument.ticker,
                    start,
                    items.len(),
                    cursor.total
                )));
            }

            let step = if cursor.page_size > 0 {
                cursor.page_size
            } else {
                received
            };
            start = cursor.index + step;
        }

        let before = items.len();
        items.sort_by_key(|item| item.trade_date);
        items.dedup_by_key(|item| item.trade_date);
        if items.len() != before {
            warn!(
                ticker = %instrument.ticker,
                duplicates = before - items.len(),
                "중복 거래일 제거"
            );
        }

        debug!(
            ticker = %instrument.ticker,
            pages = pages,
            count = items.len(),
            "과거 시세 조회 완료"
        );

        Ok(items)
    }
}
