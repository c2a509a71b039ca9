//! 종목별 일간 수익률 캐시.
//!
//! (종목, 거래일) → 수익률. 같은 키로 다시 쓰면 덮어씁니다.
//! 파이프라인은 이 캐시에 쓰기만 하며, 계산을 대체하는 읽기는 하지 않습니다.
//!
//! # 스키마
//!
//! ```sql
//! CREATE TABLE profits (
//!     ticker TEXT NOT NULL,
//!     date   TEXT NOT NULL,
//!     profit REAL,
//!     PRIMARY KEY (ticker, date)
//! );
//! ```

use chrono::NaiveDate;
use hedge_core::{CacheConfig, DateRange, ReturnSeries};
use sqlx::sqlite::SqlitePool;
use sqlx::{QueryBuilder, Sqlite};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::sqlite;
use crate::error::{DataError, Result};
use crate::provider::wire::parse_date;

/// 한 INSERT 문에 담을 행 수 (행당 바인딩 3개).
const INSERT_CHUNK: usize = 300;

/// 수익률 캐시.
#[derive(Clone)]
pub struct ProfitCache {
    pool: SqlitePool,
}

impl ProfitCache {
    /// 기존 풀로 생성하고 스키마를 준비합니다.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profits (
                ticker TEXT NOT NULL,
                date   TEXT NOT NULL,
                profit REAL,
                PRIMARY KEY (ticker, date)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| DataError::QueryError(e.to_string()))?;

        Ok(Self { pool })
    }

    /// 설정의 파일 경로로 엽니다.
    pub async fn open(config: &CacheConfig) -> Result<Self> {
        let pool = sqlite::open_pool(
            &config.path,
            config.max_connections,
            Duration::from_millis(config.busy_timeout_ms),
        )
        .await?;
        Self::new(pool).await
    }

    pub async fn in_memory() -> Result<Self> {
        Self::new(sqlite::memory_pool().await?).await
    }

    /// 수익률을 저장합니다 (충돌 시 교체).
    ///
    /// `dates`와 `values` 길이가 다르면 아무것도 쓰지 않고 `ContractViolation`.
    /// 전체가 하나의 트랜잭션이므로 부분 쓰기는 없습니다.
    #[instrument(skip(self, dates, values), fields(count = values.len()))]
    pub async fn put(&self, ticker: &str, dates: &[NaiveDate], values: &[f64]) -> Result<usize> {
        if dates.len() != values.len() {
            return Err(DataError::ContractViolation {
                ticker: ticker.to_string(),
                dates: dates.len(),
                values: values.len(),
            });
        }
        if dates.is_empty() {
            return Ok(0);
        }

        let rows: Vec<(String, f64)> = dates
            .iter()
            .zip(values)
            .map(|(d, v)| (d.format("%Y-%m-%d").to_string(), *v))
            .collect();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        let mut written = 0usize;
        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT OR REPLACE INTO profits (ticker, date, profit) ");
            builder.push_values(chunk, |mut row, (date, value)| {
                row.push_bind(ticker.to_string())
                    .push_bind(date.clone())
                    .push_bind(*value);
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| DataError::InsertError(e.to_string()))?;
            written += result.rows_affected() as usize;
        }

        tx.commit()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        info!(ticker = ticker, written = written, "수익률 캐시에 저장");
        Ok(written)
    }

    /// 수익률 시계열 전체를 저장합니다.
    pub async fn put_series(&self, ticker: &str, series: &ReturnSeries) -> Result<usize> {
        self.put(ticker, &series.dates(), &series.values()).await
    }

    /// 캐시된 거래일 범위 (최초, 최종). 없으면 `CacheMiss`.
    #[instrument(skip(self))]
    pub async fn range_for(&self, ticker: &str) -> Result<DateRange> {
        let (min, max): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(date), MAX(date) FROM profits WHERE ticker = ?")
                .bind(ticker)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DataError::QueryError(e.to_string()))?;

        match (min, max) {
            (Some(from), Some(till)) => {
                let range = DateRange::new(parse_date(&from)?, parse_date(&till)?);
                debug!(ticker = ticker, range = %range, "캐시 범위");
                Ok(range)
            }
            _ => Err(DataError::CacheMiss(ticker.to_string())),
        }
    }

    /// 전체 캐시 행 수.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profits")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DataError::QueryError(e.to_string()))?;
        Ok(count)
    }

    /// 한 종목의 캐시 값 (거래일 순).
    pub async fn values_for(&self, ticker: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let rows: Vec<(String, Option<f64>)> =
            sqlx::query_as("SELECT date, profit FROM profits WHERE ticker = ? ORDER BY date")
                .bind(ticker)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DataError::QueryError(e.to_string()))?;

        rows.into_iter()
            .map(|(date, profit)| Ok((parse_date(&date)?, profit.unwrap_or_default())))
            .collect()
    }

    /// 캐시 통계를 로그로 남깁니다.
    pub async fn log_stats(&self) -> Result<()> {
        let count = self.count().await?;
        debug!(entries = count, "수익률 캐시 통계");
        Ok(())
    }
}
