//! 베타 리포트 저장소.
//!
//! 리포트 파일은 명령마다 지정되는 별도 SQLite 파일이며, (종목, 지수)당 최신 베타 한 행을 유지합니다.

use chrono::NaiveDate;
use hedge_core::BetaResult;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use super::sqlite;
use crate::error::{DataError, Result};

/// 리포트 레코드.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReportRow {
    pub ticker: String,
    pub index_name: String,
    pub beta: f64,
    pub date: String,
}

/// 리포트 저장소.
pub struct ReportStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl ReportStore {
    /// 리포트 파일을 열고 스키마를 준비합니다.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let pool = sqlite::open_pool(&path, 1, Duration::from_secs(5)).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS report (
                ticker     TEXT NOT NULL,
                index_name TEXT NOT NULL,
                beta       REAL NOT NULL,
                date       TEXT NOT NULL,
                PRIMARY KEY (ticker, index_name)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| DataError::QueryError(e.to_string()))?;

        Ok(Self { pool, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 한 행을 추가하거나 교체합니다.
    pub async fn add(&self, ticker: &str, index: &str, beta: f64, date: NaiveDate) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO report (ticker, index_name, beta, date) VALUES (?, ?, ?, ?)",
        )
        .bind(ticker)
        .bind(index)
        .bind(beta)
        .bind(date.format("%Y-%m-%d").to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DataError::InsertError(e.to_string()))?;
        Ok(())
    }

    /// 결과 전체를 한 트랜잭션으로 기록합니다.
    pub async fn add_all(&self, results: &[BetaResult], date: NaiveDate) -> Result<usize> {
        let date = date.format("%Y-%m-%d").to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        for result in results {
            sqlx::query(
                "INSERT OR REPLACE INTO report (ticker, index_name, beta, date) VALUES (?, ?, ?, ?)",
            )
            .bind(&result.ticker)
            .bind(&result.index)
            .bind(result.beta)
            .bind(&date)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        info!(
            path = %self.path.display(),
            rows = results.len(),
            "리포트 저장"
        );
        Ok(results.len())
    }

    /// 저장된 모든 행 (종목, 지수 순).
    pub async fn fetch_all(&self) -> Result<Vec<ReportRow>> {
        sqlx::query_as::<_, ReportRow>(
            "SELECT ticker, index_name, beta, date FROM report ORDER BY ticker, index_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DataError::QueryError(e.to_string()))
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
