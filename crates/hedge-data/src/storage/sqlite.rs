//! SQLite 연결 풀.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DataError, Result};

/// 파일 기반 풀을 엽니다. 파일이 없으면 생성합니다.
///
/// 여러 작업이 동시에 쓰므로 WAL 모드와 busy timeout을 사용합니다.
pub async fn open_pool(
    path: impl AsRef<Path>,
    max_connections: u32,
    busy_timeout: Duration,
) -> Result<SqlitePool> {
    let path = path.as_ref();
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .map_err(|e| {
            DataError::ConnectionError(format!("{}: {}", path.display(), e))
        })?;

    info!(path = %path.display(), "SQLite 연결 성공");
    Ok(pool)
}

/// 메모리 DB 풀. 단일 연결을 유지해야 데이터가 사라지지 않습니다.
pub async fn memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DataError::ConnectionError(e.to_string()))?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| DataError::ConnectionError(e.to_string()))
}
