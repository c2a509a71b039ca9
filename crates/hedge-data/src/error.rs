//! 데이터 모듈 오류 타입.

use hedge_core::HedgeError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 데이터 삽입 오류
    #[error("Insert error: {0}")]
    InsertError(String),

    /// 캐시 미스
    #[error("Cache miss: {0}")]
    CacheMiss(String),

    /// 날짜 수와 값 수가 다른 캐시 쓰기
    #[error("Cache write contract violation for {ticker}: {dates} dates, {values} values")]
    ContractViolation {
        ticker: String,
        dates: usize,
        values: usize,
    },

    /// 거래소에 종목이 없음
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    /// 외부 소스 조회 오류
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DataError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<DataError> for HedgeError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::InstrumentNotFound(ticker) => HedgeError::InstrumentNotFound(ticker),
            DataError::ContractViolation {
                ticker,
                dates,
                values,
            } => HedgeError::CacheWriteContractViolation {
                ticker,
                dates,
                values,
            },
            DataError::FetchError(_) | DataError::ParseError(_) | DataError::InvalidData(_) => {
                HedgeError::ProviderQueryFailed(err.to_string())
            }
            DataError::ConnectionError(_)
            | DataError::QueryError(_)
            | DataError::InsertError(_)
            | DataError::CacheMiss(_) => HedgeError::PersistenceFailure(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_hedge_error() {
        let err: HedgeError = DataError::InstrumentNotFound("XXXX".to_string()).into();
        assert!(matches!(err, HedgeError::InstrumentNotFound(t) if t == "XXXX"));

        let err: HedgeError = DataError::FetchError("503".to_string()).into();
        assert!(matches!(err, HedgeError::ProviderQueryFailed(_)));

        let err: HedgeError = DataError::InsertError("locked".to_string()).into();
        assert!(matches!(err, HedgeError::PersistenceFailure(_)));

        let err: HedgeError = DataError::ContractViolation {
            ticker: "SBER".to_string(),
            dates: 2,
            values: 3,
        }
        .into();
        assert!(matches!(
            err,
            HedgeError::CacheWriteContractViolation { dates: 2, values: 3, .. }
        ));
    }
}
