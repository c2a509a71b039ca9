//! 헤지 계산 파이프라인의 에러 타입.
//!
//! 파이프라인의 모든 단계는 이 에러로 수렴하며, 첫 번째 에러가 전체 계산을 중단시킵니다.

use thiserror::Error;

/// 파이프라인 공통 에러.
#[derive(Debug, Error)]
pub enum HedgeError {
    /// 명령 검증 실패 (네트워크/캐시 접근 전)
    #[error("잘못된 명령: {0}")]
    InvalidCommand(String),

    /// 종목을 찾을 수 없거나 주 보드가 없음
    #[error("종목을 찾을 수 없음: {0}")]
    InstrumentNotFound(String),

    /// 시세 제공자 조회 실패 (전송, 상태 코드, 디코딩)
    #[error("시세 조회 실패: {0}")]
    ProviderQueryFailed(String),

    /// 표준편차가 0인 시계열로 비율을 계산하려 함
    #[error("퇴화된 시계열: {0}")]
    DegenerateSeries(String),

    /// 날짜 수와 값 수가 다른 캐시 쓰기
    #[error("캐시 쓰기 계약 위반: {ticker} (dates={dates}, values={values})")]
    CacheWriteContractViolation {
        ticker: String,
        dates: usize,
        values: usize,
    },

    /// 캐시/리포트 저장소 에러
    #[error("저장 실패: {0}")]
    PersistenceFailure(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 형제 작업의 실패로 취소됨
    #[error("작업 취소됨")]
    Cancelled,

    /// 내부 에러 (작업 패닉 등)
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type HedgeResult<T> = Result<T, HedgeError>;

impl HedgeError {
    /// 사용자 입력에서 비롯된 에러인지 확인합니다.
    ///
    /// 변동이 없는 시계열은 선택한 종목과 기간의 문제이므로 여기에 포함됩니다.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            HedgeError::InvalidCommand(_)
                | HedgeError::InstrumentNotFound(_)
                | HedgeError::DegenerateSeries(_)
        )
    }

    /// 프로세스 종료 코드.
    pub fn exit_code(&self) -> i32 {
        if self.is_user_error() {
            2
        } else {
            1
        }
    }
}

impl From<config::ConfigError> for HedgeError {
    fn from(err: config::ConfigError) -> Self {
        HedgeError::Config(err.to_string())
    }
}
