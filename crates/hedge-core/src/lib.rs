//! # Hedge Core
//!
//! 헤지 계산 파이프라인의 핵심 타입을 제공합니다:
//! - 종목, 시세, 수익률 시계열 타입
//! - 명령과 검증
//! - 에러 분류
//! - 설정 관리
//! - 로깅 인프라
//! - 로케일 기반 숫자 출력

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use format::*;
pub use logging::*;
pub use types::*;
