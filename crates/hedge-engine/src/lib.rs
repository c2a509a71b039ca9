//! 헤지 계산 오케스트레이션.
//!
//! 명령을 받아 종목 조회 → 시세 조회 → 계산 → 보고 단계를 실행합니다.
//! 각 fan-out 단계는 [`TaskGroup`]으로 실행되며, 첫 번째 실패가 형제 작업을 모두 취소합니다.

pub mod beta;
pub mod context;
pub mod executor;
pub mod hedge;
pub mod info;
pub mod output;
pub mod state;
pub mod task_group;

pub use beta::BetaCalculator;
pub use context::{Clock, EngineContext, FixedClock, SystemClock};
pub use executor::{create_executor, execute, Executor};
pub use hedge::HedgeCalculator;
pub use info::{InfoReporter, InstrumentInfo};
pub use output::{MemoryPrinter, ResultPrinter, StdoutPrinter};
pub use state::{Pipeline, PipelineState};
pub use task_group::TaskGroup;
