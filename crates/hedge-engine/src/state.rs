//! 파이프라인 상태 머신.
//!
//! ```text
//! ValidatingInput → FetchingDescriptors → FetchingHistories → Computing → ReportingResults → Done
//!        └───────────────┴────────────────────┴──────────────┴──────────────┴→ Aborted
//! ```

use hedge_core::{CommandKind, HedgeError, HedgeResult};
use std::fmt;
use std::time::Instant;
use tracing::{error, info};

/// 파이프라인 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    ValidatingInput,
    FetchingDescriptors,
    FetchingHistories,
    Computing,
    ReportingResults,
    Done,
    Aborted,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Aborted)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::ValidatingInput => "validating_input",
            PipelineState::FetchingDescriptors => "fetching_descriptors",
            PipelineState::FetchingHistories => "fetching_histories",
            PipelineState::Computing => "computing",
            PipelineState::ReportingResults => "reporting_results",
            PipelineState::Done => "done",
            PipelineState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// 한 번의 명령 실행 동안의 상태 추적기.
#[derive(Debug)]
pub struct Pipeline {
    kind: CommandKind,
    state: PipelineState,
    started: Instant,
}

impl Pipeline {
    pub fn start(kind: CommandKind) -> Self {
        info!(command = %kind, state = %PipelineState::ValidatingInput, "파이프라인 시작");
        Self {
            kind,
            state: PipelineState::ValidatingInput,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// 다음 단계로 이동합니다. 단계는 앞으로만 진행합니다.
    pub fn enter(&mut self, next: PipelineState) -> HedgeResult<()> {
        if self.state.is_terminal() || next <= self.state || next == PipelineState::Aborted {
            return Err(HedgeError::Internal(format!(
                "illegal pipeline transition {} -> {}",
                self.state, next
            )));
        }
        info!(
            command = %self.kind,
            from = %self.state,
            to = %next,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "파이프라인 단계 전환"
        );
        self.state = next;
        Ok(())
    }

    /// 실행 결과를 기록하고 그대로 반환합니다.
    pub fn finish<T>(&mut self, result: HedgeResult<T>) -> HedgeResult<T> {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                self.state = PipelineState::Done;
                info!(command = %self.kind, elapsed_ms = elapsed_ms, "파이프라인 완료");
            }
            Err(err) => {
                error!(
                    command = %self.kind,
                    stage = %self.state,
                    elapsed_ms = elapsed_ms,
                    error = %err,
                    "파이프라인 중단"
                );
                self.state = PipelineState::Aborted;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        let mut p = Pipeline::start(CommandKind::Beta);
        p.enter(PipelineState::FetchingDescriptors).unwrap();
        p.enter(PipelineState::FetchingHistories).unwrap();
        p.enter(PipelineState::Computing).unwrap();
        p.enter(PipelineState::ReportingResults).unwrap();
        assert_eq!(p.finish(Ok(())).ok(), Some(()));
        assert_eq!(p.state(), PipelineState::Done);
    }

    #[test]
    fn test_backward_transition_rejected() {
        let mut p = Pipeline::start(CommandKind::Beta);
        p.enter(PipelineState::Computing).unwrap();
        assert!(p.enter(PipelineState::FetchingHistories).is_err());
        assert!(p.enter(PipelineState::Computing).is_err());
    }

    #[test]
    fn test_abort_on_error() {
        let mut p = Pipeline::start(CommandKind::Hedge);
        p.enter(PipelineState::FetchingDescriptors).unwrap();
        let result: HedgeResult<()> =
            p.finish(Err(HedgeError::InstrumentNotFound("XXX".to_string())));
        assert!(result.is_err());
        assert_eq!(p.state(), PipelineState::Aborted);
        assert!(p.enter(PipelineState::Computing).is_err());
    }
}
