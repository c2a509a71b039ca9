//! 명령 실행기.
//!
//! 명령 종류별 실행기를 하나의 trait 뒤에 둡니다. fan-out 단계(종목 조회, 시세 조회)는
//! 모든 실행기가 공유합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::{Command, CommandKind, HedgeError, HedgeResult, HistoryItem, Instrument};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::beta::BetaCalculator;
use crate::context::EngineContext;
use crate::hedge::HedgeCalculator;
use crate::info::InfoReporter;
use crate::task_group::TaskGroup;

/// 명령 실행기.
#[async_trait]
pub trait Executor: Send + Sync {
    fn kind(&self) -> CommandKind;

    async fn execute(&self, command: &Command) -> HedgeResult<()>;
}

/// 명령 종류에 맞는 실행기를 생성합니다.
pub fn create_executor(kind: CommandKind, ctx: EngineContext) -> Box<dyn Executor> {
    match kind {
        CommandKind::Beta => Box::new(BetaCalculator::new(ctx)),
        CommandKind::Hedge => Box::new(HedgeCalculator::new(ctx)),
        CommandKind::Info => Box::new(InfoReporter::new(ctx)),
    }
}

/// 명령을 실행합니다.
pub async fn execute(ctx: EngineContext, command: &Command) -> HedgeResult<()> {
    create_executor(command.kind, ctx).execute(command).await
}

pub(crate) fn ensure_kind(command: &Command, expected: CommandKind) -> HedgeResult<()> {
    if command.kind != expected {
        return Err(HedgeError::InvalidCommand(format!(
            "{} executor cannot run '{}' command",
            expected, command.kind
        )));
    }
    Ok(())
}

/// 순서를 유지하며 중복을 제거합니다.
pub(crate) fn unique(tickers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ticker in tickers {
        if !out.contains(&ticker) {
            out.push(ticker);
        }
    }
    out
}

/// 종목당 작업 하나로 메타데이터를 조회합니다. 요청 종목 코드 → 종목 정보.
pub(crate) async fn fetch_descriptors(
    ctx: &EngineContext,
    scope: &CancellationToken,
    tickers: &[String],
) -> HedgeResult<HashMap<String, Instrument>> {
    let mut group = TaskGroup::new("fetch_descriptors", scope, ctx.max_concurrency);
    for ticker in tickers {
        let provider = ctx.provider.clone();
        let ticker = ticker.clone();
        group.spawn(move |_| async move {
            let instrument = provider.describe(&ticker).await?;
            Ok((ticker, instrument))
        });
    }

    let descriptors: HashMap<String, Instrument> = group.join_all().await?.into_iter().collect();
    debug!(count = descriptors.len(), "종목 정보 조회 완료");
    Ok(descriptors)
}

/// 종목당 작업 하나로 과거 시세를 조회합니다. 요청 종목 코드 → 시세.
pub(crate) async fn fetch_histories(
    ctx: &EngineContext,
    scope: &CancellationToken,
    instruments: &[(String, Instrument)],
    from: NaiveDate,
    till: NaiveDate,
) -> HedgeResult<HashMap<String, Arc<Vec<HistoryItem>>>> {
    let mut group = TaskGroup::new("fetch_histories", scope, ctx.max_concurrency);
    for (ticker, instrument) in instruments {
        let provider = ctx.provider.clone();
        let ticker = ticker.clone();
        let instrument = instrument.clone();
        group.spawn(move |_| async move {
            let history = provider.history(&instrument, from, till).await?;
            debug!(ticker = %ticker, count = history.len(), "과거 시세 수신");
            Ok((ticker, Arc::new(history)))
        });
    }

    Ok(group.join_all().await?.into_iter().collect())
}

/// 맵에서 값을 꺼냅니다. 없으면 내부 에러.
pub(crate) fn take<V: Clone>(map: &HashMap<String, V>, ticker: &str) -> HedgeResult<V> {
    map.get(ticker)
        .cloned()
        .ok_or_else(|| HedgeError::Internal(format!("missing stage result for {}", ticker)))
}
