//! 종목 정보 조회.
//!
//! 주 보드 정보, 거래소의 과거 데이터 가용 범위, 캐시된 수익률 범위를 출력합니다.

use async_trait::async_trait;
use hedge_core::{Command, CommandKind, DateRange, HedgeResult, Instrument};
use hedge_data::DataError;

use crate::context::EngineContext;
use crate::executor::{ensure_kind, fetch_descriptors, take, Executor};
use crate::state::{Pipeline, PipelineState};
use crate::task_group::TaskGroup;

/// 종목 정보 한 건.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentInfo {
    pub instrument: Instrument,
    pub available: DateRange,
    /// 캐시에 없으면 None
    pub cached: Option<DateRange>,
}

/// 정보 조회 실행기.
pub struct InfoReporter {
    ctx: EngineContext,
}

impl InfoReporter {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub async fn inspect(&self, command: &Command) -> HedgeResult<Vec<InstrumentInfo>> {
        let mut pipeline = Pipeline::start(CommandKind::Info);
        let result = self.run(command, &mut pipeline).await;
        pipeline.finish(result)
    }

    async fn run(
        &self,
        command: &Command,
        pipeline: &mut Pipeline,
    ) -> HedgeResult<Vec<InstrumentInfo>> {
        ensure_kind(command, CommandKind::Info)?;
        command.validate()?;

        let ctx = &self.ctx;
        let tickers = command.target_tickers();
        let scope = ctx.shutdown.child_token();

        pipeline.enter(PipelineState::FetchingDescriptors)?;
        let descriptors = fetch_descriptors(ctx, &scope, &tickers).await?;

        pipeline.enter(PipelineState::FetchingHistories)?;
        let mut group = TaskGroup::new("history_ranges", &scope, ctx.max_concurrency);
        for ticker in &tickers {
            let instrument = take(&descriptors, ticker)?;
            let provider = ctx.provider.clone();
            let cache = ctx.cache.clone();
            group.spawn(move |_| async move {
                let available = provider.history_range(&instrument).await?;
                let cached = match cache.range_for(&instrument.ticker).await {
                    Ok(range) => Some(range),
                    Err(DataError::CacheMiss(_)) => None,
                    Err(e) => return Err(e.into()),
                };
                Ok(InstrumentInfo {
                    instrument,
                    available,
                    cached,
                })
            });
        }
        let mut infos = group.join_all().await?;
        infos.sort_by_key(|info| {
            tickers
                .iter()
                .position(|t| descriptors.get(t) == Some(&info.instrument))
        });

        pipeline.enter(PipelineState::ReportingResults)?;
        for info in &infos {
            let i = &info.instrument;
            ctx.printer.line(&format!(
                "{}: engine {}, market {}, primary board {} ({})",
                i.ticker, i.engine, i.market, i.board, i.title
            ));
            ctx.printer.line(&format!("  history available: {}", info.available));
            match &info.cached {
                Some(range) => ctx.printer.line(&format!("  cached returns: {}", range)),
                None => ctx.printer.line("  cached returns: not cached"),
            }
        }

        Ok(infos)
    }
}

#[async_trait]
impl Executor for InfoReporter {
    fn kind(&self) -> CommandKind {
        CommandKind::Info
    }

    async fn execute(&self, command: &Command) -> HedgeResult<()> {
        self.inspect(command).await.map(|_| ())
    }
}
