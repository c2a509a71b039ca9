//! 지수 대비 베타 계산.
//!
//! 지수와 대상 종목을 병렬로 조회한 뒤, 종목마다 독립된 작업에서
//! 정렬 → 수익률 → 캐시 기록 → 베타를 계산합니다.

use async_trait::async_trait;
use hedge_analytics::{align_by_date, beta, index_returns_with_fallback, intraday};
use hedge_core::{BetaResult, Command, CommandKind, HedgeResult, HistoryItem};
use hedge_data::{ProfitCache, ReportStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::context::EngineContext;
use crate::executor::{ensure_kind, fetch_descriptors, fetch_histories, take, unique, Executor};
use crate::state::{Pipeline, PipelineState};
use crate::task_group::TaskGroup;

/// 베타 계산기.
pub struct BetaCalculator {
    ctx: EngineContext,
}

impl BetaCalculator {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// 계산하고 출력한 뒤 결과를 요청 순서대로 반환합니다.
    pub async fn calculate(&self, command: &Command) -> HedgeResult<Vec<BetaResult>> {
        let mut pipeline = Pipeline::start(CommandKind::Beta);
        let result = self.run(command, &mut pipeline).await;
        pipeline.finish(result)
    }

    async fn run(&self, command: &Command, pipeline: &mut Pipeline) -> HedgeResult<Vec<BetaResult>> {
        ensure_kind(command, CommandKind::Beta)?;
        command.validate()?;

        let ctx = &self.ctx;
        let index = command.reference_ticker().to_string();
        let targets = command.target_tickers();
        let today = ctx.clock.today();
        let from = command.window_start(today)?;
        let scope = ctx.shutdown.child_token();

        info!(
            index = %index,
            targets = ?targets,
            from = %from,
            till = %today,
            "베타 계산 시작"
        );
        ctx.printer.line(&format!(
            "Calculate beta coefficient for {} using {} as market index",
            targets.join(", "),
            index
        ));

        pipeline.enter(PipelineState::FetchingDescriptors)?;
        let entities = unique(std::iter::once(index.clone()).chain(targets.iter().cloned()));
        let descriptors = fetch_descriptors(ctx, &scope, &entities).await?;

        pipeline.enter(PipelineState::FetchingHistories)?;
        let instruments = entities
            .iter()
            .map(|t| Ok((t.clone(), take(&descriptors, t)?)))
            .collect::<HedgeResult<Vec<_>>>()?;
        let histories = fetch_histories(ctx, &scope, &instruments, from, today).await?;

        pipeline.enter(PipelineState::Computing)?;
        let results = self.compute_all(&scope, &index, &targets, &histories).await?;

        pipeline.enter(PipelineState::ReportingResults)?;
        self.report(command, &results).await?;

        Ok(results)
    }

    async fn compute_all(
        &self,
        scope: &CancellationToken,
        index: &str,
        targets: &[String],
        histories: &HashMap<String, Arc<Vec<HistoryItem>>>,
    ) -> HedgeResult<Vec<BetaResult>> {
        let index_history = take(histories, index)?;

        let mut group = TaskGroup::new("compute_beta", scope, self.ctx.max_concurrency);
        for ticker in targets {
            let asset_history = take(histories, ticker)?;
            let index_history = index_history.clone();
            let cache = self.ctx.cache.clone();
            let ticker = ticker.clone();
            let index = index.to_string();
            group.spawn(move |_| async move {
                compute_beta(ticker, index, index_history, asset_history, cache).await
            });
        }

        let mut results = group.join_all().await?;
        // 도착 순서 → 요청 순서
        results.sort_by_key(|r| targets.iter().position(|t| *t == r.ticker));
        Ok(results)
    }

    async fn report(&self, command: &Command, results: &[BetaResult]) -> HedgeResult<()> {
        let ctx = &self.ctx;

        if let Some(path) = &command.report {
            let store = ReportStore::open(path).await?;
            store.add_all(results, ctx.clock.today()).await?;
            store.close().await;
        }

        for result in results {
            ctx.printer.line(&format!(
                "{} beta: {} ({} observations, index returns: {})",
                result.ticker,
                ctx.fmt(result.beta),
                result.observations,
                result.index_derivation
            ));
        }

        ctx.cache.log_stats().await?;
        Ok(())
    }
}

/// 한 종목의 계산 단위. 캐시에는 이 종목의 수익률만 기록합니다.
async fn compute_beta(
    ticker: String,
    index: String,
    index_history: Arc<Vec<HistoryItem>>,
    asset_history: Arc<Vec<HistoryItem>>,
    cache: ProfitCache,
) -> HedgeResult<BetaResult> {
    let (index_aligned, asset_aligned) =
        align_by_date(index_history.as_slice(), asset_history.as_slice());

    let index_returns = index_returns_with_fallback(&index_aligned);
    let asset_returns = intraday(&asset_aligned);

    cache.put_series(&ticker, &asset_returns).await?;

    let value = beta(&index_returns.values(), &asset_returns.values())?;

    debug!(
        ticker = %ticker,
        index = %index,
        beta = value,
        observations = asset_returns.len(),
        derivation = %index_returns.derivation,
        "베타 계산 완료"
    );

    Ok(BetaResult {
        ticker,
        index,
        beta: value,
        observations: asset_returns.len(),
        index_derivation: index_returns.derivation,
    })
}

#[async_trait]
impl Executor for BetaCalculator {
    fn kind(&self) -> CommandKind {
        CommandKind::Beta
    }

    async fn execute(&self, command: &Command) -> HedgeResult<()> {
        self.calculate(command).await.map(|_| ())
    }
}
