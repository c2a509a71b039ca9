//! 선물 헤지 비율 계산.
//!
//! 자산을 지정하지 않으면 헤지 선물의 기초자산을 사용합니다.
//! 조회 시작일은 요청 시작일과 두 종목의 데이터 가용 시작일 중 가장 늦은 날짜입니다.

use async_trait::async_trait;
use hedge_analytics::{align_by_date, hedge_ratio, price_changes};
use hedge_core::{Command, CommandKind, HedgeError, HedgeRatio, HedgeResult, Instrument};
use tracing::info;

use crate::context::EngineContext;
use crate::executor::{ensure_kind, fetch_histories, take, Executor};
use crate::state::{Pipeline, PipelineState};
use crate::task_group::TaskGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Hedge,
    Asset,
}

/// 헤지 비율 계산기.
pub struct HedgeCalculator {
    ctx: EngineContext,
}

impl HedgeCalculator {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub async fn calculate(&self, command: &Command) -> HedgeResult<HedgeRatio> {
        let mut pipeline = Pipeline::start(CommandKind::Hedge);
        let result = self.run(command, &mut pipeline).await;
        pipeline.finish(result)
    }

    async fn run(&self, command: &Command, pipeline: &mut Pipeline) -> HedgeResult<HedgeRatio> {
        ensure_kind(command, CommandKind::Hedge)?;
        command.validate()?;

        let ctx = &self.ctx;
        let hedge_ticker = command.reference_ticker().to_string();
        let asset_ticker = command.target_tickers().into_iter().next();
        let today = ctx.clock.today();
        let requested_from = command.window_start(today)?;
        let scope = ctx.shutdown.child_token();

        ctx.printer.line(&format!(
            "Calculate hedging coefficient for {} and {}",
            asset_ticker.as_deref().unwrap_or("underlying asset"),
            hedge_ticker
        ));

        pipeline.enter(PipelineState::FetchingDescriptors)?;
        let mut group = TaskGroup::new("describe_hedge_pair", &scope, ctx.max_concurrency);
        {
            let provider = ctx.provider.clone();
            let ticker = hedge_ticker.clone();
            group.spawn(move |_| async move {
                Ok((Role::Hedge, provider.describe(&ticker).await?))
            });
        }
        {
            let provider = ctx.provider.clone();
            let hedge = hedge_ticker.clone();
            let asset = asset_ticker.clone();
            group.spawn(move |_| async move {
                let ticker = match asset {
                    Some(ticker) => ticker,
                    None => provider.future_underlying(&hedge).await?,
                };
                Ok((Role::Asset, provider.describe(&ticker).await?))
            });
        }

        let mut hedge: Option<Instrument> = None;
        let mut asset: Option<Instrument> = None;
        for (role, instrument) in group.join_all().await? {
            match role {
                Role::Hedge => hedge = Some(instrument),
                Role::Asset => asset = Some(instrument),
            }
        }
        let (hedge, asset) = match (hedge, asset) {
            (Some(h), Some(a)) => (h, a),
            _ => {
                return Err(HedgeError::Internal(
                    "hedge pair descriptors incomplete".to_string(),
                ))
            }
        };

        if asset_ticker.is_none() {
            ctx.printer.line(&format!(
                "Underlying asset for {} is {}",
                hedge.ticker, asset.ticker
            ));
        }

        // 두 종목 모두 데이터가 있는 구간만 사용
        let from = hedge.effective_from(asset.effective_from(requested_from));
        info!(
            hedge = %hedge.ticker,
            asset = %asset.ticker,
            from = %from,
            till = %today,
            "헤지 비율 계산 구간"
        );

        pipeline.enter(PipelineState::FetchingHistories)?;
        let pair = vec![
            (hedge.ticker.clone(), hedge.clone()),
            (asset.ticker.clone(), asset.clone()),
        ];
        let histories = fetch_histories(ctx, &scope, &pair, from, today).await?;

        pipeline.enter(PipelineState::Computing)?;
        let hedge_history = take(&histories, &hedge.ticker)?;
        let asset_history = take(&histories, &asset.ticker)?;
        let (asset_aligned, hedge_aligned) =
            align_by_date(asset_history.as_slice(), hedge_history.as_slice());

        let asset_changes = price_changes(&asset_aligned);
        let stats = hedge_ratio(&asset_changes, &price_changes(&hedge_aligned))?;
        let ratio = HedgeRatio {
            asset: asset.ticker.clone(),
            hedge: hedge.ticker.clone(),
            asset_std_dev: stats.asset_std_dev,
            hedge_std_dev: stats.hedge_std_dev,
            correlation: stats.correlation,
            optimal_ratio: stats.optimal_ratio,
            efficiency: stats.efficiency,
            observations: asset_changes.len(),
        };

        pipeline.enter(PipelineState::ReportingResults)?;
        self.print(&ratio);

        Ok(ratio)
    }

    fn print(&self, ratio: &HedgeRatio) {
        let ctx = &self.ctx;
        ctx.printer.line(&format!(
            "{} standard deviation: {}",
            ratio.hedge,
            ctx.fmt(ratio.hedge_std_dev)
        ));
        ctx.printer.line(&format!(
            "{} standard deviation: {}",
            ratio.asset,
            ctx.fmt(ratio.asset_std_dev)
        ));
        ctx.printer.line(&format!(
            "Correlation between price changes of {} and {}: {}",
            ratio.hedge,
            ratio.asset,
            ctx.fmt(ratio.correlation)
        ));
        ctx.printer.line(&format!(
            "Optimal hedging coefficient is {}, hedging efficiency is {}",
            ctx.fmt(ratio.optimal_ratio),
            ctx.fmt(ratio.efficiency)
        ));
    }
}

#[async_trait]
impl Executor for HedgeCalculator {
    fn kind(&self) -> CommandKind {
        CommandKind::Hedge
    }

    async fn execute(&self, command: &Command) -> HedgeResult<()> {
        self.calculate(command).await.map(|_| ())
    }
}
