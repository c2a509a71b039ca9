//! 실행 컨텍스트.
//!
//! 실행기(executor)가 사용하는 협력 객체를 묶습니다. 전역 상태 대신 주입됩니다.

use chrono::NaiveDate;
use hedge_core::{LocaleFormatter, NumberFormatter};
use hedge_data::{MarketDataProvider, ProfitCache};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::output::{ResultPrinter, StdoutPrinter};

/// 오늘 날짜 공급자.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 로컬 시스템 시계.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// 고정 날짜.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// 실행 컨텍스트.
#[derive(Clone)]
pub struct EngineContext {
    pub provider: Arc<dyn MarketDataProvider>,
    pub cache: ProfitCache,
    pub printer: Arc<dyn ResultPrinter>,
    pub formatter: Arc<dyn NumberFormatter>,
    pub clock: Arc<dyn Clock>,
    /// 단계별 동시 작업 상한 (0 = 제한 없음)
    pub max_concurrency: usize,
    /// 프로세스 종료 신호. 모든 작업 그룹의 상위 토큰입니다.
    pub shutdown: CancellationToken,
}

impl EngineContext {
    /// 표준 출력, `LANG` 로케일, 시스템 시계로 생성합니다.
    pub fn new(provider: Arc<dyn MarketDataProvider>, cache: ProfitCache) -> Self {
        Self {
            provider,
            cache,
            printer: Arc::new(StdoutPrinter),
            formatter: Arc::new(LocaleFormatter::from_env()),
            clock: Arc::new(SystemClock),
            max_concurrency: 0,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_printer(mut self, printer: Arc<dyn ResultPrinter>) -> Self {
        self.printer = printer;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn NumberFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub(crate) fn fmt(&self, value: f64) -> String {
        self.formatter.format(value)
    }
}
