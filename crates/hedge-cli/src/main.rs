//! 헤지 계산 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # IMOEX 대비 SBER, GAZP 베타 (최근 12개월), 리포트 저장
//! hedger beta -a SBER,GAZP -i IMOEX -d 12 -r report.db
//!
//! # 달러 선물 헤지 비율 (기초자산 자동 조회)
//! hedger hedge -i SiZ4 -d 6
//!
//! # 종목 정보와 캐시 범위
//! hedger info -t SBER
//! ```

use clap::{Parser, Subcommand};
use hedge_core::{
    init_logging, AppConfig, Command, HedgeError, LogConfig, DEFAULT_CONFIG_PATH,
};
use hedge_data::{MoexClient, ProfitCache};
use hedge_engine::EngineContext;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "hedger")]
#[command(about = "MOEX beta & hedge ratio calculator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 상세 로그 (debug 레벨)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 설정 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 수익률 캐시 DB 경로 (설정 덮어쓰기)
    #[arg(long, global = true, env = "HEDGER_CACHE")]
    cache: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 지수 대비 베타 계수 계산
    Beta {
        /// 대상 종목 (쉼표 구분, 예: SBER,GAZP)
        #[arg(short, long)]
        assets: String,

        /// 시장 지수 종목 (예: IMOEX)
        #[arg(short, long)]
        index: String,

        /// 조회 기간 (개월)
        #[arg(short, long, default_value_t = 12)]
        depth: u32,

        /// 리포트 SQLite 파일
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// 선물 헤지 비율 계산
    Hedge {
        /// 헤지 선물 (예: SiZ4)
        #[arg(short = 'i', long)]
        hedge: String,

        /// 헤지 대상 자산 (생략 시 선물의 기초자산)
        #[arg(short, long, default_value = "")]
        asset: String,

        /// 조회 기간 (개월)
        #[arg(short, long, default_value_t = 12)]
        depth: u32,
    },

    /// 종목 정보, 과거 데이터 범위, 캐시 범위 조회
    Info {
        /// 종목 (쉼표 구분 가능)
        #[arg(short, long)]
        ticker: String,
    },
}

impl Commands {
    fn into_command(self) -> Command {
        match self {
            Commands::Beta {
                assets,
                index,
                depth,
                report,
            } => {
                let command = Command::beta(assets, index, depth);
                match report {
                    Some(path) => command.with_report(path),
                    None => command,
                }
            }
            Commands::Hedge {
                hedge,
                asset,
                depth,
            } => Command::hedge(hedge, asset, depth),
            Commands::Info { ticker } => Command::info(ticker),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(cache) = &cli.cache {
        config.cache.path = cache.clone();
    }

    if let Err(e) = init_logging(LogConfig::from_settings(&config.logging).verbose(cli.verbose)) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command.into_command(), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "명령 실패");
            eprintln!("error: {:#}", e);
            let code = e
                .downcast_ref::<HedgeError>()
                .map(HedgeError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

async fn run(command: Command, config: AppConfig) -> anyhow::Result<()> {
    // 캐시 파일을 만들기 전에 검증
    command.validate()?;

    let provider = MoexClient::new(&config.provider)?;
    let cache = ProfitCache::open(&config.cache).await?;
    info!(
        command = %command.kind,
        provider = %provider.base_url(),
        cache = %config.cache.path,
        "명령 실행"
    );

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl-C 수신: 실행 중인 작업 취소");
                shutdown.cancel();
            }
        });
    }

    let ctx = EngineContext::new(Arc::new(provider), cache)
        .with_max_concurrency(config.engine.max_concurrency)
        .with_shutdown(shutdown);

    hedge_engine::execute(ctx, &command).await?;
    Ok(())
}
