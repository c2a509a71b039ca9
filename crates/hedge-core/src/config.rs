//! 설정 관리.
//!
//! 우선순위 (낮음 → 높음): 내장 기본값, TOML 파일, `HEDGER__` 환경 변수.
//! 예: `HEDGER__PROVIDER__BASE_URL=http://localhost:8080`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::HedgeResult;

/// 설정 파일 기본 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// 시세 제공자(MOEX ISS) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// ISS 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://iss.moex.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("hedger/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// 수익률 캐시(SQLite) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// SQLite 파일 경로
    pub path: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 잠금 대기 시간 (밀리초)
    pub busy_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "hedger.db".to_string(),
            max_connections: 4,
            busy_timeout_ms: 5_000,
        }
    }
}

/// 오케스트레이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// 단계별 동시 실행 작업 수 상한 (0 = 제한 없음)
    pub max_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// pretty, json, compact
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 설정을 로드합니다. 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> HedgeResult<Self> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            .set_default("provider.base_url", defaults.provider.base_url)?
            .set_default("provider.timeout_secs", defaults.provider.timeout_secs)?
            .set_default("provider.user_agent", defaults.provider.user_agent)?
            .set_default("cache.path", defaults.cache.path)?
            .set_default("cache.max_connections", defaults.cache.max_connections)?
            .set_default("cache.busy_timeout_ms", defaults.cache.busy_timeout_ms)?
            .set_default(
                "engine.max_concurrency",
                defaults.engine.max_concurrency as u64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("HEDGER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> HedgeResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }
}
