//! 계산 결과 타입. 저장되지 않는 일시적 값입니다.

use serde::{Deserialize, Serialize};

use super::series::Derivation;

/// 지수 대비 종목 베타.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaResult {
    pub ticker: String,
    pub index: String,
    pub beta: f64,
    /// 정렬 후 공통 거래일 수
    pub observations: usize,
    /// 지수 수익률에 사용된 산출 방식
    pub index_derivation: Derivation,
}

/// 최소 분산 헤지 비율.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeRatio {
    pub asset: String,
    pub hedge: String,
    /// 자산 가격 변화의 표준편차
    pub asset_std_dev: f64,
    /// 헤지 수단 가격 변화의 표준편차
    pub hedge_std_dev: f64,
    pub correlation: f64,
    /// (σ_asset / σ_hedge) · ρ
    pub optimal_ratio: f64,
    /// ρ²
    pub efficiency: f64,
    pub observations: usize,
}
