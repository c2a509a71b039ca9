//! 통계 계산.
//!
//! 모든 통계는 모집단 기준(n으로 나눔)입니다.
//! 분모가 0이 되는 비율은 NaN/Inf 대신 [`AnalyticsError::DegenerateSeries`]를 반환합니다.

use crate::error::{AnalyticsError, Result};

/// 이 값 이하의 표준편차는 0으로 취급합니다.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// 헤지 비율 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HedgeStatistics {
    pub asset_std_dev: f64,
    pub hedge_std_dev: f64,
    pub correlation: f64,
    pub optimal_ratio: f64,
    pub efficiency: f64,
}

fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "empty series".to_string(),
        ));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn check_pair(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "empty series".to_string(),
        ));
    }
    Ok(())
}

fn non_degenerate(std: f64, what: &str) -> Result<f64> {
    // NaN도 여기서 걸러짐
    if std > DEGENERATE_EPSILON {
        Ok(std)
    } else {
        Err(AnalyticsError::DegenerateSeries(format!(
            "{} has zero standard deviation",
            what
        )))
    }
}

/// 모집단 표준편차.
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Ok((sum_sq / values.len() as f64).sqrt())
}

/// 모집단 분산 (표준편차의 제곱).
pub fn variance(values: &[f64]) -> Result<f64> {
    let std = std_dev(values)?;
    Ok(std * std)
}

/// 모집단 공분산.
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64> {
    check_pair(x, y)?;
    let mx = mean(x)?;
    let my = mean(y)?;
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(sum / x.len() as f64)
}

/// Pearson 상관계수 (-1.0 ~ 1.0).
pub fn correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    let cov = covariance(x, y)?;
    let sx = non_degenerate(std_dev(x)?, "first series")?;
    let sy = non_degenerate(std_dev(y)?, "second series")?;
    Ok((cov / (sx * sy)).clamp(-1.0, 1.0))
}

/// 베타 = cov(index, asset) / var(index).
pub fn beta(index: &[f64], asset: &[f64]) -> Result<f64> {
    let cov = covariance(index, asset)?;
    let std = non_degenerate(std_dev(index)?, "index returns")?;
    Ok(cov / (std * std))
}

/// 최소 분산 헤지 비율.
///
/// `optimal = (σ_asset / σ_hedge) · ρ(hedge, asset)`, `efficiency = ρ²`.
pub fn hedge_ratio(asset_changes: &[f64], hedge_changes: &[f64]) -> Result<HedgeStatistics> {
    check_pair(asset_changes, hedge_changes)?;

    let asset_std_dev = std_dev(asset_changes)?;
    let hedge_std_dev = non_degenerate(std_dev(hedge_changes)?, "hedge price changes")?;
    let correlation = correlation(hedge_changes, asset_changes)?;

    Ok(HedgeStatistics {
        asset_std_dev,
        hedge_std_dev,
        correlation,
        optimal_ratio: (asset_std_dev / hedge_std_dev) * correlation,
        efficiency: correlation * correlation,
    })
}
