//! 수익률 산출.
//!
//! 모든 함수는 입력 시세와 같은 길이의 결과를 반환합니다.

use hedge_core::{Derivation, HistoryItem, ReturnPoint, ReturnSeries};
use tracing::info;

/// 장중 수익률: `(close - open) / open`. 시가가 0이면 0.
pub fn intraday(history: &[HistoryItem]) -> ReturnSeries {
    let points = history
        .iter()
        .map(|item| ReturnPoint {
            date: item.trade_date,
            value: if item.open == 0.0 {
                0.0
            } else {
                (item.close - item.open) / item.open
            },
        })
        .collect();

    ReturnSeries::new(Derivation::Intraday, points)
}

/// 전일 종가 대비 수익률. 첫 원소와 전일 종가가 0인 경우는 0.
pub fn overnight(history: &[HistoryItem]) -> ReturnSeries {
    let mut points = Vec::with_capacity(history.len());
    let mut prev_close: Option<f64> = None;

    for item in history {
        let value = match prev_close {
            Some(prev) if prev != 0.0 => (item.close - prev) / prev,
            _ => 0.0,
        };
        points.push(ReturnPoint {
            date: item.trade_date,
            value,
        });
        prev_close = Some(item.close);
    }

    ReturnSeries::new(Derivation::Overnight, points)
}

/// 지수 수익률.
///
/// 장중 수익률의 합이 정확히 0이면 (지수는 보통 시가 = 종가로 보고됨)
/// 전일 종가 대비 수익률로 다시 계산합니다. 종목 쪽에는 적용하지 않습니다.
pub fn index_returns_with_fallback(history: &[HistoryItem]) -> ReturnSeries {
    let series = intraday(history);
    if series.sum() == 0.0 {
        info!(
            observations = history.len(),
            "지수 장중 수익률 합계가 0: 전일 종가 기준으로 재계산"
        );
        return overnight(history);
    }
    series
}

/// 종가 변화량 `close[i] - close[i-1]`. 길이는 입력보다 하나 짧습니다.
pub fn price_changes(history: &[HistoryItem]) -> Vec<f64> {
    history
        .windows(2)
        .map(|pair| pair[1].close - pair[0].close)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn history(bars: &[(f64, f64)]) -> Vec<HistoryItem> {
        bars.iter()
            .enumerate()
            .map(|(i, (open, close))| {
                HistoryItem::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                    *open,
                    *close,
                )
            })
            .collect()
    }

    #[test]
    fn test_intraday() {
        let series = intraday(&history(&[(100.0, 110.0), (0.0, 5.0), (50.0, 45.0)]));
        assert_eq!(series.derivation, Derivation::Intraday);
        let values = series.values();
        assert!((values[0] - 0.1).abs() < 1e-12);
        assert_eq!(values[1], 0.0);
        assert!((values[2] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_overnight() {
        let series = overnight(&history(&[(1.0, 100.0), (1.0, 110.0), (1.0, 99.0)]));
        let values = series.values();
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 0.1).abs() < 1e-12);
        assert!((values[2] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_overnight_zero_previous_close() {
        let values = overnight(&history(&[(1.0, 0.0), (1.0, 10.0)])).values();
        assert_eq!(values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_fallback_when_open_equals_close() {
        // 지수처럼 시가 = 종가
        let bars = history(&[(100.0, 100.0), (102.0, 102.0), (101.0, 101.0)]);
        let series = index_returns_with_fallback(&bars);
        assert_eq!(series.derivation, Derivation::Overnight);
        assert!((series.values()[1] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_no_fallback_when_intraday_nonzero() {
        let bars = history(&[(100.0, 101.0), (101.0, 100.0), (100.0, 100.5)]);
        let series = index_returns_with_fallback(&bars);
        assert_eq!(series.derivation, Derivation::Intraday);
    }

    #[test]
    fn test_price_changes() {
        let changes = price_changes(&history(&[(0.0, 10.0), (0.0, 12.0), (0.0, 11.0)]));
        assert_eq!(changes, vec![2.0, -1.0]);
        assert!(price_changes(&[]).is_empty());
        assert!(price_changes(&history(&[(0.0, 10.0)])).is_empty());
    }

    #[test]
    fn test_price_changes_have_no_leading_zero() {
        // 일정한 상승: 변화량이 모두 같아야 함
        let changes = price_changes(&history(&[(0.0, 10.0), (0.0, 11.0), (0.0, 12.0), (0.0, 13.0)]));
        assert_eq!(changes, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_lengths_match_input() {
        let bars = history(&[(1.0, 2.0); 7]);
        assert_eq!(intraday(&bars).len(), 7);
        assert_eq!(overnight(&bars).len(), 7);
        assert_eq!(price_changes(&bars).len(), 6);
        assert!(intraday(&[]).is_empty());
    }
}
