//! 수익률/정렬 불변식 속성 테스트.
//!
//! 1. 수익률 시계열 길이 = 입력 시세 길이
//! 2. 정렬 결과는 길이가 같고 모든 인덱스에서 거래일이 같음
//! 3. 정렬 결과는 양쪽 입력의 공통 거래일 집합과 일치

use chrono::{Days, NaiveDate};
use hedge_analytics::{align_by_date, index_returns_with_fallback, intraday, overnight, price_changes};
use hedge_core::HistoryItem;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// 오름차순, 중복 없는 거래일 오프셋.
fn arb_day_offsets() -> impl Strategy<Value = BTreeSet<u64>> {
    prop::collection::btree_set(0u64..400, 0..120)
}

fn arb_bars() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..500.0_f64, 0.0..500.0_f64), 0..200)
}

fn to_history(offsets: &BTreeSet<u64>) -> Vec<HistoryItem> {
    offsets
        .iter()
        .map(|d| HistoryItem::new(base_date() + Days::new(*d), 100.0, 101.0))
        .collect()
}

fn bars_to_history(bars: &[(f64, f64)]) -> Vec<HistoryItem> {
    bars.iter()
        .enumerate()
        .map(|(i, (o, c))| HistoryItem::new(base_date() + Days::new(i as u64), *o, *c))
        .collect()
}

proptest! {
    #[test]
    fn return_lengths_match_history(bars in arb_bars()) {
        let history = bars_to_history(&bars);
        prop_assert_eq!(intraday(&history).len(), history.len());
        prop_assert_eq!(overnight(&history).len(), history.len());
        prop_assert_eq!(index_returns_with_fallback(&history).len(), history.len());
        prop_assert_eq!(price_changes(&history).len(), history.len().saturating_sub(1));
    }

    #[test]
    fn returns_are_finite(bars in arb_bars()) {
        let history = bars_to_history(&bars);
        prop_assert!(intraday(&history).values().iter().all(|v| v.is_finite()));
        prop_assert!(overnight(&history).values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn aligned_pairs_share_dates(left in arb_day_offsets(), right in arb_day_offsets()) {
        let a = to_history(&left);
        let b = to_history(&right);

        let (aa, bb) = align_by_date(&a, &b);
        prop_assert_eq!(aa.len(), bb.len());
        for (x, y) in aa.iter().zip(&bb) {
            prop_assert_eq!(x.trade_date, y.trade_date);
        }

        let common: Vec<NaiveDate> = left
            .intersection(&right)
            .map(|d| base_date() + Days::new(*d))
            .collect();
        let aligned: Vec<NaiveDate> = aa.iter().map(|x| x.trade_date).collect();
        prop_assert_eq!(aligned, common);
    }
}
