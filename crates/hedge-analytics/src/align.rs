//! 시계열 정렬.
//!
//! 두 시계열은 거래일이 서로 다를 수 있습니다 (상장일, 휴장일, 거래 정지).
//! 쌍으로 통계를 계산하려면 같은 거래일만 남겨야 합니다.
//!
//! # 전략
//!
//! - [`truncate_to_common`]: 짧은 쪽 길이로 자르기. 거래일이 같다고 알려진 경우의 빠른 경로.
//! - [`align_by_date`]: 두 포인터 병합. 공통 거래일만 남기며 순서를 유지합니다.

use hedge_core::Dated;
use tracing::{debug, error};

/// 두 시계열을 짧은 쪽 길이로 자릅니다 (앞부분 유지).
///
/// 거래일은 비교하지 않습니다.
pub fn truncate_to_common<A: Clone, B: Clone>(left: &[A], right: &[B]) -> (Vec<A>, Vec<B>) {
    let len = left.len().min(right.len());
    (left[..len].to_vec(), right[..len].to_vec())
}

/// 두 거래일 오름차순 시계열에서 공통 거래일만 남깁니다.
///
/// 결과의 두 시퀀스는 길이가 같고, 모든 인덱스에서 거래일이 같습니다.
/// 사후 검증이 실패하면 데이터 무결성 결함으로 에러 로그를 남기지만 결과는 그대로 반환합니다.
pub fn align_by_date<A, B>(left: &[A], right: &[B]) -> (Vec<A>, Vec<B>)
where
    A: Dated + Clone,
    B: Dated + Clone,
{
    let mut aligned_left = Vec::with_capacity(left.len().min(right.len()));
    let mut aligned_right = Vec::with_capacity(left.len().min(right.len()));

    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        let (l, r) = (left[i].trade_date(), right[j].trade_date());
        if l == r {
            aligned_left.push(left[i].clone());
            aligned_right.push(right[j].clone());
            i += 1;
            j += 1;
        } else if l < r {
            i += 1;
        } else {
            j += 1;
        }
    }

    verify_alignment(&aligned_left, &aligned_right);

    debug!(
        left = left.len(),
        right = right.len(),
        common = aligned_left.len(),
        "시계열 정렬 완료"
    );

    (aligned_left, aligned_right)
}

/// 정렬 결과 사후 검증. 정렬되지 않은 입력이 들어오면 실패할 수 있습니다.
fn verify_alignment<A: Dated, B: Dated>(left: &[A], right: &[B]) -> bool {
    if left.len() != right.len() {
        error!(
            left = left.len(),
            right = right.len(),
            "정렬된 시계열 길이 불일치"
        );
        return false;
    }

    let mut ok = true;
    for (index, (l, r)) in left.iter().zip(right).enumerate() {
        if l.trade_date() != r.trade_date() {
            error!(
                index = index,
                left = %l.trade_date(),
                right = %r.trade_date(),
                "정렬된 시계열 거래일 불일치"
            );
            ok = false;
        }
    }

    // 입력이 오름차순이 아니면 병합이 공통 거래일을 놓칠 수 있음
    if left
        .windows(2)
        .any(|w| w[0].trade_date() >= w[1].trade_date())
    {
        error!("정렬된 시계열이 거래일 오름차순이 아님");
        ok = false;
    }

    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hedge_core::{HistoryItem, ReturnPoint};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn items(days: &[u32]) -> Vec<HistoryItem> {
        days.iter()
            .map(|d| HistoryItem::new(day(*d), 100.0, 100.0 + *d as f64))
            .collect()
    }

    #[test]
    fn test_truncate_to_common() {
        let (a, b) = truncate_to_common(&[1, 2, 3, 4], &["a", "b"]);
        assert_eq!(a, vec![1, 2]);
        assert_eq!(b, vec!["a", "b"]);
    }

    #[test]
    fn test_align_drops_unmatched_dates() {
        let index = items(&[2, 3, 4, 5, 8, 9]);
        let asset = items(&[3, 4, 8, 10]);

        let (i, a) = align_by_date(&index, &asset);
        let dates: Vec<NaiveDate> = i.iter().map(|x| x.trade_date).collect();
        assert_eq!(dates, vec![day(3), day(4), day(8)]);
        assert_eq!(i.len(), a.len());
        for (x, y) in i.iter().zip(&a) {
            assert_eq!(x.trade_date, y.trade_date);
        }
    }

    #[test]
    fn test_align_mixed_types() {
        let history = items(&[1, 2, 3]);
        let returns = vec![
            ReturnPoint { date: day(2), value: 0.1 },
            ReturnPoint { date: day(3), value: 0.2 },
        ];
        let (h, r) = align_by_date(&history, &returns);
        assert_eq!(h.len(), 2);
        assert_eq!(r[0].value, 0.1);
    }

    #[test]
    fn test_align_disjoint_is_empty() {
        let (a, b) = align_by_date(&items(&[1, 2]), &items(&[3, 4]));
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn test_verify_alignment_detects_mismatch() {
        assert!(verify_alignment(&items(&[1, 2]), &items(&[1, 2])));
        assert!(!verify_alignment(&items(&[1, 2]), &items(&[1, 3])));
        assert!(!verify_alignment(&items(&[1]), &items(&[1, 2])));
        assert!(!verify_alignment(&items(&[2, 1]), &items(&[2, 1])));
    }
}
