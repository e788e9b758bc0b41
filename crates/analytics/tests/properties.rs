//! Invariants of the analytics pipeline over arbitrary trade and withdrawal sets.

use analytics::{build_equity_curve, compute_analytics, final_equity, max_drawdown_percent, PointDate};
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_types::{Trade, Withdrawal};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

fn trades_from(raw: &[(i64, i64)]) -> Vec<Trade> {
    raw.iter()
        .enumerate()
        .map(|(i, (minutes, cents))| Trade {
            id: format!("t{}", i),
            account_id: "acc".to_string(),
            date: epoch() + Duration::minutes(*minutes),
            asset: if i % 2 == 0 { "EURUSD" } else { "GBPJPY" }.to_string(),
            result: Decimal::new(*cents, 2),
            ..Trade::zero_result_placeholder()
        })
        .collect()
}

fn withdrawals_from(raw: &[(i64, i64)]) -> Vec<Withdrawal> {
    raw.iter()
        .enumerate()
        .map(|(i, (minutes, cents))| Withdrawal {
            id: format!("w{}", i),
            account_id: "acc".to_string(),
            amount: Decimal::new(*cents, 2),
            date: epoch() + Duration::minutes(*minutes),
        })
        .collect()
}

proptest! {
    #[test]
    fn curve_has_one_point_per_event_plus_sentinel(
        raw_trades in prop::collection::vec((0i64..40, -50_000i64..50_000), 0..30),
        raw_withdrawals in prop::collection::vec((0i64..40, 1i64..20_000), 0..10),
    ) {
        let trades = trades_from(&raw_trades);
        let withdrawals = withdrawals_from(&raw_withdrawals);
        let curve = build_equity_curve(&trades, dec!(10000), None, &withdrawals);

        prop_assert_eq!(curve.len(), trades.len() + withdrawals.len() + 1);
        prop_assert_eq!(curve[0].date, PointDate::Initial);
    }

    #[test]
    fn final_equity_is_capital_plus_results_minus_withdrawals(
        raw_trades in prop::collection::vec((0i64..10, -50_000i64..50_000), 0..30),
        raw_withdrawals in prop::collection::vec((0i64..10, 1i64..20_000), 0..10),
    ) {
        let trades = trades_from(&raw_trades);
        let withdrawals = withdrawals_from(&raw_withdrawals);
        let expected = dec!(10000)
            + trades.iter().map(|t| t.result).sum::<Decimal>()
            - withdrawals.iter().map(|w| w.amount).sum::<Decimal>();

        let curve = build_equity_curve(&trades, dec!(10000), None, &withdrawals);
        prop_assert_eq!(final_equity(&curve), Some(expected));
    }

    #[test]
    fn curve_dates_never_go_backwards(
        raw_trades in prop::collection::vec((0i64..1000, -50_000i64..50_000), 0..30),
    ) {
        let trades = trades_from(&raw_trades);
        let curve = build_equity_curve(&trades, dec!(500), None, &[]);
        let dates: Vec<_> = curve
            .iter()
            .filter_map(|p| match p.date {
                PointDate::At(d) => Some(d),
                PointDate::Initial => None,
            })
            .collect();
        prop_assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn winning_only_sequences_have_no_drawdown(
        raw_results in prop::collection::vec(1i64..50_000, 1..30),
    ) {
        let raw: Vec<(i64, i64)> = raw_results.iter().enumerate().map(|(i, r)| (i as i64, *r)).collect();
        let trades = trades_from(&raw);
        let curve = build_equity_curve(&trades, dec!(1000), None, &[]);
        prop_assert_eq!(max_drawdown_percent(&curve), Decimal::ZERO);
    }

    #[test]
    fn analytics_are_idempotent_and_bounded(
        raw_trades in prop::collection::vec((0i64..100, -50_000i64..50_000), 0..30),
        raw_withdrawals in prop::collection::vec((0i64..100, 1i64..20_000), 0..5),
    ) {
        let trades = trades_from(&raw_trades);
        let withdrawals = withdrawals_from(&raw_withdrawals);

        let first = compute_analytics(&trades, dec!(10000), &withdrawals);
        let second = compute_analytics(&trades, dec!(10000), &withdrawals);
        prop_assert_eq!(&first, &second);

        prop_assert!(first.win_rate >= Decimal::ZERO && first.win_rate <= dec!(100));
        prop_assert!(first.max_drawdown >= Decimal::ZERO);
        prop_assert_eq!(first.win_loss_distribution.len(), trades.len());
        prop_assert_eq!(
            first.asset_performance.iter().map(|a| a.trades).sum::<usize>(),
            trades.len()
        );
        prop_assert_eq!(
            first.winning_trades + first.losing_trades + first.break_even_trades,
            trades.len()
        );
    }
}

#[test]
fn sentinel_report_serializes_with_null_ratios() {
    let stats = compute_analytics(&[], dec!(10000), &[]);
    let json = serde_json::to_value(&stats).unwrap();
    assert!(json["profitFactor"].is_null());
    assert!(json["sharpeRatio"].is_null());
    assert!(json["maxWin"].is_null());
    assert!(json["maxLoss"].is_null());
    assert_eq!(json["dailyDistribution"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["hourlyDistribution"].as_array().map(Vec::len), Some(24));
    assert_eq!(json["assetPerformance"].as_array().map(Vec::len), Some(0));
}
