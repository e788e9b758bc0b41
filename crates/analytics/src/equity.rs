use chrono::{DateTime, Utc};
use core_types::{Account, Trade, Withdrawal};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// The timestamp of an equity point. The first point of every curve is the
/// `Initial` sentinel, which has no instant attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointDate {
    Initial,
    At(DateTime<Utc>),
}

impl Serialize for PointDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PointDate::Initial => serializer.serialize_str("Initial"),
            PointDate::At(date) => date.serialize(serializer),
        }
    }
}

/// One point of the running balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityDataPoint {
    pub date: PointDate,
    pub equity: Decimal,
    /// Threshold line of a trailing drawdown account; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_drawdown: Option<Decimal>,
}

/// A balance change at a point in time.
#[derive(Debug, Clone, Copy)]
struct CurveEvent {
    date: DateTime<Utc>,
    delta: Decimal,
}

/// Builds the equity curve of an account from its trades and withdrawals.
///
/// The high-water mark tracked here is the peak of the running balance and is never
/// lowered by a withdrawal. It only feeds the trailing threshold line.
#[derive(Debug, Clone, Copy)]
pub struct EquityCurveBuilder<'a> {
    initial_capital: Decimal,
    account: Option<&'a Account>,
    withdrawals: &'a [Withdrawal],
}

impl<'a> EquityCurveBuilder<'a> {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            account: None,
            withdrawals: &[],
        }
    }

    /// Overlays the account's trailing drawdown line, if it uses one.
    pub fn with_account(mut self, account: Option<&'a Account>) -> Self {
        self.account = account;
        self
    }

    pub fn with_withdrawals(mut self, withdrawals: &'a [Withdrawal]) -> Self {
        self.withdrawals = withdrawals;
        self
    }

    /// Replays all events in chronological order.
    ///
    /// Events with the same instant keep their merge order: trades first in input
    /// order, then withdrawals in input order.
    pub fn build(&self, trades: &[Trade]) -> Vec<EquityDataPoint> {
        let mut events: Vec<CurveEvent> = trades
            .iter()
            .map(|t| CurveEvent {
                date: t.date,
                delta: t.result,
            })
            .chain(self.withdrawals.iter().map(|w| CurveEvent {
                date: w.date,
                delta: -w.amount,
            }))
            .collect();
        // Stable sort: ties stay in merge order.
        events.sort_by_key(|e| e.date);

        let trailing_limit = self
            .account
            .filter(|a| a.uses_trailing_drawdown())
            .map(|a| a.drawdown_value_type.resolve(a.drawdown_value, self.initial_capital));

        let mut curve = Vec::with_capacity(events.len() + 1);
        curve.push(EquityDataPoint {
            date: PointDate::Initial,
            equity: self.initial_capital,
            trailing_drawdown: trailing_limit.map(|limit| self.initial_capital.saturating_sub(limit)),
        });

        let mut current_balance = self.initial_capital;
        let mut high_water_mark = self.initial_capital;

        // The balance saturates at the bounds of `Decimal`.
        for event in &events {
            current_balance = current_balance.saturating_add(event.delta);
            if current_balance > high_water_mark {
                high_water_mark = current_balance;
            }
            curve.push(EquityDataPoint {
                date: PointDate::At(event.date),
                equity: current_balance,
                trailing_drawdown: trailing_limit.map(|limit| high_water_mark.saturating_sub(limit)),
            });
        }

        tracing::debug!(
            events = events.len(),
            final_equity = %current_balance,
            trailing = trailing_limit.is_some(),
            "Built equity curve."
        );

        curve
    }
}

/// Builds the equity curve for `trades` and `withdrawals` starting at `initial_capital`.
///
/// When `account` uses trailing drawdown every point also carries the trailing
/// threshold (`high-water mark - limit`).
pub fn build_equity_curve(
    trades: &[Trade],
    initial_capital: Decimal,
    account: Option<&Account>,
    withdrawals: &[Withdrawal],
) -> Vec<EquityDataPoint> {
    EquityCurveBuilder::new(initial_capital)
        .with_account(account)
        .with_withdrawals(withdrawals)
        .build(trades)
}

/// The balance at the end of the curve.
pub fn final_equity(curve: &[EquityDataPoint]) -> Option<Decimal> {
    curve.last().map(|p| p.equity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::{DrawdownType, ValueType};
    use rust_decimal_macros::dec;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()
    }

    fn trade(id: &str, days: i64, result: Decimal) -> Trade {
        Trade {
            id: id.to_string(),
            account_id: "acc".to_string(),
            date: base_time() + Duration::days(days),
            asset: "EURUSD".to_string(),
            result,
            ..Trade::zero_result_placeholder()
        }
    }

    fn withdrawal(days: i64, amount: Decimal) -> Withdrawal {
        Withdrawal {
            id: format!("w{}", days),
            account_id: "acc".to_string(),
            amount,
            date: base_time() + Duration::days(days),
        }
    }

    fn trailing_account(value: Decimal, value_type: ValueType) -> Account {
        Account {
            id: "acc".to_string(),
            name: None,
            initial_capital: dec!(10000),
            currency: "USD".to_string(),
            current_capital: dec!(10000),
            profit_target: dec!(10),
            profit_target_type: ValueType::Percentage,
            drawdown_type: DrawdownType::Trailing,
            drawdown_value: value,
            drawdown_value_type: value_type,
            total_withdrawn: Decimal::ZERO,
            strategy_id: None,
        }
    }

    #[test]
    fn empty_input_yields_only_the_sentinel() {
        let curve = build_equity_curve(&[], dec!(5000), None, &[]);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].date, PointDate::Initial);
        assert_eq!(curve[0].equity, dec!(5000));
        assert_eq!(curve[0].trailing_drawdown, None);
    }

    #[test]
    fn events_are_replayed_in_date_order() {
        // Supplied out of order on purpose.
        let trades = vec![trade("b", 2, dec!(-50)), trade("a", 0, dec!(200))];
        let withdrawals = vec![withdrawal(1, dec!(100))];

        let curve = build_equity_curve(&trades, dec!(1000), None, &withdrawals);
        let equities: Vec<_> = curve.iter().map(|p| p.equity).collect();
        assert_eq!(equities, vec![dec!(1000), dec!(1200), dec!(1100), dec!(1050)]);
        assert_eq!(curve[1].date, PointDate::At(base_time()));
        assert_eq!(final_equity(&curve), Some(dec!(1050)));
    }

    #[test]
    fn ties_put_trades_before_withdrawals() {
        let trades = vec![trade("a", 1, dec!(300))];
        let withdrawals = vec![withdrawal(1, dec!(500))];

        let curve = build_equity_curve(&trades, dec!(1000), None, &withdrawals);
        assert_eq!(curve[1].equity, dec!(1300));
        assert_eq!(curve[2].equity, dec!(800));
    }

    #[test]
    fn trailing_line_follows_high_water_mark_and_ignores_withdrawals() {
        let account = trailing_account(dec!(5), ValueType::Percentage);
        let trades = vec![trade("a", 0, dec!(400)), trade("b", 2, dec!(-200))];
        let withdrawals = vec![withdrawal(1, dec!(100))];

        let curve = build_equity_curve(&trades, dec!(10000), Some(&account), &withdrawals);
        let lines: Vec<_> = curve.iter().map(|p| p.trailing_drawdown).collect();
        // limit = 10000 * 5% = 500
        assert_eq!(
            lines,
            vec![Some(dec!(9500)), Some(dec!(9900)), Some(dec!(9900)), Some(dec!(9900))]
        );
    }

    #[test]
    fn fixed_trailing_limit_is_used_verbatim() {
        let account = trailing_account(dec!(750), ValueType::Fixed);
        let curve = build_equity_curve(&[trade("a", 0, dec!(1000))], dec!(10000), Some(&account), &[]);
        assert_eq!(curve[0].trailing_drawdown, Some(dec!(9250)));
        assert_eq!(curve[1].trailing_drawdown, Some(dec!(10250)));
    }

    #[test]
    fn no_line_without_trailing_regime_or_value() {
        let mut account = trailing_account(dec!(0), ValueType::Fixed);
        let curve = build_equity_curve(&[trade("a", 0, dec!(1))], dec!(100), Some(&account), &[]);
        assert!(curve.iter().all(|p| p.trailing_drawdown.is_none()));

        account.drawdown_value = dec!(10);
        account.drawdown_type = DrawdownType::Maximum;
        let curve = build_equity_curve(&[trade("a", 0, dec!(1))], dec!(100), Some(&account), &[]);
        assert!(curve.iter().all(|p| p.trailing_drawdown.is_none()));
    }

    #[test]
    fn sentinel_serializes_as_initial() {
        let curve = build_equity_curve(&[trade("a", 0, dec!(10))], dec!(100), None, &[]);
        let json = serde_json::to_value(&curve).unwrap();
        assert_eq!(json[0]["date"], "Initial");
        assert!(json[0].get("trailingDrawdown").is_none());
        assert!(json[1]["date"].as_str().unwrap().starts_with("2024-01-08T09:00:00"));
    }

    #[test]
    fn balance_saturates_at_the_decimal_bounds() {
        let big = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let trades = vec![trade("a", 0, big), trade("b", 1, big), trade("c", 2, -big)];
        let curve = build_equity_curve(&trades, dec!(0), None, &[]);

        assert_eq!(curve[2].equity, Decimal::MAX);
        assert_eq!(curve[3].equity, Decimal::MAX - big);
        assert_eq!(final_equity(&curve), Some(Decimal::MAX - big));
    }
}
