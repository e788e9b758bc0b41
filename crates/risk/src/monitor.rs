use crate::error::RiskError;
use core_types::{Account, DrawdownType, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where an account stands against its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountStatus {
    Active,
    TargetReached,
    /// The drawdown limit has been consumed. Takes precedence over `TargetReached`.
    Breached,
}

/// Live progress of one account toward its profit target and drawdown limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub account_id: String,
    pub trade_count: usize,

    /// Initial capital plus every trade result. Withdrawals are not applied.
    pub equity: Decimal,
    /// Running maximum of `equity`, starting at the initial capital.
    pub high_water_mark: Decimal,

    pub profit_target_value: Decimal,
    pub drawdown_limit_value: Decimal,
    pub current_profit: Decimal,
    pub current_drawdown_amount: Decimal,
    /// 0-100.
    pub profit_progress: Decimal,
    /// 0-100.
    pub drawdown_progress: Decimal,

    /// `equity` minus everything withdrawn.
    pub current_balance: Decimal,
    /// `high_water_mark` minus everything withdrawn.
    pub peak_balance: Decimal,
    /// The balance at which the drawdown limit is fully used.
    pub drawdown_floor: Decimal,
    pub remaining_to_target: Decimal,
    pub remaining_drawdown: Decimal,
    pub status: AccountStatus,
}

/// Evaluates a single funded account against its profit target and drawdown rules.
///
/// The peak tracked here is the peak of raw trading equity. Withdrawals are only
/// subtracted afterwards, from both the current value and the peak.
#[derive(Debug, Clone, Copy)]
pub struct AccountRiskMonitor<'a> {
    account: &'a Account,
}

impl<'a> AccountRiskMonitor<'a> {
    pub fn new(account: &'a Account) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        self.account
    }

    /// Replays the account's trades (others are ignored) and derives its progress.
    pub fn stats(&self, trades: &[Trade]) -> AccountStats {
        let account = self.account;
        let initial_capital = account.initial_capital;

        // --- 1. Replay the account's trades in date order ---
        let mut own: Vec<&Trade> = trades.iter().filter(|t| t.account_id == account.id).collect();
        own.sort_by_key(|t| t.date);

        let mut equity = initial_capital;
        let mut high_water_mark = initial_capital;
        for trade in &own {
            equity = equity.saturating_add(trade.result);
            high_water_mark = high_water_mark.max(equity);
        }

        // --- 2. Resolve the rule thresholds ---
        let profit_target_value = account.profit_target_value();
        let drawdown_limit_value = account.drawdown_limit_value();

        // --- 3. Profit side ---
        let current_profit = equity.saturating_sub(initial_capital);
        let profit_progress = progress(current_profit, profit_target_value);

        // --- 4. Drawdown side, on withdrawal-adjusted balances ---
        let current_balance = equity.saturating_sub(account.total_withdrawn);
        let peak_balance = high_water_mark.saturating_sub(account.total_withdrawn);

        let (current_drawdown_amount, drawdown_floor) = match account.drawdown_type {
            DrawdownType::Trailing => (
                peak_balance.saturating_sub(current_balance).max(Decimal::ZERO),
                peak_balance.saturating_sub(drawdown_limit_value),
            ),
            DrawdownType::Maximum => (
                initial_capital.saturating_sub(current_balance).max(Decimal::ZERO),
                initial_capital.saturating_sub(drawdown_limit_value),
            ),
        };
        let drawdown_progress = progress(current_drawdown_amount, drawdown_limit_value);

        let status = if drawdown_limit_value > Decimal::ZERO && drawdown_progress >= Decimal::ONE_HUNDRED {
            AccountStatus::Breached
        } else if profit_target_value > Decimal::ZERO && profit_progress >= Decimal::ONE_HUNDRED {
            AccountStatus::TargetReached
        } else {
            AccountStatus::Active
        };

        if status == AccountStatus::Breached {
            tracing::warn!(
                account_id = %account.id,
                drawdown = %current_drawdown_amount,
                limit = %drawdown_limit_value,
                "Account has used its full drawdown allowance."
            );
        } else {
            tracing::debug!(
                account_id = %account.id,
                trades = own.len(),
                profit_progress = %profit_progress,
                drawdown_progress = %drawdown_progress,
                "Account stats calculated."
            );
        }

        AccountStats {
            account_id: account.id.clone(),
            trade_count: own.len(),
            equity,
            high_water_mark,
            profit_target_value,
            drawdown_limit_value,
            current_profit,
            current_drawdown_amount,
            profit_progress,
            drawdown_progress,
            current_balance,
            peak_balance,
            drawdown_floor,
            remaining_to_target: profit_target_value.saturating_sub(current_profit).max(Decimal::ZERO),
            remaining_drawdown: drawdown_limit_value
                .saturating_sub(current_drawdown_amount)
                .max(Decimal::ZERO),
            status,
        }
    }
}

/// `amount / limit` as a percentage clamped to 0-100; 0 when `limit` is 0.
fn progress(amount: Decimal, limit: Decimal) -> Decimal {
    if limit.is_zero() {
        return Decimal::ZERO;
    }
    let percent = amount
        .checked_div(limit)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    match percent {
        Some(p) => p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        // Overflow only happens far outside the 0-100 band.
        None if amount.is_sign_negative() != limit.is_sign_negative() => Decimal::ZERO,
        None => Decimal::ONE_HUNDRED,
    }
}

/// Progress of `account` toward its profit target and drawdown limit.
pub fn account_stats(account: &Account, trades: &[Trade]) -> AccountStats {
    AccountRiskMonitor::new(account).stats(trades)
}

/// Looks the account up by id before computing its stats.
pub fn account_stats_by_id(
    accounts: &[Account],
    account_id: &str,
    trades: &[Trade],
) -> Result<AccountStats, RiskError> {
    let account = accounts
        .iter()
        .find(|a| a.id == account_id)
        .ok_or_else(|| RiskError::AccountNotFound(account_id.to_string()))?;
    Ok(account_stats(account, trades))
}

/// Stats for every account, in input order.
pub fn portfolio_stats(accounts: &[Account], trades: &[Trade]) -> Vec<AccountStats> {
    accounts.iter().map(|a| account_stats(a, trades)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use core_types::ValueType;
    use rust_decimal_macros::dec;

    fn account(drawdown_type: DrawdownType) -> Account {
        Account {
            id: "ftmo-1".to_string(),
            name: Some("Challenge".to_string()),
            initial_capital: dec!(10000),
            currency: "USD".to_string(),
            current_capital: dec!(10000),
            profit_target: dec!(10),
            profit_target_type: ValueType::Percentage,
            drawdown_type,
            drawdown_value: dec!(5),
            drawdown_value_type: ValueType::Percentage,
            total_withdrawn: Decimal::ZERO,
            strategy_id: None,
        }
    }

    fn trade(account_id: &str, day: i64, result: Decimal) -> Trade {
        Trade {
            id: format!("{}-{}", account_id, day),
            account_id: account_id.to_string(),
            date: Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap() + Duration::days(day),
            asset: "US30".to_string(),
            result,
            ..Trade::zero_result_placeholder()
        }
    }

    #[test]
    fn no_trades_means_no_progress() {
        let stats = account_stats(&account(DrawdownType::Maximum), &[]);
        assert_eq!(stats.equity, dec!(10000));
        assert_eq!(stats.high_water_mark, dec!(10000));
        assert_eq!(stats.profit_progress, dec!(0));
        assert_eq!(stats.drawdown_progress, dec!(0));
        assert_eq!(stats.status, AccountStatus::Active);
        assert_eq!(stats.trade_count, 0);
    }

    #[test]
    fn maximum_regime_with_profit() {
        let trades = vec![trade("ftmo-1", 0, dec!(400)), trade("ftmo-1", 1, dec!(200))];
        let stats = account_stats(&account(DrawdownType::Maximum), &trades);

        assert_eq!(stats.profit_target_value, dec!(1000));
        assert_eq!(stats.drawdown_limit_value, dec!(500));
        assert_eq!(stats.current_profit, dec!(600));
        assert_eq!(stats.profit_progress, dec!(60));
        assert_eq!(stats.drawdown_progress, dec!(0));
        assert_eq!(stats.remaining_to_target, dec!(400));
        assert_eq!(stats.drawdown_floor, dec!(9500));
    }

    #[test]
    fn trailing_regime_measures_from_peak() {
        let trades = vec![trade("ftmo-1", 0, dec!(1000)), trade("ftmo-1", 1, dec!(-400))];

        let trailing = account_stats(&account(DrawdownType::Trailing), &trades);
        assert_eq!(trailing.high_water_mark, dec!(11000));
        assert_eq!(trailing.current_drawdown_amount, dec!(400));
        assert_eq!(trailing.drawdown_progress, dec!(80));
        assert_eq!(trailing.drawdown_floor, dec!(10500));
        assert_eq!(trailing.remaining_drawdown, dec!(100));

        let maximum = account_stats(&account(DrawdownType::Maximum), &trades);
        assert_eq!(maximum.current_drawdown_amount, dec!(0));
    }

    #[test]
    fn trades_are_replayed_chronologically() {
        // Out of order: the peak only exists if the +1000 comes first.
        let trades = vec![trade("ftmo-1", 1, dec!(-400)), trade("ftmo-1", 0, dec!(1000))];
        let stats = account_stats(&account(DrawdownType::Trailing), &trades);
        assert_eq!(stats.high_water_mark, dec!(11000));
    }

    #[test]
    fn withdrawals_shift_both_balances() {
        let mut acc = account(DrawdownType::Maximum);
        acc.total_withdrawn = dec!(1000);
        let trades = vec![trade("ftmo-1", 0, dec!(600))];

        let stats = account_stats(&acc, &trades);
        assert_eq!(stats.equity, dec!(10600));
        assert_eq!(stats.current_balance, dec!(9600));
        assert_eq!(stats.peak_balance, dec!(9600));
        assert_eq!(stats.current_drawdown_amount, dec!(400));
        assert_eq!(stats.drawdown_progress, dec!(80));
        // Profit is measured on raw equity.
        assert_eq!(stats.profit_progress, dec!(60));
    }

    #[test]
    fn progress_is_clamped_and_status_reported() {
        let trades = vec![trade("ftmo-1", 0, dec!(-900))];
        let stats = account_stats(&account(DrawdownType::Maximum), &trades);
        assert_eq!(stats.drawdown_progress, dec!(100));
        assert_eq!(stats.profit_progress, dec!(0));
        assert_eq!(stats.status, AccountStatus::Breached);

        let trades = vec![trade("ftmo-1", 0, dec!(2500))];
        let stats = account_stats(&account(DrawdownType::Maximum), &trades);
        assert_eq!(stats.profit_progress, dec!(100));
        assert_eq!(stats.status, AccountStatus::TargetReached);
    }

    #[test]
    fn zero_thresholds_never_divide() {
        let mut acc = account(DrawdownType::Trailing);
        acc.profit_target = dec!(0);
        acc.drawdown_value = dec!(0);
        let trades = vec![trade("ftmo-1", 0, dec!(500)), trade("ftmo-1", 1, dec!(-800))];

        let stats = account_stats(&acc, &trades);
        assert_eq!(stats.profit_progress, dec!(0));
        assert_eq!(stats.drawdown_progress, dec!(0));
        assert_eq!(stats.status, AccountStatus::Active);
    }

    #[test]
    fn huge_losses_saturate_and_breach() {
        let big = Decimal::from_i128_with_scale(-50_000_000_000_000_000_000_000_000_000, 0);
        let trades = vec![trade("ftmo-1", 0, big), trade("ftmo-1", 1, big)];

        let stats = account_stats(&account(DrawdownType::Maximum), &trades);
        assert_eq!(stats.equity, Decimal::MIN);
        assert_eq!(stats.current_drawdown_amount, Decimal::MAX);
        assert_eq!(stats.profit_progress, dec!(0));
        assert_eq!(stats.drawdown_progress, dec!(100));
        assert_eq!(stats.status, AccountStatus::Breached);
    }

    #[test]
    fn tiny_limit_progress_saturates_at_full() {
        let mut acc = account(DrawdownType::Maximum);
        acc.drawdown_value = Decimal::new(1, 20);
        acc.drawdown_value_type = ValueType::Fixed;
        let trades = vec![trade("ftmo-1", 0, dec!(-10000000000))];

        let stats = account_stats(&acc, &trades);
        assert_eq!(stats.drawdown_progress, dec!(100));
        assert_eq!(stats.status, AccountStatus::Breached);
    }

    #[test]
    fn other_accounts_are_ignored() {
        let trades = vec![trade("ftmo-1", 0, dec!(100)), trade("other", 0, dec!(-5000))];
        let stats = account_stats(&account(DrawdownType::Maximum), &trades);
        assert_eq!(stats.trade_count, 1);
        assert_eq!(stats.equity, dec!(10100));
    }

    #[test]
    fn lookup_by_id() {
        let accounts = vec![account(DrawdownType::Maximum)];
        assert!(account_stats_by_id(&accounts, "ftmo-1", &[]).is_ok());
        assert_eq!(
            account_stats_by_id(&accounts, "missing", &[]),
            Err(RiskError::AccountNotFound("missing".to_string()))
        );
        assert_eq!(portfolio_stats(&accounts, &[]).len(), 1);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let trades = vec![trade("ftmo-1", 0, dec!(1000)), trade("ftmo-1", 1, dec!(-400))];
        let acc = account(DrawdownType::Trailing);
        let first = serde_json::to_string(&account_stats(&acc, &trades)).unwrap();
        let second = serde_json::to_string(&account_stats(&acc, &trades)).unwrap();
        assert_eq!(first, second);
    }
}
