use crate::drawdown::max_drawdown_percent;
use crate::equity::build_equity_curve;
use crate::report::{day_buckets, hour_buckets, AnalyticsStats, AssetPerformance};
use chrono::{FixedOffset, Offset, Utc};
use core_types::{trades_for_account, withdrawals_for_account, Account, Trade, Withdrawal};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A stateless calculator for deriving performance statistics from logged trades.
///
/// The only setting is the UTC offset used to place trades on a day of the week and an
/// hour of the day.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine {
    offset: FixedOffset,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    /// An engine bucketing trades in UTC.
    pub fn new() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The main entry point for calculating performance statistics.
    ///
    /// # Arguments
    ///
    /// * `trades` - The trades to analyse, in any order.
    /// * `initial_capital` - The starting balance of the equity curve.
    /// * `withdrawals` - Capital removed over the same period.
    ///
    /// # Returns
    ///
    /// An `AnalyticsStats` snapshot. An empty trade set yields `AnalyticsStats::new()`.
    #[tracing::instrument(name = "analytics_calculate", skip_all, fields(trades = trades.len()))]
    pub fn calculate(
        &self,
        trades: &[Trade],
        initial_capital: Decimal,
        withdrawals: &[Withdrawal],
    ) -> AnalyticsStats {
        let mut report = AnalyticsStats::new();

        if trades.is_empty() {
            // No trades, nothing to measure; withdrawals alone do not make a track record.
            return report;
        }

        self.calculate_profitability(trades, initial_capital, withdrawals, &mut report);
        self.calculate_risk(trades, initial_capital, withdrawals, &mut report);
        self.calculate_notable_trades(trades, &mut report);
        self.calculate_distributions(trades, &mut report);

        tracing::debug!(
            total_trades = report.total_trades,
            win_rate = %report.win_rate,
            total_profit = %report.total_profit,
            max_drawdown = %report.max_drawdown,
            "Analytics calculated."
        );

        report
    }

    /// Runs `calculate` on the trades and withdrawals of a single account, starting
    /// from its initial capital.
    pub fn calculate_for_account(
        &self,
        account: &Account,
        trades: &[Trade],
        withdrawals: &[Withdrawal],
    ) -> AnalyticsStats {
        let trades = trades_for_account(trades, &account.id);
        let withdrawals = withdrawals_for_account(withdrawals, &account.id);
        self.calculate(&trades, account.initial_capital, &withdrawals)
    }

    /// Counts, sums, averages and the ratios built from them.
    fn calculate_profitability(
        &self,
        trades: &[Trade],
        initial_capital: Decimal,
        withdrawals: &[Withdrawal],
        report: &mut AnalyticsStats,
    ) {
        report.total_trades = trades.len();

        // Sums saturate at the bounds of `Decimal` instead of overflowing.
        for trade in trades {
            if trade.is_win() {
                report.gross_profit = report.gross_profit.saturating_add(trade.result);
                report.winning_trades += 1;
            } else if trade.is_loss() {
                report.gross_loss = report.gross_loss.saturating_add(trade.result);
                report.losing_trades += 1;
            } else {
                report.break_even_trades += 1;
            }
        }
        report.gross_loss = report.gross_loss.abs();
        report.total_profit = report.gross_profit.saturating_sub(report.gross_loss);
        report.total_withdrawn = withdrawals
            .iter()
            .fold(Decimal::ZERO, |acc, w| acc.saturating_add(w.amount));

        // Break-even trades count against the win rate.
        report.win_rate = Decimal::from(report.winning_trades) / Decimal::from(report.total_trades)
            * Decimal::ONE_HUNDRED;

        if report.gross_loss > Decimal::ZERO {
            report.profit_factor = report.gross_profit.checked_div(report.gross_loss);
        }

        if report.winning_trades > 0 {
            report.average_win = report.gross_profit / Decimal::from(report.winning_trades);
        }

        if report.losing_trades > 0 {
            report.average_loss = report.gross_loss / Decimal::from(report.losing_trades);
        }

        if report.average_loss > Decimal::ZERO {
            report.payoff_ratio = report.average_win.checked_div(report.average_loss);
        }

        let win_probability = report.win_rate / Decimal::ONE_HUNDRED;
        let loss_probability = (Decimal::ONE_HUNDRED - report.win_rate) / Decimal::ONE_HUNDRED;
        report.expected_value = (win_probability * report.average_win)
            .saturating_sub(loss_probability * report.average_loss);

        if initial_capital > Decimal::ZERO {
            report.return_pct = saturating_percent(report.total_profit, initial_capital);
        }
    }

    /// Maximum drawdown of the plain equity curve and the per-trade Sharpe ratio.
    fn calculate_risk(
        &self,
        trades: &[Trade],
        initial_capital: Decimal,
        withdrawals: &[Withdrawal],
        report: &mut AnalyticsStats,
    ) {
        let curve = build_equity_curve(trades, initial_capital, None, withdrawals);
        report.max_drawdown = max_drawdown_percent(&curve);
        report.sharpe_ratio = sharpe_ratio(trades);
    }

    /// Best and worst trades plus the longest chronological win and loss streaks.
    fn calculate_notable_trades(&self, trades: &[Trade], report: &mut AnalyticsStats) {
        report.max_win = trades
            .iter()
            .reduce(|best, t| if t.result > best.result { t } else { best })
            .cloned();

        let placeholder = Trade::zero_result_placeholder();
        let worst = trades
            .iter()
            .fold(&placeholder, |worst, t| if t.result < worst.result { t } else { worst });
        report.max_loss = Some(worst.clone());

        let mut chronological: Vec<&Trade> = trades.iter().collect();
        chronological.sort_by_key(|t| t.date);

        let (mut wins, mut losses) = (0usize, 0usize);
        for trade in chronological {
            if trade.is_win() {
                wins += 1;
                losses = 0;
            } else {
                losses += 1;
                wins = 0;
            }
            report.longest_win_streak = report.longest_win_streak.max(wins);
            report.longest_loss_streak = report.longest_loss_streak.max(losses);
        }
    }

    /// Day-of-week, hour-of-day and per-asset totals, and the sorted result sample.
    fn calculate_distributions(&self, trades: &[Trade], report: &mut AnalyticsStats) {
        let mut daily = [Decimal::ZERO; 7];
        let mut daily_trades = [0usize; 7];
        let mut hourly = [Decimal::ZERO; 24];
        let mut assets: Vec<AssetPerformance> = Vec::new();
        let mut asset_index: HashMap<&str, usize> = HashMap::new();

        for trade in trades {
            let weekday = trade.weekday_index(&self.offset);
            daily[weekday] = daily[weekday].saturating_add(trade.result);
            daily_trades[weekday] += 1;
            let hour = &mut hourly[trade.effective_hour(&self.offset)];
            *hour = hour.saturating_add(trade.result);

            let idx = *asset_index.entry(trade.asset.as_str()).or_insert_with(|| {
                assets.push(AssetPerformance {
                    asset: trade.asset.clone(),
                    profit: Decimal::ZERO,
                    trades: 0,
                });
                assets.len() - 1
            });
            assets[idx].profit = assets[idx].profit.saturating_add(trade.result);
            assets[idx].trades += 1;
        }

        // Stable: equal profits keep first-seen order.
        assets.sort_by(|a, b| b.profit.cmp(&a.profit));

        let mut results: Vec<Decimal> = trades.iter().map(|t| t.result).collect();
        results.sort();

        report.daily_distribution = day_buckets(&daily, &daily_trades);
        report.hourly_distribution = hour_buckets(&hourly);
        report.asset_performance = assets;
        report.win_loss_distribution = results;
    }
}

/// Mean trade result over its sample standard deviation (n - 1). Not annualized.
///
/// `None` with fewer than two trades, with no dispersion, or if any intermediate value
/// overflows.
fn sharpe_ratio(trades: &[Trade]) -> Option<Decimal> {
    if trades.len() < 2 {
        return None;
    }

    let n = Decimal::from(trades.len());
    let sum = trades
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.result))?;
    let mean = sum / n;

    let mut squared = Decimal::ZERO;
    for trade in trades {
        let diff = trade.result.checked_sub(mean)?;
        squared = squared.checked_add(diff.checked_mul(diff)?)?;
    }
    let variance = squared / (n - Decimal::ONE);
    if variance <= Decimal::ZERO {
        return None;
    }

    let std_dev = variance.sqrt()?;
    if std_dev.is_zero() {
        return None;
    }
    mean.checked_div(std_dev)
}

/// `value / base * 100`, clamped to the `Decimal` range when the quotient overflows.
/// `base` must be positive.
fn saturating_percent(value: Decimal, base: Decimal) -> Decimal {
    value
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if value.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
}

/// Computes the statistics for `trades`, bucketing days and hours in UTC.
pub fn compute_analytics(
    trades: &[Trade],
    initial_capital: Decimal,
    withdrawals: &[Withdrawal],
) -> AnalyticsStats {
    AnalyticsEngine::new().calculate(trades, initial_capital, withdrawals)
}

/// Computes the statistics of one account from the full trade and withdrawal lists.
pub fn compute_account_analytics(
    account: &Account,
    trades: &[Trade],
    withdrawals: &[Withdrawal],
) -> AnalyticsStats {
    AnalyticsEngine::new().calculate_for_account(account, trades, withdrawals)
}
