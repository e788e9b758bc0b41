use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Accumulated result for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub day: String,
    pub profit: Decimal,
    #[serde(default)]
    pub trades: usize,
}

/// Accumulated result for one hour of the day (0-23).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u8,
    pub profit: Decimal,
}

/// Aggregated result per traded symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    pub asset: String,
    pub profit: Decimal,
    pub trades: usize,
}

/// A snapshot of trading performance over a set of trades.
///
/// This struct is the output of the `AnalyticsEngine`. It is derived fresh on every
/// call and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    // I. Trade Counts
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub break_even_trades: usize,
    /// Share of trades with a strictly positive result, in percent.
    pub win_rate: Decimal,

    // II. Profitability
    pub total_profit: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub profit_factor: Option<Decimal>, // None when there is no gross loss
    pub average_win: Decimal,
    pub average_loss: Decimal,
    pub payoff_ratio: Option<Decimal>, // None when the average loss is 0
    pub expected_value: Decimal,
    pub return_pct: Decimal,
    pub total_withdrawn: Decimal,

    // III. Risk
    /// Maximum peak-to-trough decline of the equity curve, in percent.
    pub max_drawdown: Decimal,
    pub sharpe_ratio: Option<Decimal>, // None for fewer than 2 trades or no dispersion

    // IV. Notable Trades
    pub max_win: Option<Trade>,
    /// Seeded with a zero-result placeholder, so it is never `None` for a non-empty
    /// trade set even when nothing lost money.
    pub max_loss: Option<Trade>,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,

    // V. Distributions
    pub daily_distribution: Vec<DayBucket>,
    pub hourly_distribution: Vec<HourBucket>,
    pub asset_performance: Vec<AssetPerformance>,
    /// Every trade result, ascending.
    pub win_loss_distribution: Vec<Decimal>,
}

impl AnalyticsStats {
    /// The snapshot for an empty trade set: zeroed numbers, `None` ratios, 7 and 24
    /// empty buckets, no assets.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            break_even_trades: 0,
            win_rate: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: None,
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            payoff_ratio: None,
            expected_value: Decimal::ZERO,
            return_pct: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            sharpe_ratio: None,
            max_win: None,
            max_loss: None,
            longest_win_streak: 0,
            longest_loss_streak: 0,
            daily_distribution: day_buckets(&[Decimal::ZERO; 7], &[0; 7]),
            hourly_distribution: hour_buckets(&[Decimal::ZERO; 24]),
            asset_performance: Vec::new(),
            win_loss_distribution: Vec::new(),
        }
    }

    /// The traded day of the week with the highest accumulated result. Days without
    /// trades are never picked, even when every traded day lost money.
    pub fn best_day(&self) -> Option<&DayBucket> {
        self.daily_distribution
            .iter()
            .filter(|b| b.trades > 0)
            .reduce(|best, b| if b.profit > best.profit { b } else { best })
    }
}

impl Default for AnalyticsStats {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn day_buckets(totals: &[Decimal; 7], counts: &[usize; 7]) -> Vec<DayBucket> {
    DAY_NAMES
        .iter()
        .zip(totals.iter().zip(counts.iter()))
        .map(|(day, (profit, trades))| DayBucket {
            day: (*day).to_string(),
            profit: *profit,
            trades: *trades,
        })
        .collect()
}

pub(crate) fn hour_buckets(totals: &[Decimal; 24]) -> Vec<HourBucket> {
    totals
        .iter()
        .enumerate()
        .map(|(hour, profit)| HourBucket {
            hour: hour as u8,
            profit: *profit,
        })
        .collect()
}
