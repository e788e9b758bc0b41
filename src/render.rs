use analytics::{AnalyticsStats, EquityDataPoint, PointDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::CapitalReconciliation;
use risk::{AccountStats, AccountStatus};
use rust_decimal::Decimal;

/// Renders engine output as terminal tables.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    decimals: usize,
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

impl Renderer {
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals: decimals as usize,
        }
    }

    fn num(&self, value: Decimal) -> String {
        format!("{:.*}", self.decimals, value)
    }

    fn pct(&self, value: Decimal) -> String {
        format!("{:.*}%", self.decimals, value)
    }

    fn opt(&self, value: Option<Decimal>) -> String {
        value.map(|v| self.num(v)).unwrap_or_else(|| "n/a".to_string())
    }

    /// Summary, per-asset and per-weekday tables.
    pub fn analytics(&self, stats: &AnalyticsStats) -> Vec<Table> {
        let mut summary = new_table(vec!["Metric", "Value"]);
        let rows = [
            ("Total trades", stats.total_trades.to_string()),
            (
                "Wins / Losses / Break-even",
                format!(
                    "{} / {} / {}",
                    stats.winning_trades, stats.losing_trades, stats.break_even_trades
                ),
            ),
            ("Win rate", self.pct(stats.win_rate)),
            ("Total profit", self.num(stats.total_profit)),
            ("Gross profit", self.num(stats.gross_profit)),
            ("Gross loss", self.num(stats.gross_loss)),
            ("Profit factor", self.opt(stats.profit_factor)),
            ("Average win", self.num(stats.average_win)),
            ("Average loss", self.num(stats.average_loss)),
            ("Payoff ratio", self.opt(stats.payoff_ratio)),
            ("Expected value", self.num(stats.expected_value)),
            ("Return", self.pct(stats.return_pct)),
            ("Total withdrawn", self.num(stats.total_withdrawn)),
            ("Max drawdown", self.pct(stats.max_drawdown)),
            ("Sharpe ratio", self.opt(stats.sharpe_ratio)),
            ("Best trade", self.opt(stats.max_win.as_ref().map(|t| t.result))),
            ("Worst trade", self.opt(stats.max_loss.as_ref().map(|t| t.result))),
            ("Longest win streak", stats.longest_win_streak.to_string()),
            ("Longest loss streak", stats.longest_loss_streak.to_string()),
            (
                "Best day",
                stats
                    .best_day()
                    .map(|d| d.day.clone())
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
        ];
        for (metric, value) in rows {
            summary.add_row(vec![metric.to_string(), value]);
        }

        let mut assets = new_table(vec!["Asset", "Trades", "Profit"]);
        for asset in &stats.asset_performance {
            assets.add_row(vec![
                asset.asset.clone(),
                asset.trades.to_string(),
                self.num(asset.profit),
            ]);
        }

        let mut days = new_table(vec!["Day", "Trades", "Profit"]);
        for bucket in &stats.daily_distribution {
            days.add_row(vec![
                bucket.day.clone(),
                bucket.trades.to_string(),
                self.num(bucket.profit),
            ]);
        }

        let mut hours = new_table(vec!["Hour", "Profit"]);
        for bucket in stats.hourly_distribution.iter().filter(|b| !b.profit.is_zero()) {
            hours.add_row(vec![format!("{:02}:00", bucket.hour), self.num(bucket.profit)]);
        }

        vec![summary, assets, days, hours]
    }

    pub fn equity(&self, curve: &[EquityDataPoint]) -> Table {
        let trailing = curve.iter().any(|p| p.trailing_drawdown.is_some());
        let mut header = vec!["Date", "Equity"];
        if trailing {
            header.push("Trailing threshold");
        }
        let mut table = new_table(header);

        for point in curve {
            let date = match point.date {
                PointDate::Initial => "Initial".to_string(),
                PointDate::At(date) => date.format("%Y-%m-%d %H:%M").to_string(),
            };
            let mut row = vec![date, self.num(point.equity)];
            if trailing {
                row.push(self.opt(point.trailing_drawdown));
            }
            table.add_row(row);
        }
        table
    }

    pub fn risk(&self, stats: &[AccountStats]) -> Table {
        let mut table = new_table(vec![
            "Account",
            "Trades",
            "Balance",
            "Profit",
            "Target",
            "Target progress",
            "Drawdown",
            "Limit",
            "Drawdown used",
            "Floor",
            "Status",
        ]);
        for s in stats {
            let status = match s.status {
                AccountStatus::Active => "Active",
                AccountStatus::TargetReached => "Target reached",
                AccountStatus::Breached => "Breached",
            };
            table.add_row(vec![
                s.account_id.clone(),
                s.trade_count.to_string(),
                self.num(s.current_balance),
                self.num(s.current_profit),
                self.num(s.profit_target_value),
                self.pct(s.profit_progress),
                self.num(s.current_drawdown_amount),
                self.num(s.drawdown_limit_value),
                self.pct(s.drawdown_progress),
                self.num(s.drawdown_floor),
                status.to_string(),
            ]);
        }
        table
    }

    pub fn reconciliation(&self, rows: &[CapitalReconciliation]) -> Table {
        let mut table = new_table(vec!["Account", "Recorded", "Expected", "Difference", "OK"]);
        for r in rows {
            table.add_row(vec![
                r.account_id.clone(),
                self.num(r.recorded),
                self.num(r.expected),
                self.num(r.discrepancy),
                if r.is_consistent() { "yes" } else { "NO" }.to_string(),
            ]);
        }
        table
    }
}
