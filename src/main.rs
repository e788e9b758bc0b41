use analytics::{build_equity_curve, AnalyticsEngine};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{init_logging, load_config, load_config_from, Config, ReportFormat};
use core_types::{trades_for_account, trades_for_strategy, withdrawals_for_account};
use risk::{account_stats_by_id, portfolio_stats};
use serde::Serialize;
use std::path::PathBuf;

mod render;
mod snapshot;

use render::Renderer;
use snapshot::Snapshot;

/// The main entry point for the trading journal command line.
fn main() -> Result<()> {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path, true)?,
        None => load_config()?,
    };
    init_logging(&config.logging)?;

    let snapshot = Snapshot::load(&cli.snapshot)?;
    let output = Output {
        format: cli.format.unwrap_or(config.report.format),
        renderer: Renderer::new(config.report.decimals),
    };

    // Execute the appropriate command
    match cli.command {
        Commands::Analytics(args) => handle_analytics(args, &snapshot, &config, &output),
        Commands::Equity(args) => handle_equity(args, &snapshot, &output),
        Commands::Risk(args) => handle_risk(args, &snapshot, &output),
        Commands::Reconcile => handle_reconcile(&snapshot, &output),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics and funded-account risk tracking for a trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Journal snapshot (JSON with `accounts`, `trades` and `withdrawals`).
    #[arg(long, short, global = true, default_value = "journal.json")]
    snapshot: PathBuf,

    /// Configuration file. Defaults to an optional `config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format. Overrides `report.format` from the configuration.
    #[arg(long, global = true, value_enum)]
    format: Option<ReportFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate performance statistics.
    Analytics(AnalyticsArgs),
    /// Running balance of one account.
    Equity(EquityArgs),
    /// Profit target and drawdown progress of one or all accounts.
    Risk(RiskArgs),
    /// Check each account's stored capital against its history.
    Reconcile,
}

#[derive(Parser)]
struct AnalyticsArgs {
    /// Restrict to one account and start from its initial capital.
    #[arg(long)]
    account: Option<String>,

    /// Restrict to trades tagged with this strategy.
    #[arg(long)]
    strategy: Option<String>,

    /// Starting capital when no account is given.
    #[arg(long, default_value = "0")]
    initial_capital: rust_decimal::Decimal,
}

#[derive(Parser)]
struct EquityArgs {
    /// The account whose curve to build.
    #[arg(long)]
    account: String,
}

#[derive(Parser)]
struct RiskArgs {
    /// Only this account. All accounts when omitted.
    #[arg(long)]
    account: Option<String>,
}

// ==============================================================================
// Output
// ==============================================================================

struct Output {
    format: ReportFormat,
    renderer: Renderer,
}

impl Output {
    /// Prints `value` as pretty JSON or as the tables built by `tables`.
    fn emit<T, F>(&self, value: &T, tables: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&Renderer) -> Vec<comfy_table::Table>,
    {
        match self.format {
            ReportFormat::Json => {
                let json = serde_json::to_string_pretty(value).context("Failed to encode report")?;
                println!("{}", json);
            }
            ReportFormat::Table => {
                for table in tables(&self.renderer) {
                    println!("{}", table);
                }
            }
        }
        Ok(())
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_analytics(
    args: AnalyticsArgs,
    snapshot: &Snapshot,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let engine = AnalyticsEngine::with_offset(config.analytics.offset()?);

    let (mut trades, withdrawals, initial_capital) = match &args.account {
        Some(id) => {
            let account = snapshot.account(id)?;
            (
                trades_for_account(&snapshot.trades, id),
                withdrawals_for_account(&snapshot.withdrawals, id),
                account.initial_capital,
            )
        }
        None => (
            snapshot.trades.clone(),
            snapshot.withdrawals.clone(),
            args.initial_capital,
        ),
    };

    if let Some(strategy) = &args.strategy {
        trades = trades_for_strategy(&trades, strategy);
    }

    let stats = engine.calculate(&trades, initial_capital, &withdrawals);
    output.emit(&stats, |r| r.analytics(&stats))
}

fn handle_equity(args: EquityArgs, snapshot: &Snapshot, output: &Output) -> Result<()> {
    let account = snapshot.account(&args.account)?;
    let trades = trades_for_account(&snapshot.trades, &account.id);
    let withdrawals = withdrawals_for_account(&snapshot.withdrawals, &account.id);

    let curve = build_equity_curve(&trades, account.initial_capital, Some(account), &withdrawals);
    output.emit(&curve, |r| vec![r.equity(&curve)])
}

fn handle_risk(args: RiskArgs, snapshot: &Snapshot, output: &Output) -> Result<()> {
    let stats = match &args.account {
        Some(id) => vec![account_stats_by_id(&snapshot.accounts, id, &snapshot.trades)?],
        None => portfolio_stats(&snapshot.accounts, &snapshot.trades),
    };
    output.emit(&stats, |r| vec![r.risk(&stats)])
}

fn handle_reconcile(snapshot: &Snapshot, output: &Output) -> Result<()> {
    let rows: Vec<_> = snapshot
        .accounts
        .iter()
        .map(|a| a.reconcile(&snapshot.trades, &snapshot.withdrawals))
        .collect();
    output.emit(&rows, |r| vec![r.reconciliation(&rows)])
}
