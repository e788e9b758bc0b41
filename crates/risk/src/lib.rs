//! # Journal Risk Monitor
//!
//! Tracks a funded account's progress toward its profit target and how much of its
//! drawdown allowance has been used, under either a maximum (fixed floor) or a
//! trailing (peak-relative) drawdown regime.

pub mod error;
pub mod monitor;

pub use error::RiskError;
pub use monitor::{
    account_stats, account_stats_by_id, portfolio_stats, AccountRiskMonitor, AccountStats,
    AccountStatus,
};
