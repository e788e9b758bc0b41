//! # Journal Analytics Engine
//!
//! This crate turns logged trades and withdrawals into equity curves, drawdown figures
//! and aggregate performance statistics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage or
//!   presentation. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every entry point takes its inputs by reference and
//!   returns a fresh value. Nothing is cached and no input is mutated.
//! - **Total Functions:** Empty inputs and zero denominators produce zeroed or `None`
//!   fields instead of errors.
//!
//! ## Public API
//!
//! - `build_equity_curve` / `EquityCurveBuilder`: the running balance, with an optional
//!   trailing drawdown line.
//! - `max_drawdown_percent`: the deepest peak-to-trough decline of a curve.
//! - `compute_analytics` / `AnalyticsEngine`: the `AnalyticsStats` snapshot.

pub mod drawdown;
pub mod engine;
pub mod equity;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use drawdown::{max_drawdown_amount, max_drawdown_percent};
pub use engine::{compute_account_analytics, compute_analytics, AnalyticsEngine};
pub use equity::{build_equity_curve, final_equity, EquityCurveBuilder, EquityDataPoint, PointDate};
pub use report::{AnalyticsStats, AssetPerformance, DayBucket, HourBucket, DAY_NAMES};
