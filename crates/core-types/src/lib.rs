//! # Journal Core Types
//!
//! Layer 0 of the workspace: the read-only records the analytics layer consumes.
//! Their lifecycle is owned by whatever store the caller uses; nothing in here
//! performs I/O.

pub mod enums;
pub mod error;
pub mod filters;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, DrawdownType, ValueType};
pub use error::CoreError;
pub use filters::{trades_for_account, trades_for_strategy, withdrawals_for_account};
pub use structs::{Account, CapitalReconciliation, Trade, Withdrawal};
