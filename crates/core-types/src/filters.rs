use crate::structs::{Trade, Withdrawal};

/// Trades logged against the given account, in input order.
pub fn trades_for_account(trades: &[Trade], account_id: &str) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| t.account_id == account_id)
        .cloned()
        .collect()
}

/// Trades tagged with the given strategy, in input order.
pub fn trades_for_strategy(trades: &[Trade], strategy_id: &str) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| t.strategy_id.as_deref() == Some(strategy_id))
        .cloned()
        .collect()
}

/// Withdrawals taken from the given account, in input order.
pub fn withdrawals_for_account(withdrawals: &[Withdrawal], account_id: &str) -> Vec<Withdrawal> {
    withdrawals
        .iter()
        .filter(|w| w.account_id == account_id)
        .cloned()
        .collect()
}
