use crate::enums::{Direction, DrawdownType, ValueType};
use crate::error::CoreError;
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single closed trade as logged in the journal.
///
/// `result` is the realized profit or loss in account currency. Its sign is the only
/// thing the analytics look at to classify a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
    pub date: DateTime<Utc>,
    pub asset: String,
    pub direction: Direction,
    #[serde(default)]
    pub lot_size: Decimal,
    #[serde(default)]
    pub take_profit_pips: Decimal,
    #[serde(default)]
    pub stop_loss_pips: Decimal,
    pub result: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Manual override of the hour the trade was taken (0-23).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
}

impl Trade {
    /// The synthetic trade used to seed the "largest loss" search.
    ///
    /// Only `result` is meaningful; every other field is empty.
    pub fn zero_result_placeholder() -> Self {
        Self {
            id: String::new(),
            account_id: String::new(),
            strategy_id: None,
            date: DateTime::<Utc>::default(),
            asset: String::new(),
            direction: Direction::default(),
            lot_size: Decimal::ZERO,
            take_profit_pips: Decimal::ZERO,
            stop_loss_pips: Decimal::ZERO,
            result: Decimal::ZERO,
            notes: None,
            image_ref: None,
            hour: None,
        }
    }

    /// Strictly positive result.
    pub fn is_win(&self) -> bool {
        self.result > Decimal::ZERO
    }

    /// Strictly negative result. Break-even trades are neither wins nor losses here.
    pub fn is_loss(&self) -> bool {
        self.result < Decimal::ZERO
    }

    /// The hour the trade is attributed to: the manual override when it is a valid
    /// hour, otherwise the hour of `date` in the given offset.
    pub fn effective_hour(&self, offset: &FixedOffset) -> usize {
        match self.hour {
            Some(h) if h < 24 => h as usize,
            _ => self.date.with_timezone(offset).hour() as usize,
        }
    }

    /// Day of the week of `date` in the given offset, 0 = Sunday.
    pub fn weekday_index(&self, offset: &FixedOffset) -> usize {
        self.date
            .with_timezone(offset)
            .weekday()
            .num_days_from_sunday() as usize
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::invalid("trade.id", "must not be empty"));
        }
        if self.asset.trim().is_empty() {
            return Err(CoreError::invalid("trade.asset", "must not be empty"));
        }
        if let Some(h) = self.hour {
            if h > 23 {
                return Err(CoreError::invalid(
                    "trade.hour",
                    format!("{} is outside 0-23", h),
                ));
            }
        }
        if self.lot_size.is_sign_negative() {
            return Err(CoreError::invalid("trade.lotSize", "must not be negative"));
        }
        Ok(())
    }
}

/// Capital taken out of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: String,
    pub account_id: String,
    /// Always positive; the curve is reduced by this amount.
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl Withdrawal {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::invalid(
                "withdrawal.amount",
                format!("{} must be positive", self.amount),
            ));
        }
        Ok(())
    }
}

/// A trading account, typically a funded (prop firm) challenge with a profit target
/// and a drawdown limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub initial_capital: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub current_capital: Decimal,
    #[serde(default)]
    pub profit_target: Decimal,
    #[serde(default)]
    pub profit_target_type: ValueType,
    #[serde(default)]
    pub drawdown_type: DrawdownType,
    #[serde(default)]
    pub drawdown_value: Decimal,
    #[serde(default)]
    pub drawdown_value_type: ValueType,
    #[serde(default)]
    pub total_withdrawn: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Account {
    /// The profit target as an absolute amount.
    pub fn profit_target_value(&self) -> Decimal {
        self.profit_target_type
            .resolve(self.profit_target, self.initial_capital)
    }

    /// The drawdown limit as an absolute amount.
    pub fn drawdown_limit_value(&self) -> Decimal {
        self.drawdown_value_type
            .resolve(self.drawdown_value, self.initial_capital)
    }

    /// Whether the equity curve should carry a trailing threshold line.
    pub fn uses_trailing_drawdown(&self) -> bool {
        self.drawdown_type == DrawdownType::Trailing && self.drawdown_value > Decimal::ZERO
    }

    /// Display label: the name if set, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Recomputes what `current_capital` should be from this account's trades and
    /// withdrawals. Records belonging to other accounts are ignored.
    pub fn expected_current_capital(&self, trades: &[Trade], withdrawals: &[Withdrawal]) -> Decimal {
        let traded = trades
            .iter()
            .filter(|t| t.account_id == self.id)
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.result));
        let withdrawn = withdrawals
            .iter()
            .filter(|w| w.account_id == self.id)
            .fold(Decimal::ZERO, |acc, w| acc.saturating_add(w.amount));
        self.initial_capital.saturating_add(traded).saturating_sub(withdrawn)
    }

    /// Compares the stored `current_capital` with the recomputed value.
    pub fn reconcile(&self, trades: &[Trade], withdrawals: &[Withdrawal]) -> CapitalReconciliation {
        let expected = self.expected_current_capital(trades, withdrawals);
        let reconciliation = CapitalReconciliation {
            account_id: self.id.clone(),
            recorded: self.current_capital,
            expected,
            discrepancy: self.current_capital.saturating_sub(expected),
        };
        if !reconciliation.is_consistent() {
            tracing::warn!(
                account_id = %self.id,
                recorded = %self.current_capital,
                expected = %expected,
                "Stored capital does not match trade and withdrawal history."
            );
        }
        reconciliation
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.initial_capital.is_sign_negative() {
            return Err(CoreError::invalid("account.initialCapital", "must not be negative"));
        }
        if self.profit_target.is_sign_negative() {
            return Err(CoreError::invalid("account.profitTarget", "must not be negative"));
        }
        if self.drawdown_value.is_sign_negative() {
            return Err(CoreError::invalid("account.drawdownValue", "must not be negative"));
        }
        if self.total_withdrawn.is_sign_negative() {
            return Err(CoreError::invalid("account.totalWithdrawn", "must not be negative"));
        }
        Ok(())
    }
}

/// Result of checking an account's stored capital against its history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalReconciliation {
    pub account_id: String,
    pub recorded: Decimal,
    pub expected: Decimal,
    /// `recorded - expected`.
    pub discrepancy: Decimal,
}

impl CapitalReconciliation {
    pub fn is_consistent(&self) -> bool {
        self.discrepancy.is_zero()
    }
}
