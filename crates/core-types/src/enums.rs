use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The side a trade was opened on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    #[serde(alias = "Buy", alias = "BUY", alias = "long")]
    Buy,
    #[serde(alias = "Sell", alias = "SELL", alias = "short")]
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "Buy"),
            Direction::Sell => write!(f, "Sell"),
        }
    }
}

/// How a configured amount (profit target, drawdown value) is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    #[serde(alias = "Percentage", alias = "percent")]
    Percentage,
    #[serde(alias = "Fixed")]
    Fixed,
}

impl ValueType {
    /// Turns a configured value into an absolute currency amount.
    ///
    /// `Fixed` values are already amounts; `Percentage` values are taken as a
    /// percentage of `base` (usually the account's initial capital).
    pub fn resolve(&self, value: Decimal, base: Decimal) -> Decimal {
        match self {
            ValueType::Fixed => value,
            ValueType::Percentage => base
                .checked_mul(value)
                .map(|amount| amount / Decimal::ONE_HUNDRED)
                .unwrap_or_else(|| (base / Decimal::ONE_HUNDRED).saturating_mul(value)),
        }
    }
}

/// The drawdown regime a funded account is evaluated under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawdownType {
    /// The loss limit is measured from the fixed initial capital.
    #[default]
    #[serde(alias = "Maximum", alias = "max")]
    Maximum,
    /// The loss limit ratchets upward with the high-water mark.
    #[serde(alias = "Trailing")]
    Trailing,
}

impl fmt::Display for DrawdownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawdownType::Maximum => write!(f, "Maximum"),
            DrawdownType::Trailing => write!(f, "Trailing"),
        }
    }
}
