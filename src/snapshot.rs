use anyhow::{Context, Result};
use core_types::{Account, Trade, Withdrawal};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The journal's records as exported by the surrounding application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        tracing::info!(
            accounts = snapshot.accounts.len(),
            trades = snapshot.trades.len(),
            withdrawals = snapshot.withdrawals.len(),
            "Loaded journal snapshot."
        );
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        snapshot.report_invalid_records();
        Ok(snapshot)
    }

    pub fn account(&self, account_id: &str) -> Result<&Account> {
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .with_context(|| format!("Account '{}' is not in the snapshot", account_id))
    }

    /// Logs every record that fails validation and returns how many did. The engine
    /// still receives them.
    pub fn report_invalid_records(&self) -> usize {
        let failures = self
            .accounts
            .iter()
            .map(|a| (a.id.as_str(), a.validate()))
            .chain(self.trades.iter().map(|t| (t.id.as_str(), t.validate())))
            .chain(self.withdrawals.iter().map(|w| (w.id.as_str(), w.validate())))
            .filter_map(|(id, result)| result.err().map(|e| (id, e)));

        let mut count = 0;
        for (id, error) in failures {
            tracing::warn!(record = %id, error = %error, "Snapshot record failed validation.");
            count += 1;
        }
        count
    }
}
