use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("No account with id '{0}' in the supplied account list.")]
    AccountNotFound(String),
}
