//! Collateral ledger port.

use thiserror::Error;

use crate::domain::AccountId;
use crate::error::EngineError;

/// Failures reported by a ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account {account} has {available}, needs {needed}")]
    InsufficientFunds {
        account: AccountId,
        needed: u64,
        available: u64,
    },

    #[error("balance of {account} would overflow")]
    Overflow { account: AccountId },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        EngineError::PaymentFailed {
            reason: err.to_string(),
        }
    }
}

/// External balances of traders in the collateral currency.
///
/// Each call must be atomic on its own: it either moves the full amount or
/// fails without effect. Markets invoke the ledger after validating a trade
/// and before mutating their own state, and only mutate if the call
/// succeeds, so the pair behaves as one all-or-nothing step.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Calls are made while a market lock is held and must not block on I/O
pub trait Ledger: Send + Sync {
    /// Take `amount` from `account`.
    fn debit(&self, account: &AccountId, amount: u64) -> Result<(), LedgerError>;

    /// Give `amount` to `account`.
    fn credit(&self, account: &AccountId, amount: u64) -> Result<(), LedgerError>;

    /// Current balance of `account`; zero for unknown accounts.
    fn balance(&self, account: &AccountId) -> u64;
}
