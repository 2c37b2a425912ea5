//! In-memory collateral ledger.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::AccountId;
use crate::port::{Ledger, LedgerError};

/// Ledger holding balances in a map behind a single lock.
///
/// Suitable for tests, simulations and embedding; `deposit` mints collateral
/// the way a test-currency faucet would.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<AccountId, u64>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `account`.
    ///
    /// # Errors
    ///
    /// `Overflow` if the balance would exceed `u64::MAX`.
    pub fn deposit(&self, account: &AccountId, amount: u64) -> Result<(), LedgerError> {
        self.credit(account, amount)
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.balances.lock().values().map(|b| u128::from(*b)).sum()
    }
}

impl Ledger for InMemoryLedger {
    fn debit(&self, account: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock();
        let available = balances.get(account).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: account.clone(),
                needed: amount,
                available,
            });
        }
        balances.insert(account.clone(), available - amount);
        Ok(())
    }

    fn credit(&self, account: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock();
        let current = balances.get(account).copied().unwrap_or(0);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow {
                account: account.clone(),
            })?;
        balances.insert(account.clone(), updated);
        Ok(())
    }

    fn balance(&self, account: &AccountId) -> u64 {
        self.balances.lock().get(account).copied().unwrap_or(0)
    }
}
