//! Nullable ledger: deterministic in-memory stand-in for the SPL vault.

use anchor_lang::prelude::Pubkey;

use crate::schedule::{Ledger, TransferError};

/// Holds a balance and records every successful transfer.
/// Never touches an account or a runtime.
#[derive(Debug, Default)]
pub struct NullLedger {
    balance: u64,
    transfers: Vec<(Pubkey, u64)>,
    fail_next: Option<TransferError>,
}

impl NullLedger {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// Make the next transfer fail with `err`, whatever the balance.
    pub fn fail_next(&mut self, err: TransferError) {
        self.fail_next = Some(err);
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn transfers(&self) -> &[(Pubkey, u64)] {
        &self.transfers
    }

    /// Sum of everything sent to `to`.
    pub fn paid_to(&self, to: &Pubkey) -> u64 {
        self.transfers
            .iter()
            .filter(|(k, _)| k == to)
            .map(|(_, a)| *a)
            .sum()
    }
}

impl Ledger for NullLedger {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), TransferError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds)?;
        self.transfers.push((*to, amount));
        Ok(())
    }
}
