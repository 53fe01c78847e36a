//! Host-side wrapper for running a schedule outside the Solana runtime.
//!
//! On-chain, the runtime serializes every instruction touching the dispenser
//! account. Off-chain there is no such guarantee, so `withdraw` holds the write
//! lock across gate check, transfer and commit.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anchor_lang::prelude::Pubkey;

use crate::error::DispenserError;
use crate::schedule::{Ledger, ReleaseSchedule};
use crate::utils::curve::Payout;

#[derive(Debug)]
pub struct SharedSchedule {
    inner: RwLock<ReleaseSchedule>,
}

impl SharedSchedule {
    pub fn new(schedule: ReleaseSchedule) -> Self {
        Self {
            inner: RwLock::new(schedule),
        }
    }

    /// Withdraw as a single critical section. The ledger must not call back
    /// into this schedule while the transfer is pending.
    pub fn withdraw<L: Ledger>(
        &self,
        caller: &Pubkey,
        now: i64,
        ledger: &mut L,
    ) -> Result<Payout, DispenserError> {
        self.write().withdraw(caller, now, ledger)
    }

    pub fn can_withdraw(&self, now: i64) -> bool {
        self.read().can_withdraw(now)
    }

    pub fn quote(&self, now: i64) -> Result<Option<Payout>, DispenserError> {
        self.read().quote(now)
    }

    /// Consistent copy of config and state.
    pub fn snapshot(&self) -> ReleaseSchedule {
        *self.read()
    }

    // A panic while holding the lock cannot leave the schedule half-updated:
    // state is only written after the transfer has succeeded.
    fn read(&self) -> RwLockReadGuard<'_, ReleaseSchedule> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReleaseSchedule> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::constants::MONTH_DURATION_SECS;
    use crate::nullables::NullLedger;
    use crate::schedule::ScheduleConfig;

    const START: i64 = 1_700_000_000;

    #[test]
    fn concurrent_withdrawals_pay_a_period_once() {
        let beneficiary = Pubkey::new_unique();
        let config =
            ScheduleConfig::new(700_000, 10_000, 0, beneficiary, Pubkey::new_unique()).unwrap();
        let shared = Arc::new(SharedSchedule::new(
            ReleaseSchedule::new(config, START).unwrap(),
        ));
        let now = START + MONTH_DURATION_SECS;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let mut ledger = NullLedger::new(700_000);
                    let res = shared.withdraw(&beneficiary, now, &mut ledger);
                    (res, ledger.paid_to(&beneficiary))
                })
            })
            .collect();

        let mut successes = 0;
        let mut paid = 0;
        for h in handles {
            let (res, p) = h.join().unwrap();
            match res {
                Ok(payout) => {
                    successes += 1;
                    assert_eq!(payout.amount, 1000);
                }
                Err(e) => assert!(matches!(e, DispenserError::TooSoon)),
            }
            paid += p;
        }
        assert_eq!(successes, 1);
        assert_eq!(paid, 1000);

        let snap = shared.snapshot();
        assert_eq!(snap.total_withdrawn(), 1000);
        assert!(!shared.can_withdraw(now));
        assert_eq!(shared.quote(now).unwrap(), None);
    }
}
