//! Single-beneficiary release schedule.
//!
//! `ReleaseSchedule` owns the immutable curve configuration and the mutable
//! withdrawal bookkeeping. Time is always passed in; nothing here reads a clock.
//! A withdrawal transfers first and commits second, so a failed transfer
//! leaves the schedule exactly as it was.

use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize, Pubkey};

use crate::constants::{
    CURVE_COMMITMENT_DOMAIN, DUST_THRESHOLD_TOKENS, FIRST_YEAR_MONTHS, MONTH_DURATION_SECS,
};
use crate::error::DispenserError;
use crate::utils::curve::{self, Payout};

/// Why a ledger transfer did not go through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferError {
    InsufficientFunds,
    Other,
}

/// Fungible-token ledger holding the dispenser's allocation.
pub trait Ledger {
    /// Move `amount` base units to `to`. `Ok` is final and irreversible.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), TransferError>;
}

/// Curve parameters fixed at creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Full allocation ever payable.
    pub total_to_distribute: u64,
    /// Reference unit for the first-year percentages.
    pub max_monthly_amount: u64,
    /// At or below this remainder, pay everything and close.
    pub dust_threshold: u64,
    /// Index 0 = first month's amount.
    pub first_year_schedule: [u64; FIRST_YEAR_MONTHS],
    /// Minimum spacing between withdrawals, in seconds.
    pub month_duration: i64,
    pub beneficiary: Pubkey,
    /// Mint of the token being dispensed.
    pub token: Pubkey,
}

impl ScheduleConfig {
    pub const SIZE: usize =
        8 +                      // total_to_distribute
        8 +                      // max_monthly_amount
        8 +                      // dust_threshold
        8 * FIRST_YEAR_MONTHS +  // first_year_schedule
        8 +                      // month_duration
        32 +                     // beneficiary
        32;                      // token

    /// Build the reference curve. `decimals` scales the dust threshold to
    /// 100 whole tokens.
    pub fn new(
        total_to_distribute: u64,
        max_monthly_amount: u64,
        decimals: u8,
        beneficiary: Pubkey,
        token: Pubkey,
    ) -> Result<Self, DispenserError> {
        if total_to_distribute == 0 || max_monthly_amount == 0 {
            return Err(DispenserError::InvalidConfig);
        }
        if beneficiary == Pubkey::default() || token == Pubkey::default() {
            return Err(DispenserError::InvalidPubkey);
        }
        let unit = 10u64
            .checked_pow(decimals as u32)
            .ok_or(DispenserError::MathOverflow)?;
        let dust_threshold = DUST_THRESHOLD_TOKENS
            .checked_mul(unit)
            .ok_or(DispenserError::MathOverflow)?;

        Ok(Self {
            total_to_distribute,
            max_monthly_amount,
            dust_threshold,
            first_year_schedule: curve::first_year_schedule(max_monthly_amount)?,
            month_duration: MONTH_DURATION_SECS,
            beneficiary,
            token,
        })
    }

    /// blake3 digest binding every curve parameter, so an observer can check
    /// the schedule was never altered after creation.
    pub fn commitment(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CURVE_COMMITMENT_DOMAIN);
        hasher.update(&self.total_to_distribute.to_le_bytes());
        hasher.update(&self.max_monthly_amount.to_le_bytes());
        hasher.update(&self.dust_threshold.to_le_bytes());
        // Native byte order; every target this runs on is little-endian.
        hasher.update(bytemuck::cast_slice::<u64, u8>(&self.first_year_schedule[..]));
        hasher.update(&self.month_duration.to_le_bytes());
        hasher.update(self.beneficiary.as_ref());
        hasher.update(self.token.as_ref());
        *hasher.finalize().as_bytes()
    }
}

/// Mutable bookkeeping, only ever changed by a successful withdrawal.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleState {
    pub start_moment: i64,
    pub total_withdrawn: u64,
    /// Moment of the last successful withdrawal; `start_moment` before the first.
    pub last_withdrawal: i64,
    pub closed: bool,
}

impl ScheduleState {
    pub const SIZE: usize = 8 + 8 + 8 + 1;
}

/// The release schedule engine.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseSchedule {
    config: ScheduleConfig,
    state: ScheduleState,
}

impl ReleaseSchedule {
    pub const SIZE: usize = ScheduleConfig::SIZE + ScheduleState::SIZE;

    /// Start a schedule at `now`.
    pub fn new(config: ScheduleConfig, now: i64) -> Result<Self, DispenserError> {
        if now < 0 {
            return Err(DispenserError::InvalidTimestamp);
        }
        if config.month_duration <= 0 {
            return Err(DispenserError::InvalidConfig);
        }
        Ok(Self {
            config,
            state: ScheduleState {
                start_moment: now,
                total_withdrawn: 0,
                last_withdrawal: now,
                closed: false,
            },
        })
    }

    /// True when a withdrawal at `now` would pass the gate.
    pub fn can_withdraw(&self, now: i64) -> bool {
        self.next_withdrawal_at().is_some_and(|at| now >= at)
    }

    /// Earliest moment the gate opens again; `None` once closed.
    pub fn next_withdrawal_at(&self) -> Option<i64> {
        if self.state.closed {
            return None;
        }
        self.state
            .last_withdrawal
            .checked_add(self.config.month_duration)
    }

    /// What a withdrawal at `now` would pay, or `None` if the gate is shut.
    ///
    /// A withdrawal settles the most recently completed curve period, so the
    /// first one (one `month_duration` after start) pays period 0.
    pub fn quote(&self, now: i64) -> Result<Option<Payout>, DispenserError> {
        if !self.can_withdraw(now) {
            return Ok(None);
        }
        let settled = now
            .checked_sub(self.state.start_moment)
            .and_then(|elapsed| elapsed.checked_sub(self.config.month_duration))
            .ok_or(DispenserError::MathOverflow)?;
        curve::amount_owed(settled, &self.config, self.state.total_withdrawn).map(Some)
    }

    /// Pay the beneficiary what is owed at `now`.
    ///
    /// Fails with `Unauthorized` before looking at time, `TooSoon` when gated or
    /// closed, and `TransferFailure` if the ledger refuses; none of these
    /// touch state.
    pub fn withdraw<L: Ledger>(
        &mut self,
        caller: &Pubkey,
        now: i64,
        ledger: &mut L,
    ) -> Result<Payout, DispenserError> {
        if *caller != self.config.beneficiary {
            return Err(DispenserError::Unauthorized);
        }
        let payout = self.quote(now)?.ok_or(DispenserError::TooSoon)?;
        let total_withdrawn = self
            .state
            .total_withdrawn
            .checked_add(payout.amount)
            .ok_or(DispenserError::MathOverflow)?;

        ledger
            .transfer(&self.config.beneficiary, payout.amount)
            .map_err(|_| DispenserError::TransferFailure)?;

        self.state.total_withdrawn = total_withdrawn;
        self.state.last_withdrawal = now;
        self.state.closed = payout.closes;
        Ok(payout)
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn total_to_distribute(&self) -> u64 {
        self.config.total_to_distribute
    }

    pub fn max_monthly_amount(&self) -> u64 {
        self.config.max_monthly_amount
    }

    pub fn dust_threshold(&self) -> u64 {
        self.config.dust_threshold
    }

    pub fn first_year_schedule(&self) -> [u64; FIRST_YEAR_MONTHS] {
        self.config.first_year_schedule
    }

    pub fn month_duration(&self) -> i64 {
        self.config.month_duration
    }

    pub fn beneficiary(&self) -> Pubkey {
        self.config.beneficiary
    }

    pub fn token(&self) -> Pubkey {
        self.config.token
    }

    pub fn start_moment(&self) -> i64 {
        self.state.start_moment
    }

    pub fn total_withdrawn(&self) -> u64 {
        self.state.total_withdrawn
    }

    /// Allocation not yet paid out.
    pub fn remaining(&self) -> u64 {
        self.config
            .total_to_distribute
            .saturating_sub(self.state.total_withdrawn)
    }

    pub fn last_withdrawal(&self) -> i64 {
        self.state.last_withdrawal
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed
    }

    pub fn curve_commitment(&self) -> [u8; 32] {
        self.config.commitment()
    }
}
