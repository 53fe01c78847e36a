use anchor_lang::prelude::*;

use crate::error::DispenserError;
use crate::schedule::ReleaseSchedule;

/// Dispenser PDA: one per (mint, beneficiary).
#[account]
pub struct DispenserState {
    /// Curve, clock origin and withdrawal bookkeeping.
    pub schedule: ReleaseSchedule,
    /// Account that created and funds the dispenser.
    pub funder: Pubkey,
    /// Vault token account (PDA, authority = this account).
    pub vault: Pubkey,
    /// blake3 commitment to the curve, recorded at creation.
    pub curve_commitment: [u8; 32],
    pub bump: u8,
    pub vault_bump: u8,
}

impl DispenserState {
    pub const SIZE: usize =
        ReleaseSchedule::SIZE + // schedule
        32 +                    // funder
        32 +                    // vault
        32 +                    // curve_commitment
        1 +                     // bump
        1;                      // vault_bump

    pub fn verify_commitment(&self) -> std::result::Result<(), DispenserError> {
        if self.schedule.curve_commitment() != self.curve_commitment {
            return Err(DispenserError::CurveCommitmentMismatch);
        }
        Ok(())
    }
}
