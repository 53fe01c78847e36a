use anchor_lang::prelude::*;

/// Custom error codes for the token dispenser program.
#[error_code]
pub enum DispenserError {
    #[msg("Unauthorized: beneficiary signature required")]
    Unauthorized,

    #[msg("Unauthorized: funder signature required")]
    UnauthorizedFunder,

    #[msg("Withdrawal not allowed yet (interval not elapsed or dispenser closed)")]
    TooSoon,

    #[msg("Token transfer failed")]
    TransferFailure,

    #[msg("Invalid configuration")]
    InvalidConfig,

    #[msg("Invalid public key")]
    InvalidPubkey,

    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Invalid associated token account for beneficiary")]
    InvalidBeneficiaryAta,

    #[msg("Deposit would exceed the undistributed allocation")]
    OverDeposit,

    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance,

    #[msg("Stored curve commitment does not match the schedule")]
    CurveCommitmentMismatch,

    #[msg("Math overflow")]
    MathOverflow,
}
