//! Program-wide constants for the release curve.

/// Minimum spacing between withdrawals: 30 days.
pub const MONTH_DURATION_SECS: i64 = 2_592_000;

/// Number of entries in the first-year table.
pub const FIRST_YEAR_MONTHS: usize = 12;

/// Months per curve year once the first-year table is exhausted.
pub const MONTHS_PER_YEAR: u64 = 12;

/// Post-first-year payout halves once per this many completed years.
pub const HALVING_PERIOD_YEARS: u64 = 4;

/// First-year payout, as a percentage of the max monthly amount, per month.
pub const FIRST_YEAR_PERCENTAGES: [u64; FIRST_YEAR_MONTHS] =
    [10, 25, 50, 100, 50, 50, 50, 50, 25, 25, 25, 25];

/// Dust threshold in whole tokens; scaled by the mint's decimals.
pub const DUST_THRESHOLD_TOKENS: u64 = 100;

/// PDA seed for the dispenser account.
pub const DISPENSER_SEED: &[u8] = b"dispenser";

/// PDA seed for the vault token account.
pub const VAULT_SEED: &[u8] = b"vault";

/// Domain separator for the curve commitment hash.
pub const CURVE_COMMITMENT_DOMAIN: &[u8] = b"dispenser.curve.v1";
