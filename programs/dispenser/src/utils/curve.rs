//! Release curve evaluation. Pure: no clock reads, no mutable state.
//! - period_index = floor(elapsed / month_duration), 0-based
//! - periods 0..12 pay the first-year table
//! - afterwards base = table[11] / 2, halved once per 4 completed post-first-year years
//! - the whole remainder is swept once it reaches the dust threshold, or once the
//!   halved post-first-year amount drops under it

use crate::constants::{
    FIRST_YEAR_MONTHS, FIRST_YEAR_PERCENTAGES, HALVING_PERIOD_YEARS, MONTHS_PER_YEAR,
};
use crate::error::DispenserError;
use crate::schedule::ScheduleConfig;

/// Amount owed for one curve period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    /// 0-based curve period being paid.
    pub period_index: u64,
    /// Base units to transfer.
    pub amount: u64,
    /// True when this payment empties the allocation.
    pub closes: bool,
}

/// Derive the 12-entry first-year table from the max monthly amount.
/// Integer division truncates toward zero.
pub fn first_year_schedule(
    max_monthly_amount: u64,
) -> Result<[u64; FIRST_YEAR_MONTHS], DispenserError> {
    let mut out = [0u64; FIRST_YEAR_MONTHS];
    for (slot, pct) in out.iter_mut().zip(FIRST_YEAR_PERCENTAGES) {
        let v = (max_monthly_amount as u128)
            .checked_mul(pct as u128)
            .ok_or(DispenserError::MathOverflow)?
            / 100;
        *slot = u64::try_from(v).map_err(|_| DispenserError::MathOverflow)?;
    }
    Ok(out)
}

pub fn period_index(elapsed: i64, month_duration: i64) -> Result<u64, DispenserError> {
    if month_duration <= 0 {
        return Err(DispenserError::InvalidConfig);
    }
    if elapsed < 0 {
        return Err(DispenserError::InvalidTimestamp);
    }
    Ok((elapsed / month_duration) as u64)
}

/// Curve amount for a period, ignoring the remaining balance.
pub fn curve_amount(schedule: &[u64; FIRST_YEAR_MONTHS], period_index: u64) -> u64 {
    let first_year = FIRST_YEAR_MONTHS as u64;
    if period_index < first_year {
        return schedule[period_index as usize];
    }
    let years_past_first = (period_index - first_year) / MONTHS_PER_YEAR;
    let halvings = years_past_first / HALVING_PERIOD_YEARS;
    let base = schedule[FIRST_YEAR_MONTHS - 1] / 2;
    // Shifting by 64 or more bits means the payout has halved to nothing.
    u32::try_from(halvings)
        .ok()
        .and_then(|h| base.checked_shr(h))
        .unwrap_or(0)
}

/// Amount owed for the period containing `elapsed`, given what has already been paid.
pub fn amount_owed(
    elapsed: i64,
    config: &ScheduleConfig,
    total_withdrawn: u64,
) -> Result<Payout, DispenserError> {
    let period_index = period_index(elapsed, config.month_duration)?;
    let remaining = config
        .total_to_distribute
        .checked_sub(total_withdrawn)
        .ok_or(DispenserError::MathOverflow)?;
    let curve = curve_amount(&config.first_year_schedule, period_index);

    // The curve only decays once halving starts; first-year entries are always paid as-is.
    let decayed = period_index >= FIRST_YEAR_MONTHS as u64 && curve < config.dust_threshold;
    let amount = if remaining <= config.dust_threshold || decayed {
        remaining
    } else {
        curve.min(remaining)
    };

    Ok(Payout {
        period_index,
        amount,
        closes: amount == remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MONTH_DURATION_SECS;
    use anchor_lang::prelude::Pubkey;

    const MONTH: i64 = MONTH_DURATION_SECS;

    fn config(total: u64) -> ScheduleConfig {
        ScheduleConfig::new(total, 10_000, 0, Pubkey::new_unique(), Pubkey::new_unique())
            .unwrap()
    }

    #[test]
    fn first_year_table_matches_percentages() {
        assert_eq!(
            first_year_schedule(10_000).unwrap(),
            [1000, 2500, 5000, 10000, 5000, 5000, 5000, 5000, 2500, 2500, 2500, 2500]
        );
        // Truncates toward zero.
        assert_eq!(first_year_schedule(15).unwrap()[0], 1);
        assert_eq!(first_year_schedule(15).unwrap()[1], 3);
    }

    #[test]
    fn period_index_is_floor_of_elapsed() {
        assert_eq!(period_index(0, MONTH).unwrap(), 0);
        assert_eq!(period_index(MONTH - 1, MONTH).unwrap(), 0);
        assert_eq!(period_index(MONTH, MONTH).unwrap(), 1);
        assert_eq!(period_index(13 * MONTH + 5, MONTH).unwrap(), 13);
        assert!(matches!(
            period_index(-1, MONTH),
            Err(DispenserError::InvalidTimestamp)
        ));
        assert!(matches!(
            period_index(10, 0),
            Err(DispenserError::InvalidConfig)
        ));
    }

    #[test]
    fn halving_every_four_years_after_first() {
        let table = first_year_schedule(10_000).unwrap();
        assert_eq!(curve_amount(&table, 11), 2500);
        assert_eq!(curve_amount(&table, 12), 1250);
        assert_eq!(curve_amount(&table, 59), 1250);
        assert_eq!(curve_amount(&table, 60), 625);
        assert_eq!(curve_amount(&table, 107), 625);
        assert_eq!(curve_amount(&table, 108), 312);
        assert_eq!(curve_amount(&table, 156), 156);
        assert_eq!(curve_amount(&table, 204), 78);
    }

    #[test]
    fn halving_far_future_reaches_zero() {
        let table = first_year_schedule(10_000).unwrap();
        assert_eq!(curve_amount(&table, 12 + 12 * 4 * 70), 0);
        assert_eq!(curve_amount(&table, u64::MAX), 0);
    }

    #[test]
    fn owed_follows_curve_while_balance_is_large() {
        let cfg = config(700_000);
        let p = amount_owed(3 * MONTH, &cfg, 0).unwrap();
        assert_eq!(
            p,
            Payout {
                period_index: 3,
                amount: 10_000,
                closes: false
            }
        );
    }

    #[test]
    fn owed_capped_at_remaining() {
        let cfg = config(700_000);
        // 5_000 left, curve says 10_000: pay the 5_000 and close.
        let p = amount_owed(3 * MONTH, &cfg, 695_000).unwrap();
        assert_eq!(p.amount, 5_000);
        assert!(p.closes);
    }

    #[test]
    fn remainder_at_or_below_dust_is_swept() {
        let cfg = config(700_000);
        let p = amount_owed(0, &cfg, 700_000 - 100).unwrap();
        assert_eq!(p.amount, 100);
        assert!(p.closes);

        let p = amount_owed(0, &cfg, 700_000 - 101).unwrap();
        assert_eq!(p.amount, 101);
        assert!(p.closes, "101 < curve 1000, so the cap empties it");
    }

    #[test]
    fn decayed_curve_sweeps_everything() {
        let cfg = config(700_000);
        // Period 204 pays 78 < 100 on the curve: the remainder goes in one shot.
        let p = amount_owed(204 * MONTH, &cfg, 160_964).unwrap();
        assert_eq!(p.amount, 539_036);
        assert!(p.closes);

        // Period 203 still pays the curve amount.
        let p = amount_owed(203 * MONTH, &cfg, 160_964).unwrap();
        assert_eq!(p.amount, 156);
        assert!(!p.closes);
    }

    #[test]
    fn small_first_year_entries_are_paid_not_swept() {
        let cfg = ScheduleConfig::new(
            10_000,
            500,
            0,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        )
        .unwrap();
        assert_eq!(cfg.first_year_schedule[0], 50);

        let p = amount_owed(0, &cfg, 0).unwrap();
        assert_eq!(p.amount, 50);
        assert!(!p.closes);

        let p = amount_owed(11 * MONTH, &cfg, 0).unwrap();
        assert_eq!(p.amount, 125);
        assert!(!p.closes);

        // Once halving starts, the 62-unit curve amount is below dust: sweep.
        let p = amount_owed(12 * MONTH, &cfg, 1_000).unwrap();
        assert_eq!(p.amount, 9_000);
        assert!(p.closes);
    }

    #[test]
    fn overdrawn_state_is_an_error() {
        let cfg = config(1_000);
        assert!(matches!(
            amount_owed(0, &cfg, 1_001),
            Err(DispenserError::MathOverflow)
        ));
    }
}
