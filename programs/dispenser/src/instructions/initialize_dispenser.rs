use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{DISPENSER_SEED, VAULT_SEED};
use crate::error::DispenserError;
use crate::schedule::{ReleaseSchedule, ScheduleConfig};
use crate::state::DispenserState;

pub fn handle_initialize_dispenser(
    ctx: Context<InitializeDispenser>,
    total_to_distribute: u64,
    max_monthly_amount: u64,
) -> Result<()> {
    let beneficiary = ctx.accounts.beneficiary.key();
    require!(beneficiary != crate::ID, DispenserError::InvalidConfig);
    // PDAs cannot sign, so they can never withdraw.
    require!(
        beneficiary != ctx.accounts.dispenser_state.key(),
        DispenserError::InvalidConfig
    );
    require!(
        beneficiary != ctx.accounts.vault.key(),
        DispenserError::InvalidConfig
    );

    let config = ScheduleConfig::new(
        total_to_distribute,
        max_monthly_amount,
        ctx.accounts.mint.decimals,
        beneficiary,
        ctx.accounts.mint.key(),
    )?;
    let now = Clock::get()?.unix_timestamp;
    let schedule = ReleaseSchedule::new(config, now)?;

    let st = &mut ctx.accounts.dispenser_state;
    st.schedule = schedule;
    st.funder = ctx.accounts.funder.key();
    st.vault = ctx.accounts.vault.key();
    st.curve_commitment = config.commitment();
    st.bump = ctx.bumps.dispenser_state;
    st.vault_bump = ctx.bumps.vault;

    emit!(DispenserInitialized {
        mint: config.token,
        beneficiary,
        funder: st.funder,
        total_to_distribute,
        max_monthly_amount,
        dust_threshold: config.dust_threshold,
        first_year_schedule: config.first_year_schedule,
        start_moment: now,
        curve_commitment: st.curve_commitment,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeDispenser<'info> {
    #[account(
        init,
        payer = funder,
        space = 8 + DispenserState::SIZE,
        seeds = [DISPENSER_SEED, mint.key().as_ref(), beneficiary.key().as_ref()],
        bump
    )]
    pub dispenser_state: Account<'info, DispenserState>,

    #[account(
        init,
        payer = funder,
        token::mint = mint,
        token::authority = dispenser_state,
        seeds = [VAULT_SEED, dispenser_state.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    /// CHECK: only the key is recorded; the beneficiary proves itself by signing `withdraw`.
    pub beneficiary: UncheckedAccount<'info>,

    #[account(mut)]
    pub funder: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct DispenserInitialized {
    pub mint: Pubkey,
    pub beneficiary: Pubkey,
    pub funder: Pubkey,
    pub total_to_distribute: u64,
    pub max_monthly_amount: u64,
    pub dust_threshold: u64,
    pub first_year_schedule: [u64; 12],
    pub start_moment: i64,
    pub curve_commitment: [u8; 32],
}
