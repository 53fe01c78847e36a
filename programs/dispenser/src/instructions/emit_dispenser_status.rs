use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::VAULT_SEED;
use crate::state::DispenserState;

/// Read-only: report every accessor through an event.
pub fn handle_emit_dispenser_status(ctx: Context<EmitDispenserStatus>) -> Result<()> {
    let st = &ctx.accounts.dispenser_state;
    let schedule = &st.schedule;
    let now = Clock::get()?.unix_timestamp;
    let quote = schedule.quote(now)?;

    emit!(DispenserStatus {
        mint: schedule.token(),
        beneficiary: schedule.beneficiary(),
        total_to_distribute: schedule.total_to_distribute(),
        max_monthly_amount: schedule.max_monthly_amount(),
        dust_threshold: schedule.dust_threshold(),
        first_year_schedule: schedule.first_year_schedule(),
        start_moment: schedule.start_moment(),
        total_withdrawn: schedule.total_withdrawn(),
        closed: schedule.is_closed(),
        can_withdraw: schedule.can_withdraw(now),
        next_withdrawal_at: schedule.next_withdrawal_at(),
        quoted_amount: quote.map(|q| q.amount),
        vault_balance: ctx.accounts.vault.amount,
        commitment_ok: st.verify_commitment().is_ok(),
        now,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EmitDispenserStatus<'info> {
    pub dispenser_state: Account<'info, DispenserState>,

    #[account(
        seeds = [VAULT_SEED, dispenser_state.key().as_ref()],
        bump = dispenser_state.vault_bump,
    )]
    pub vault: Account<'info, TokenAccount>,
}

#[event]
pub struct DispenserStatus {
    pub mint: Pubkey,
    pub beneficiary: Pubkey,
    pub total_to_distribute: u64,
    pub max_monthly_amount: u64,
    pub dust_threshold: u64,
    pub first_year_schedule: [u64; 12],
    pub start_moment: i64,
    pub total_withdrawn: u64,
    pub closed: bool,
    pub can_withdraw: bool,
    pub next_withdrawal_at: Option<i64>,
    pub quoted_amount: Option<u64>,
    pub vault_balance: u64,
    pub commitment_ok: bool,
    pub now: i64,
}
