use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::VAULT_SEED;
use crate::error::DispenserError;
use crate::state::DispenserState;

pub fn handle_deposit_tokens(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
    require!(amount > 0, DispenserError::InvalidConfig);

    let st = &ctx.accounts.dispenser_state;
    require_keys_eq!(
        ctx.accounts.funder.key(),
        st.funder,
        DispenserError::UnauthorizedFunder
    );
    require_keys_eq!(
        ctx.accounts.funder_token_account.mint,
        st.schedule.token(),
        DispenserError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.funder_token_account.owner,
        ctx.accounts.funder.key(),
        DispenserError::InvalidTokenAccount
    );

    // The vault never needs more than what is still undistributed.
    let post = (ctx.accounts.vault.amount as u128)
        .checked_add(amount as u128)
        .ok_or(DispenserError::MathOverflow)?;
    require!(
        post <= st.schedule.remaining() as u128,
        DispenserError::OverDeposit
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder_token_account.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    ctx.accounts.vault.reload()?;

    emit!(TokensDeposited {
        funder: st.funder,
        amount,
        vault_balance: ctx.accounts.vault.amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct DepositTokens<'info> {
    pub dispenser_state: Account<'info, DispenserState>,

    #[account(
        mut,
        seeds = [VAULT_SEED, dispenser_state.key().as_ref()],
        bump = dispenser_state.vault_bump,
        constraint = vault.mint == dispenser_state.schedule.token() @ DispenserError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub funder: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensDeposited {
    pub funder: Pubkey,
    pub amount: u64,
    pub vault_balance: u64,
}
