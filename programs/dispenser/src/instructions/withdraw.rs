use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{DISPENSER_SEED, VAULT_SEED};
use crate::error::DispenserError;
use crate::schedule::{Ledger, TransferError};
use crate::state::DispenserState;

pub fn handle_withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    let mint = ctx.accounts.dispenser_state.schedule.token();
    let beneficiary = ctx.accounts.dispenser_state.schedule.beneficiary();
    require_keys_eq!(caller, beneficiary, DispenserError::Unauthorized);
    ctx.accounts.dispenser_state.verify_commitment()?;

    let expected_ata = expected_ata_address(&beneficiary, &mint);
    require_keys_eq!(
        ctx.accounts.beneficiary_ata.key(),
        expected_ata,
        DispenserError::InvalidBeneficiaryAta
    );
    require_keys_eq!(
        ctx.accounts.beneficiary_ata.mint,
        mint,
        DispenserError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.beneficiary_ata.owner,
        beneficiary,
        DispenserError::InvalidTokenAccount
    );

    let now = Clock::get()?.unix_timestamp;

    let bump = [ctx.accounts.dispenser_state.bump];
    let seeds: &[&[u8]] = &[DISPENSER_SEED, mint.as_ref(), beneficiary.as_ref(), &bump];
    let signer_seeds: &[&[&[u8]]] = &[seeds];
    let mut ledger = VaultLedger {
        token_program: ctx.accounts.token_program.to_account_info(),
        vault: ctx.accounts.vault.to_account_info(),
        destination: ctx.accounts.beneficiary_ata.to_account_info(),
        authority: ctx.accounts.dispenser_state.to_account_info(),
        available: ctx.accounts.vault.amount,
        signer_seeds,
    };

    let st = &mut ctx.accounts.dispenser_state;
    let payout = st.schedule.withdraw(&caller, now, &mut ledger)?;
    if payout.closes {
        msg!("dispenser closed after paying the remaining {}", payout.amount);
    }

    emit!(TokensWithdrawn {
        beneficiary,
        period_index: payout.period_index,
        amount: payout.amount,
        total_withdrawn: st.schedule.total_withdrawn(),
        closed: st.schedule.is_closed(),
        withdrawn_at: now,
    });

    Ok(())
}

/// SPL-token ledger backed by the dispenser vault, signed by the dispenser PDA.
struct VaultLedger<'a, 'info> {
    token_program: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    destination: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    available: u64,
    signer_seeds: &'a [&'a [&'a [u8]]],
}

impl Ledger for VaultLedger<'_, '_> {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> std::result::Result<(), TransferError> {
        if self.available < amount {
            msg!(
                "vault holds {} but {} is owed to {}",
                self.available,
                amount,
                to
            );
            return Err(TransferError::InsufficientFunds);
        }

        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault.clone(),
                    to: self.destination.clone(),
                    authority: self.authority.clone(),
                },
                self.signer_seeds,
            ),
            amount,
        )
        .map_err(|e| {
            msg!("vault transfer to {} failed: {:?}", to, e);
            TransferError::Other
        })?;

        self.available -= amount;
        Ok(())
    }
}

fn expected_ata_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let seeds: &[&[u8]] = &[
        owner.as_ref(),
        anchor_spl::token::ID.as_ref(),
        mint.as_ref(),
    ];
    let (ata, _) = Pubkey::find_program_address(seeds, &anchor_spl::associated_token::ID);
    ata
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub dispenser_state: Account<'info, DispenserState>,

    #[account(
        mut,
        seeds = [VAULT_SEED, dispenser_state.key().as_ref()],
        bump = dispenser_state.vault_bump,
        constraint = vault.mint == dispenser_state.schedule.token() @ DispenserError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub beneficiary_ata: Account<'info, TokenAccount>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensWithdrawn {
    pub beneficiary: Pubkey,
    pub period_index: u64,
    pub amount: u64,
    pub total_withdrawn: u64,
    pub closed: bool,
    pub withdrawn_at: i64,
}
