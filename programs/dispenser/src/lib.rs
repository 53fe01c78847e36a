use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod schedule;
#[cfg(not(target_os = "solana"))]
pub mod shared;
pub mod state;
pub mod utils;

#[cfg(test)]
mod nullables;

pub use instructions::*;

declare_id!("FSkbeUPYmg7M9Ndts6UHt5r3iNKmVpBG3A3VhKjgmFUG");

#[program]
pub mod dispenser {
    use super::*;

    /// Create the dispenser and its vault for one beneficiary and mint.
    /// The schedule starts now.
    pub fn initialize_dispenser(
        ctx: Context<InitializeDispenser>,
        total_to_distribute: u64,
        max_monthly_amount: u64,
    ) -> Result<()> {
        instructions::initialize_dispenser::handle_initialize_dispenser(
            ctx,
            total_to_distribute,
            max_monthly_amount,
        )
    }

    /// Top up the vault from the funder's token account.
    pub fn deposit_tokens(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
        instructions::deposit_tokens::handle_deposit_tokens(ctx, amount)
    }

    /// Pay the beneficiary what the curve owes right now.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handle_withdraw(ctx)
    }

    /// Report the schedule's configuration and status as an event.
    pub fn emit_dispenser_status(ctx: Context<EmitDispenserStatus>) -> Result<()> {
        instructions::emit_dispenser_status::handle_emit_dispenser_status(ctx)
    }
}
