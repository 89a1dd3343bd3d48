//! Marks a position for withdrawal. With no proposal open the position's
//! share moves straight to `WithdrawOnly`; during a proposal it moves to
//! `Transitioning` and keeps trading until recombination.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, POSITION_SEED};
use crate::events::WithdrawalRequested;
use crate::logic::withdraw;
use crate::state::{Amm, LpPosition};

#[derive(Accounts)]
pub struct RequestWithdrawal<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        mut,
        seeds = [POSITION_SEED, amm.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key(),
    )]
    pub position: Account<'info, LpPosition>,
}

pub fn handler(ctx: Context<RequestWithdrawal>) -> Result<()> {
    let amm_key = ctx.accounts.amm.key();
    let position_key = ctx.accounts.position.key();
    let amm = &mut ctx.accounts.amm;
    let position = &mut ctx.accounts.position;

    let landed_in = withdraw::mark_for_withdrawal(amm, position)?;

    emit!(WithdrawalRequested {
        amm: amm_key,
        position: position_key,
        amount: position.amount,
        landed_in,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
