//! Claims a withdrawable position: pays its exact proportional share of the
//! `WithdrawOnly` bucket and closes the position account.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{AMM_SEED, POSITION_SEED};
use crate::events::WithdrawalClaimed;
use crate::logic::withdraw;
use crate::state::{Amm, LpPosition};
use crate::utils::transfer_from_vault;

#[derive(Accounts)]
pub struct ClaimWithdrawal<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        mut,
        close = owner,
        seeds = [POSITION_SEED, amm.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key(),
    )]
    pub position: Account<'info, LpPosition>,

    #[account(mut, constraint = owner_asset.mint == amm.asset_mint)]
    pub owner_asset: Account<'info, TokenAccount>,

    #[account(mut, constraint = owner_stable.mint == amm.stable_mint)]
    pub owner_stable: Account<'info, TokenAccount>,

    #[account(mut, address = amm.asset_vault)]
    pub asset_vault: Account<'info, TokenAccount>,

    #[account(mut, address = amm.stable_vault)]
    pub stable_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<ClaimWithdrawal>) -> Result<(u64, u64)> {
    let amm_key = ctx.accounts.amm.key();
    let position_key = ctx.accounts.position.key();
    let amm = &mut ctx.accounts.amm;
    let position = &mut ctx.accounts.position;

    let (asset_out, stable_out) = withdraw::claim_withdrawal(amm, position)?;

    let signer_seeds: &[&[u8]] = &[
        AMM_SEED,
        amm.asset_mint.as_ref(),
        amm.stable_mint.as_ref(),
        &[amm.bump],
    ];
    transfer_from_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.asset_vault,
        &ctx.accounts.owner_asset,
        amm.to_account_info(),
        &[signer_seeds],
        asset_out,
    )?;
    transfer_from_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.stable_vault,
        &ctx.accounts.owner_stable,
        amm.to_account_info(),
        &[signer_seeds],
        stable_out,
    )?;

    emit!(WithdrawalClaimed {
        amm: amm_key,
        position: position_key,
        asset_out,
        stable_out,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok((asset_out, stable_out))
}
