//! Supplies both sides of the pair to the spot market. Minted LP is always
//! credited to the `Live` bucket; the position account is created on first
//! deposit and topped up afterwards.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{AMM_SEED, POSITION_SEED};
use crate::error::PrismError;
use crate::events::LiquidityAdded;
use crate::state::{Amm, Bucket, LpPosition};
use crate::utils::transfer_from_user;
use crate::utils::SafeMath;

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + LpPosition::INIT_SPACE,
        seeds = [POSITION_SEED, amm.key().as_ref(), owner.key().as_ref()],
        bump,
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
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<AddLiquidity>,
    asset_in: u64,
    stable_in: u64,
    min_lp: u64,
) -> Result<u64> {
    let amm_key = ctx.accounts.amm.key();
    let amm = &mut ctx.accounts.amm;
    let position = &mut ctx.accounts.position;

    if position.amount == 0 && !position.withdraw_requested {
        // Fresh (or never-used) position account
        position.owner = ctx.accounts.owner.key();
        position.amm = amm_key;
        position.bucket = Bucket::Live;
        position.locked_proposal = None;
        position.bump = ctx.bumps.position;
    }
    // A position that has asked to exit cannot be topped up; the LP opens a
    // new cycle after claiming.
    require!(
        position.bucket == Bucket::Live && !position.withdraw_requested,
        PrismError::InvalidBucketTransition
    );

    let lp_minted = amm.spot.add_liquidity(asset_in, stable_in)?;
    require_gte!(lp_minted, min_lp, PrismError::SlippageExceeded);
    position.amount = position.amount.safe_add(lp_minted)?;

    transfer_from_user(
        &ctx.accounts.token_program,
        &ctx.accounts.owner_asset,
        &ctx.accounts.asset_vault,
        &ctx.accounts.owner,
        asset_in,
    )?;
    transfer_from_user(
        &ctx.accounts.token_program,
        &ctx.accounts.owner_stable,
        &ctx.accounts.stable_vault,
        &ctx.accounts.owner,
        stable_in,
    )?;

    emit!(LiquidityAdded {
        amm: amm_key,
        owner: ctx.accounts.owner.key(),
        asset_in,
        stable_in,
        lp_minted,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(lp_minted)
}
