//! Burns live LP for its proportional share of the live reserves. Only legal
//! from the `Live` bucket while no proposal is open; exits during a proposal
//! go through the withdrawal state machine instead.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{AMM_SEED, POSITION_SEED};
use crate::error::PrismError;
use crate::events::LiquidityRemoved;
use crate::state::{Amm, Bucket, LpPosition};
use crate::utils::transfer_from_vault;
use crate::utils::SafeMath;

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
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

pub fn handler(
    ctx: Context<RemoveLiquidity>,
    lp_amount: u64,
    min_asset: u64,
    min_stable: u64,
) -> Result<(u64, u64)> {
    let amm_key = ctx.accounts.amm.key();
    let amm = &mut ctx.accounts.amm;
    let position = &mut ctx.accounts.position;

    // While a proposal is open the position's backing is spread across the
    // conditional markets; direct removal would double-count it.
    require!(amm.proposal.is_none(), PrismError::ProposalStillActive);
    require!(
        position.bucket == Bucket::Live && !position.withdraw_requested,
        PrismError::InvalidBucketTransition
    );
    require_gte!(
        position.amount,
        lp_amount,
        PrismError::InsufficientLiquidity
    );

    let (asset_out, stable_out) = amm.spot.remove_from_live(lp_amount)?;
    require_gte!(asset_out, min_asset, PrismError::SlippageExceeded);
    require_gte!(stable_out, min_stable, PrismError::SlippageExceeded);

    // Minimum-liquidity floor on what remains in the trading buckets
    let asset_floor = amm.config.min_liquidity.floor_for(amm.spot.asset.total)?;
    let stable_floor = amm.config.min_liquidity.floor_for(amm.spot.stable.total)?;
    require_gte!(
        amm.spot.asset.live,
        asset_floor,
        PrismError::LiquidityBelowMinimum
    );
    require_gte!(
        amm.spot.stable.live,
        stable_floor,
        PrismError::LiquidityBelowMinimum
    );

    position.amount = position.amount.safe_sub(lp_amount)?;

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

    emit!(LiquidityRemoved {
        amm: amm_key,
        owner: ctx.accounts.owner.key(),
        lp_burned: lp_amount,
        asset_out,
        stable_out,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok((asset_out, stable_out))
}
