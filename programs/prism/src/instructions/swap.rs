//! Spot market swap. Priced against the `live + transitioning` reserves;
//! `withdraw_only` liquidity never participates.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::AMM_SEED;
use crate::error::PrismError;
use crate::events::SpotSwapped;
use crate::state::{Amm, SwapDirection};
use crate::utils::{transfer_from_user, transfer_from_vault};

#[derive(Accounts)]
pub struct Swap<'info> {
    pub trader: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(mut, constraint = trader_asset.mint == amm.asset_mint)]
    pub trader_asset: Account<'info, TokenAccount>,

    #[account(mut, constraint = trader_stable.mint == amm.stable_mint)]
    pub trader_stable: Account<'info, TokenAccount>,

    #[account(mut, address = amm.asset_vault)]
    pub asset_vault: Account<'info, TokenAccount>,

    #[account(mut, address = amm.stable_vault)]
    pub stable_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(
    ctx: Context<Swap>,
    direction: SwapDirection,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<u64> {
    let amm_key = ctx.accounts.amm.key();
    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;

    let lp_fee_bps = amm.config.lp_fee_bps;
    let protocol_fee_bps = amm.config.protocol_fee_bps;
    let amount_out = amm.spot.swap(
        direction,
        amount_in,
        lp_fee_bps,
        protocol_fee_bps,
        now,
    )?;
    require_gte!(amount_out, min_amount_out, PrismError::SlippageExceeded);

    let signer_seeds: &[&[u8]] = &[
        AMM_SEED,
        amm.asset_mint.as_ref(),
        amm.stable_mint.as_ref(),
        &[amm.bump],
    ];
    match direction {
        SwapDirection::Buy => {
            transfer_from_user(
                &ctx.accounts.token_program,
                &ctx.accounts.trader_stable,
                &ctx.accounts.stable_vault,
                &ctx.accounts.trader,
                amount_in,
            )?;
            transfer_from_vault(
                &ctx.accounts.token_program,
                &ctx.accounts.asset_vault,
                &ctx.accounts.trader_asset,
                amm.to_account_info(),
                &[signer_seeds],
                amount_out,
            )?;
        }
        SwapDirection::Sell => {
            transfer_from_user(
                &ctx.accounts.token_program,
                &ctx.accounts.trader_asset,
                &ctx.accounts.asset_vault,
                &ctx.accounts.trader,
                amount_in,
            )?;
            transfer_from_vault(
                &ctx.accounts.token_program,
                &ctx.accounts.stable_vault,
                &ctx.accounts.trader_stable,
                amm.to_account_info(),
                &[signer_seeds],
                amount_out,
            )?;
        }
    }

    emit!(SpotSwapped {
        amm: amm_key,
        trader: ctx.accounts.trader.key(),
        direction,
        amount_in,
        amount_out,
        timestamp: now,
    });

    Ok(amount_out)
}
