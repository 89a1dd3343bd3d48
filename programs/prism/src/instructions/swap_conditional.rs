//! Conditional market swap through the balance ledger. Debits and credits
//! only the two ledger entries for the chosen outcome, whatever the outcome
//! count.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, LEDGER_SEED};
use crate::error::PrismError;
use crate::events::ConditionalSwapped;
use crate::state::{Amm, OutcomeLedger, Side, SwapDirection};

#[derive(Accounts)]
pub struct SwapConditional<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        init_if_needed,
        payer = trader,
        space = 8 + OutcomeLedger::INIT_SPACE,
        seeds = [LEDGER_SEED, amm.key().as_ref(), trader.key().as_ref()],
        bump,
    )]
    pub ledger: Account<'info, OutcomeLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<SwapConditional>,
    outcome: u8,
    direction: SwapDirection,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<u64> {
    let amm_key = ctx.accounts.amm.key();
    let trader_key = ctx.accounts.trader.key();
    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;
    let ledger = &mut ctx.accounts.ledger;

    if ledger.owner == Pubkey::default() {
        ledger.owner = trader_key;
        ledger.amm = amm_key;
        ledger.bump = ctx.bumps.ledger;
    }
    let locked = amm.locked_proposal()?;
    ledger.sync_to(locked)?;

    let lp_fee_bps = amm.config.lp_fee_bps;
    let pool = amm.conditional_mut(outcome)?;

    let (side_in, side_out) = match direction {
        SwapDirection::Buy => (Side::Stable, Side::Asset),
        SwapDirection::Sell => (Side::Asset, Side::Stable),
    };

    // Debit before pricing so an underfunded ledger fails before any pool
    // mutation
    ledger.debit(outcome, side_in, amount_in)?;
    let amount_out = pool.swap(direction, amount_in, lp_fee_bps, now)?;
    require_gte!(amount_out, min_amount_out, PrismError::SlippageExceeded);
    ledger.credit(outcome, side_out, amount_out)?;

    emit!(ConditionalSwapped {
        amm: amm_key,
        trader: trader_key,
        outcome,
        direction,
        amount_in,
        amount_out,
        timestamp: now,
    });

    Ok(amount_out)
}
