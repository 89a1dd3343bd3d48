//! Permissionless arbitrage crank. Profit accrues to the protocol fee
//! balance; per-outcome remainders stay in the protocol-owned ledger as
//! dust. May interleave arbitrarily with user swaps, so unlike the
//! lifecycle cranks it carries no rate limit.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, ARB_LEDGER_SEED};
use crate::events::ArbitrageExecuted;
use crate::logic::arbitrage;
use crate::state::{Amm, OutcomeLedger};

#[derive(Accounts)]
pub struct CrankArbitrage<'info> {
    #[account(mut)]
    pub cranker: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    /// Protocol-owned dust ledger for the engine
    #[account(
        init_if_needed,
        payer = cranker,
        space = 8 + OutcomeLedger::INIT_SPACE,
        seeds = [ARB_LEDGER_SEED, amm.key().as_ref()],
        bump,
    )]
    pub ledger: Account<'info, OutcomeLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CrankArbitrage>, max_input: u64) -> Result<u64> {
    let amm_key = ctx.accounts.amm.key();
    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;
    let ledger = &mut ctx.accounts.ledger;

    if ledger.owner == Pubkey::default() {
        ledger.owner = amm_key;
        ledger.amm = amm_key;
        ledger.bump = ctx.bumps.ledger;
    }
    let locked = amm.locked_proposal()?;
    if ledger.proposal_id != locked.id {
        // Dust from a previous proposal is worthless after resolution and is
        // forfeited to the vault
        ledger.sweep_dust();
    }
    ledger.sync_to(locked)?;

    let result = arbitrage::execute(amm, ledger, max_input)?;

    emit!(ArbitrageExecuted {
        amm: amm_key,
        cranker: ctx.accounts.cranker.key(),
        amount_in: result.amount_in,
        profit: result.profit,
        timestamp: now,
    });

    Ok(result.profit)
}
