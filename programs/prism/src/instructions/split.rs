//! Quantum split crank, run once at proposal-open time. Permissionless: a
//! second invocation while the same proposal is open fails, so racing
//! callers are safe.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, PROPOSAL_SEED};
use crate::events::MarketSplit;
use crate::logic::split::quantum_split;
use crate::state::{Amm, Proposal};

#[derive(Accounts)]
pub struct QuantumSplit<'info> {
    pub cranker: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        seeds = [PROPOSAL_SEED, amm.key().as_ref(), proposal.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub proposal: Account<'info, Proposal>,
}

pub fn handler(ctx: Context<QuantumSplit>) -> Result<()> {
    let amm_key = ctx.accounts.amm.key();
    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;
    let proposal = &ctx.accounts.proposal;

    let amounts = quantum_split(amm, proposal, now)?;

    emit!(MarketSplit {
        amm: amm_key,
        proposal: proposal.id,
        outcome_count: proposal.outcome_count,
        split_ratio_bps: amm.config.split_ratio_bps,
        live_asset_mirrored: amounts.asset.live,
        transitioning_asset_mirrored: amounts.asset.transitioning,
        timestamp: now,
    });

    Ok(())
}
