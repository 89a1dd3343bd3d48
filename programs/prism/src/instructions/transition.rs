//! Standalone transition crank: migrates still-pending `Transitioning`
//! balances to `WithdrawOnly` once the locked proposal has resolved, without
//! running the full recombine path. Converges to the same bucket state.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, PROPOSAL_SEED};
use crate::events::PendingTransitioned;
use crate::logic::recombine::transition_pending;
use crate::state::{Amm, Proposal};

#[derive(Accounts)]
pub struct TransitionPending<'info> {
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

pub fn handler(ctx: Context<TransitionPending>) -> Result<()> {
    let amm_key = ctx.accounts.amm.key();
    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;
    let proposal = &ctx.accounts.proposal;

    amm.check_crank_interval(now)?;
    let (asset_settled, stable_settled, lp_settled) = transition_pending(amm, proposal)?;
    amm.last_crank_ts = now;

    emit!(PendingTransitioned {
        amm: amm_key,
        proposal: proposal.id,
        asset_settled,
        stable_settled,
        lp_settled,
        timestamp: now,
    });

    Ok(())
}
