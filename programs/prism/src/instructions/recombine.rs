//! Recombination crank, run once the proposal has resolved. Permissionless
//! and idempotent: once the conditional markets are torn down further calls
//! are a no-op. Rate-limited so racing crankers cannot spin the market.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, PROPOSAL_SEED};
use crate::events::MarketRecombined;
use crate::logic::recombine::begin_recombine;
use crate::state::{Amm, Proposal};

#[derive(Accounts)]
pub struct Recombine<'info> {
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

pub fn handler(ctx: Context<Recombine>, winning_outcome: u8) -> Result<()> {
    let amm_key = ctx.accounts.amm.key();
    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;
    let proposal = &ctx.accounts.proposal;

    match begin_recombine(amm, proposal, winning_outcome)? {
        Some(recombination) => {
            amm.check_crank_interval(now)?;
            recombination.finish(amm)?;
            amm.last_crank_ts = now;

            emit!(MarketRecombined {
                amm: amm_key,
                proposal: proposal.id,
                winning_outcome,
                timestamp: now,
            });
        }
        None => {
            // Already recombined; a repeat crank is a no-op, not an error
            msg!("recombine: market already recombined");
        }
    }

    Ok(())
}
