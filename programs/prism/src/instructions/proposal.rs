//! Proposal boundary instructions. Voting and outcome determination live in
//! external governance; these record its lifecycle signals so the market
//! cranks have an account to read.

use anchor_lang::prelude::*;

use crate::constants::{AMM_SEED, MAX_OUTCOMES, PROPOSAL_SEED};
use crate::error::PrismError;
use crate::state::{Amm, Proposal, ProposalState};

#[derive(Accounts)]
#[instruction(proposal_id: u64)]
pub struct OpenProposal<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
        constraint = amm.authority == authority.key() @ PrismError::Unauthorized,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        init,
        payer = authority,
        space = 8 + Proposal::INIT_SPACE,
        seeds = [PROPOSAL_SEED, amm.key().as_ref(), proposal_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub proposal: Account<'info, Proposal>,

    pub system_program: Program<'info, System>,
}

pub fn open_handler(
    ctx: Context<OpenProposal>,
    proposal_id: u64,
    outcome_count: u8,
) -> Result<()> {
    require!(
        outcome_count >= 2 && (outcome_count as usize) <= MAX_OUTCOMES,
        PrismError::OutcomeOutOfRange
    );

    let proposal = &mut ctx.accounts.proposal;
    proposal.id = proposal_id;
    proposal.outcome_count = outcome_count;
    proposal.state = ProposalState::Active;
    proposal.winning_outcome = None;
    proposal.created_at_ts = Clock::get()?.unix_timestamp;

    Ok(())
}

#[derive(Accounts)]
pub struct ResolveProposal<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
        constraint = amm.authority == authority.key() @ PrismError::Unauthorized,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        mut,
        seeds = [PROPOSAL_SEED, amm.key().as_ref(), proposal.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub proposal: Account<'info, Proposal>,
}

pub fn resolve_handler(ctx: Context<ResolveProposal>, winning_outcome: u8) -> Result<()> {
    let proposal = &mut ctx.accounts.proposal;
    proposal.require_active()?;
    require_gt!(
        proposal.outcome_count,
        winning_outcome,
        PrismError::OutcomeOutOfRange
    );

    proposal.state = ProposalState::Resolved;
    proposal.winning_outcome = Some(winning_outcome);

    Ok(())
}
