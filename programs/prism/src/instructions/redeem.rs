//! Post-resolution ledger redemption: the winning outcome's balances convert
//! to vault tokens at par, everything else is dust and is swept. The ledger
//! account closes once resolved to zero.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{AMM_SEED, LEDGER_SEED, PROPOSAL_SEED};
use crate::error::PrismError;
use crate::events::LedgerRedeemed;
use crate::state::{Amm, OutcomeLedger, Proposal};
use crate::utils::transfer_from_vault;

#[derive(Accounts)]
pub struct RedeemLedger<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        seeds = [PROPOSAL_SEED, amm.key().as_ref(), proposal.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub proposal: Account<'info, Proposal>,

    #[account(
        mut,
        close = owner,
        seeds = [LEDGER_SEED, amm.key().as_ref(), owner.key().as_ref()],
        bump = ledger.bump,
        constraint = ledger.owner == owner.key(),
    )]
    pub ledger: Account<'info, OutcomeLedger>,

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

pub fn handler(ctx: Context<RedeemLedger>) -> Result<()> {
    let amm_key = ctx.accounts.amm.key();
    let owner_key = ctx.accounts.owner.key();
    let amm = &ctx.accounts.amm;
    let proposal = &ctx.accounts.proposal;
    let ledger = &mut ctx.accounts.ledger;

    require_eq!(ledger.proposal_id, proposal.id, PrismError::ProposalMismatch);
    let winning_outcome = proposal.resolved_winner()?;

    let (asset_out, stable_out) = ledger.redeem_resolved(winning_outcome)?;

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

    emit!(LedgerRedeemed {
        amm: amm_key,
        owner: owner_key,
        proposal: proposal.id,
        asset_out,
        stable_out,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
