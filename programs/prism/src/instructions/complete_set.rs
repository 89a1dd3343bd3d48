//! Complete-set conversion between vault tokens and ledger balances. One
//! spot-side unit converts to one ledger unit on that side of every outcome
//! simultaneously; burning requires the full set back. Partial sets stay in
//! the ledger as dust until completed or swept.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{AMM_SEED, LEDGER_SEED};
use crate::error::PrismError;
use crate::events::{CompleteSetBurned, CompleteSetMinted};
use crate::state::{Amm, OutcomeLedger, Side};
use crate::utils::{transfer_from_user, transfer_from_vault};

#[derive(Accounts)]
pub struct MintCompleteSet<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
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

    #[account(mut, constraint = trader_asset.mint == amm.asset_mint)]
    pub trader_asset: Account<'info, TokenAccount>,

    #[account(mut, constraint = trader_stable.mint == amm.stable_mint)]
    pub trader_stable: Account<'info, TokenAccount>,

    #[account(mut, address = amm.asset_vault)]
    pub asset_vault: Account<'info, TokenAccount>,

    #[account(mut, address = amm.stable_vault)]
    pub stable_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn mint_handler(ctx: Context<MintCompleteSet>, side: Side, amount: u64) -> Result<()> {
    require!(amount > 0, PrismError::ZeroAmount);

    let amm_key = ctx.accounts.amm.key();
    let trader_key = ctx.accounts.trader.key();
    let amm = &ctx.accounts.amm;
    let ledger = &mut ctx.accounts.ledger;

    if ledger.owner == Pubkey::default() {
        ledger.owner = trader_key;
        ledger.amm = amm_key;
        ledger.bump = ctx.bumps.ledger;
    }
    let locked = amm.locked_proposal()?;
    ledger.sync_to(locked)?;

    ledger.mint_complete_set(side, amount)?;

    let (from, vault) = match side {
        Side::Asset => (&ctx.accounts.trader_asset, &ctx.accounts.asset_vault),
        Side::Stable => (&ctx.accounts.trader_stable, &ctx.accounts.stable_vault),
    };
    transfer_from_user(
        &ctx.accounts.token_program,
        from,
        vault,
        &ctx.accounts.trader,
        amount,
    )?;

    emit!(CompleteSetMinted {
        amm: amm_key,
        owner: trader_key,
        side,
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct BurnCompleteSet<'info> {
    pub trader: Signer<'info>,

    #[account(
        seeds = [AMM_SEED, amm.asset_mint.as_ref(), amm.stable_mint.as_ref()],
        bump = amm.bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, amm.key().as_ref(), trader.key().as_ref()],
        bump = ledger.bump,
        constraint = ledger.owner == trader.key(),
    )]
    pub ledger: Account<'info, OutcomeLedger>,

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

pub fn burn_handler(ctx: Context<BurnCompleteSet>, side: Side, amount: u64) -> Result<()> {
    require!(amount > 0, PrismError::ZeroAmount);

    let amm_key = ctx.accounts.amm.key();
    let trader_key = ctx.accounts.trader.key();
    let amm = &ctx.accounts.amm;
    let ledger = &mut ctx.accounts.ledger;

    let locked = amm.locked_proposal()?;
    require_eq!(ledger.proposal_id, locked.id, PrismError::ProposalMismatch);

    ledger.burn_complete_set(side, amount)?;

    let signer_seeds: &[&[u8]] = &[
        AMM_SEED,
        amm.asset_mint.as_ref(),
        amm.stable_mint.as_ref(),
        &[amm.bump],
    ];
    let (vault, to) = match side {
        Side::Asset => (&ctx.accounts.asset_vault, &ctx.accounts.trader_asset),
        Side::Stable => (&ctx.accounts.stable_vault, &ctx.accounts.trader_stable),
    };
    transfer_from_vault(
        &ctx.accounts.token_program,
        vault,
        to,
        amm.to_account_info(),
        &[signer_seeds],
        amount,
    )?;

    emit!(CompleteSetBurned {
        amm: amm_key,
        owner: trader_key,
        side,
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
