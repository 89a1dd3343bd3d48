//! Creates a market for an asset/stable pair: the spot pool, its token
//! vaults, and the configuration every later operation prices against.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{AMM_SEED, ASSET_VAULT_SEED, STABLE_VAULT_SEED};
use crate::state::{Amm, AmmConfig, SpotPool, TwapOracle};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: recorded as the market authority; never signs here
    pub authority: UncheckedAccount<'info>,

    pub asset_mint: Account<'info, Mint>,
    pub stable_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        space = 8 + Amm::INIT_SPACE,
        seeds = [AMM_SEED, asset_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump,
    )]
    pub amm: Account<'info, Amm>,

    #[account(
        init,
        payer = payer,
        token::mint = asset_mint,
        token::authority = amm,
        seeds = [ASSET_VAULT_SEED, amm.key().as_ref()],
        bump,
    )]
    pub asset_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = payer,
        token::mint = stable_mint,
        token::authority = amm,
        seeds = [STABLE_VAULT_SEED, amm.key().as_ref()],
        bump,
    )]
    pub stable_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, config: AmmConfig) -> Result<()> {
    config.validate()?;

    let now = Clock::get()?.unix_timestamp;
    let amm = &mut ctx.accounts.amm;

    amm.authority = ctx.accounts.authority.key();
    amm.asset_mint = ctx.accounts.asset_mint.key();
    amm.stable_mint = ctx.accounts.stable_mint.key();
    amm.asset_vault = ctx.accounts.asset_vault.key();
    amm.stable_vault = ctx.accounts.stable_vault.key();
    amm.config = config;
    amm.spot = SpotPool::new(TwapOracle::new(
        now,
        config.twap_initial_observation,
        config.twap_max_observation_change,
        config.twap_start_delay_secs,
    ));
    amm.conditionals = Vec::new();
    amm.proposal = None;
    amm.last_crank_ts = 0;
    amm.bump = ctx.bumps.amm;

    Ok(())
}
