//! Prism: a conditional-liquidity AMM for futarchy governance markets.
//!
//! Liquidity providers supply one spot market per asset/stable pair. When a
//! governance proposal opens, the spot liquidity is mirrored into an
//! independent market per outcome (the quantum split) so trading happens on
//! every outcome simultaneously without multiplying the capital required.
//! When the proposal resolves, the winning outcome's liquidity recombines
//! into the spot market and losing-outcome liquidity is forfeited. Providers
//! may request withdrawal at any point in the cycle without disturbing
//! in-flight trading.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod logic;
pub mod state;
pub mod utils;

use instructions::*;
use state::{AmmConfig, Side, SwapDirection};

declare_id!("Pr1smProtoco1111111111111111111111111111111");

#[program]
pub mod prism {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, config: AmmConfig) -> Result<()> {
        instructions::initialize::handler(ctx, config)
    }

    // Liquidity provision
    pub fn add_liquidity(
        ctx: Context<AddLiquidity>,
        asset_in: u64,
        stable_in: u64,
        min_lp: u64,
    ) -> Result<u64> {
        instructions::liquidity_add::handler(ctx, asset_in, stable_in, min_lp)
    }

    pub fn remove_liquidity(
        ctx: Context<RemoveLiquidity>,
        lp_amount: u64,
        min_asset: u64,
        min_stable: u64,
    ) -> Result<(u64, u64)> {
        instructions::liquidity_remove::handler(ctx, lp_amount, min_asset, min_stable)
    }

    // Trading
    pub fn swap(
        ctx: Context<Swap>,
        direction: SwapDirection,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64> {
        instructions::swap::handler(ctx, direction, amount_in, min_amount_out)
    }

    pub fn swap_conditional(
        ctx: Context<SwapConditional>,
        outcome: u8,
        direction: SwapDirection,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64> {
        instructions::swap_conditional::handler(ctx, outcome, direction, amount_in, min_amount_out)
    }

    pub fn mint_complete_set(ctx: Context<MintCompleteSet>, side: Side, amount: u64) -> Result<()> {
        instructions::complete_set::mint_handler(ctx, side, amount)
    }

    pub fn burn_complete_set(ctx: Context<BurnCompleteSet>, side: Side, amount: u64) -> Result<()> {
        instructions::complete_set::burn_handler(ctx, side, amount)
    }

    pub fn redeem_ledger(ctx: Context<RedeemLedger>) -> Result<()> {
        instructions::redeem::handler(ctx)
    }

    // Withdrawal state machine
    pub fn mark_for_withdrawal(ctx: Context<RequestWithdrawal>) -> Result<()> {
        instructions::withdraw_request::handler(ctx)
    }

    pub fn claim_withdrawal(ctx: Context<ClaimWithdrawal>) -> Result<(u64, u64)> {
        instructions::withdraw_claim::handler(ctx)
    }

    // Proposal boundary (outcome determination is external governance)
    pub fn open_proposal(
        ctx: Context<OpenProposal>,
        proposal_id: u64,
        outcome_count: u8,
    ) -> Result<()> {
        instructions::proposal::open_handler(ctx, proposal_id, outcome_count)
    }

    pub fn resolve_proposal(ctx: Context<ResolveProposal>, winning_outcome: u8) -> Result<()> {
        instructions::proposal::resolve_handler(ctx, winning_outcome)
    }

    // Proposal lifecycle cranks
    pub fn quantum_split(ctx: Context<QuantumSplit>) -> Result<()> {
        instructions::split::handler(ctx)
    }

    pub fn recombine(ctx: Context<Recombine>, winning_outcome: u8) -> Result<()> {
        instructions::recombine::handler(ctx, winning_outcome)
    }

    pub fn transition_pending(ctx: Context<TransitionPending>) -> Result<()> {
        instructions::transition::handler(ctx)
    }

    pub fn crank_arbitrage(ctx: Context<CrankArbitrage>, max_input: u64) -> Result<u64> {
        instructions::arbitrage::handler(ctx, max_input)
    }
}

#[cfg(test)]
mod tests;
