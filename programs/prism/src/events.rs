//! Protocol events
//!
//! One event per externally visible state change, emitted by the
//! instruction handlers.

use anchor_lang::prelude::*;

use crate::state::bucket::Bucket;
use crate::state::spot::SwapDirection;

#[event]
pub struct LiquidityAdded {
    pub amm: Pubkey,
    pub owner: Pubkey,
    pub asset_in: u64,
    pub stable_in: u64,
    pub lp_minted: u64,
    pub timestamp: i64,
}

#[event]
pub struct LiquidityRemoved {
    pub amm: Pubkey,
    pub owner: Pubkey,
    pub lp_burned: u64,
    pub asset_out: u64,
    pub stable_out: u64,
    pub timestamp: i64,
}

#[event]
pub struct SpotSwapped {
    pub amm: Pubkey,
    pub trader: Pubkey,
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub amount_out: u64,
    pub timestamp: i64,
}

#[event]
pub struct ConditionalSwapped {
    pub amm: Pubkey,
    pub trader: Pubkey,
    pub outcome: u8,
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub amount_out: u64,
    pub timestamp: i64,
}

#[event]
pub struct WithdrawalRequested {
    pub amm: Pubkey,
    pub position: Pubkey,
    pub amount: u64,
    pub landed_in: Bucket,
    pub timestamp: i64,
}

#[event]
pub struct WithdrawalClaimed {
    pub amm: Pubkey,
    pub position: Pubkey,
    pub asset_out: u64,
    pub stable_out: u64,
    pub timestamp: i64,
}

#[event]
pub struct MarketSplit {
    pub amm: Pubkey,
    pub proposal: u64,
    pub outcome_count: u8,
    pub split_ratio_bps: u16,
    pub live_asset_mirrored: u64,
    pub transitioning_asset_mirrored: u64,
    pub timestamp: i64,
}

#[event]
pub struct MarketRecombined {
    pub amm: Pubkey,
    pub proposal: u64,
    pub winning_outcome: u8,
    pub timestamp: i64,
}

#[event]
pub struct PendingTransitioned {
    pub amm: Pubkey,
    pub proposal: u64,
    pub asset_settled: u64,
    pub stable_settled: u64,
    pub lp_settled: u64,
    pub timestamp: i64,
}

#[event]
pub struct CompleteSetMinted {
    pub amm: Pubkey,
    pub owner: Pubkey,
    pub side: crate::state::balances::Side,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct CompleteSetBurned {
    pub amm: Pubkey,
    pub owner: Pubkey,
    pub side: crate::state::balances::Side,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct LedgerRedeemed {
    pub amm: Pubkey,
    pub owner: Pubkey,
    pub proposal: u64,
    pub asset_out: u64,
    pub stable_out: u64,
    pub timestamp: i64,
}

#[event]
pub struct ArbitrageExecuted {
    pub amm: Pubkey,
    pub cranker: Pubkey,
    pub amount_in: u64,
    pub profit: u64,
    pub timestamp: i64,
}
