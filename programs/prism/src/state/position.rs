//! Liquidity position state
//!
//! One account per provider per market. The position records how much LP it
//! owns and which bucket that LP currently sits in; the withdrawal state
//! machine in `logic::withdraw` is the only writer of `bucket` and
//! `withdraw_requested`.

use anchor_lang::prelude::*;

use crate::state::bucket::Bucket;

#[account]
#[derive(InitSpace)]
pub struct LpPosition {
    /// Owner of the position
    pub owner: Pubkey,

    /// Market this position belongs to
    pub amm: Pubkey,

    /// LP amount, denominated in the market's LP supply units
    pub amount: u64,

    /// Proposal the position is locked to, if a withdrawal was requested
    /// while that proposal was open
    pub locked_proposal: Option<u64>,

    /// Set once the owner requests withdrawal; never cleared
    pub withdraw_requested: bool,

    /// Bucket the position's LP currently sits in
    pub bucket: Bucket,

    /// Canonical bump for the position PDA
    pub bump: u8,
}

impl LpPosition {
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}
