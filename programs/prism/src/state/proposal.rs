//! Proposal boundary state
//!
//! The proposal lifecycle (voting, outcome determination) lives outside this
//! program; this account is the read-only surface the market consumes:
//! `outcome_count` at split time, `winning_outcome` and the resolved signal
//! at recombination time.

use anchor_lang::prelude::*;

use crate::error::PrismError;

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProposalState {
    Active,
    Resolved,
}

#[account]
#[derive(InitSpace)]
pub struct Proposal {
    pub id: u64,
    pub outcome_count: u8,
    pub state: ProposalState,
    pub winning_outcome: Option<u8>,
    pub created_at_ts: i64,
}

impl Proposal {
    pub fn require_active(&self) -> Result<()> {
        require!(
            self.state == ProposalState::Active,
            PrismError::ProposalNotActive
        );
        Ok(())
    }

    /// The finalized winning outcome; errors until resolution.
    pub fn resolved_winner(&self) -> Result<u8> {
        require!(
            self.state == ProposalState::Resolved,
            PrismError::ProposalNotResolved
        );
        self.winning_outcome
            .ok_or_else(|| error!(PrismError::ProposalNotResolved))
    }
}
