//! Flat conditional balance ledger
//!
//! Replaces one typed asset class per outcome with a single numeric vector
//! keyed by `(outcome, side)`. Swap and arbitrage code is written once and
//! works for any outcome count because all per-outcome state lives here as
//! data. Entries are created zeroed when a proposal opens and must resolve
//! to zero (redeem or dust sweep) before the ledger can be reused for the
//! next proposal.

use anchor_lang::prelude::*;

use crate::constants::{MAX_LEDGER_ENTRIES, MAX_OUTCOMES};
use crate::error::PrismError;
use crate::utils::SafeMath;

/// Which side of the pair an entry tracks.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Asset,
    Stable,
}

#[account]
#[derive(InitSpace)]
pub struct OutcomeLedger {
    pub owner: Pubkey,
    pub amm: Pubkey,
    /// Proposal these balances are conditional on
    pub proposal_id: u64,
    pub outcome_count: u8,
    /// `2 * outcome_count` entries, laid out `[outcome][side]`
    #[max_len(MAX_LEDGER_ENTRIES)]
    pub entries: Vec<u64>,
    pub bump: u8,
}

impl OutcomeLedger {
    fn index(&self, outcome: u8, side: Side) -> Result<usize> {
        require_gt!(
            self.outcome_count,
            outcome,
            PrismError::OutcomeOutOfRange
        );
        let base = outcome as usize * 2;
        Ok(match side {
            Side::Asset => base,
            Side::Stable => base + 1,
        })
    }

    pub fn balance(&self, outcome: u8, side: Side) -> Result<u64> {
        let idx = self.index(outcome, side)?;
        Ok(self.entries[idx])
    }

    pub fn credit(&mut self, outcome: u8, side: Side, amount: u64) -> Result<()> {
        let idx = self.index(outcome, side)?;
        self.entries[idx] = self.entries[idx].safe_add(amount)?;
        Ok(())
    }

    pub fn debit(&mut self, outcome: u8, side: Side, amount: u64) -> Result<()> {
        let idx = self.index(outcome, side)?;
        require_gte!(
            self.entries[idx],
            amount,
            PrismError::InsufficientLiquidity
        );
        self.entries[idx] = self.entries[idx].safe_sub(amount)?;
        Ok(())
    }

    /// Reset the ledger for a new proposal. Refuses while balances from the
    /// previous proposal are still outstanding.
    pub fn reset_for(&mut self, proposal_id: u64, outcome_count: u8) -> Result<()> {
        require!(
            self.entries.iter().all(|&entry| entry == 0),
            PrismError::StaleLedger
        );
        require_gte!(
            MAX_OUTCOMES,
            outcome_count as usize,
            PrismError::OutcomeOutOfRange
        );
        self.proposal_id = proposal_id;
        self.outcome_count = outcome_count;
        self.entries = vec![0; 2 * outcome_count as usize];
        Ok(())
    }

    /// Align the ledger with the market's currently locked proposal,
    /// initializing or resetting the entry vector as needed. Freshly created
    /// ledgers have an empty entry vector and sync trivially.
    pub fn sync_to(&mut self, locked: crate::state::amm::LockedProposal) -> Result<()> {
        if self.proposal_id != locked.id
            || self.entries.len() != 2 * locked.outcome_count as usize
        {
            self.reset_for(locked.id, locked.outcome_count)?;
        }
        Ok(())
    }

    /// Zero every entry unconditionally. Only for protocol-owned ledgers
    /// whose leftover dust is forfeited to the vault; user ledgers resolve
    /// through `redeem_resolved` instead.
    pub fn sweep_dust(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = 0;
        }
    }

    /// Credit `amount` to one side of every outcome simultaneously: the
    /// ledger representation of a complete set.
    pub fn mint_complete_set(&mut self, side: Side, amount: u64) -> Result<()> {
        for outcome in 0..self.outcome_count {
            self.credit(outcome, side, amount)?;
        }
        Ok(())
    }

    /// Debit `amount` from one side of every outcome. Fails without mutating
    /// unless every outcome can cover it; partial sets stay as dust.
    pub fn burn_complete_set(&mut self, side: Side, amount: u64) -> Result<()> {
        for outcome in 0..self.outcome_count {
            require_gte!(
                self.balance(outcome, side)?,
                amount,
                PrismError::IncompleteSet
            );
        }
        for outcome in 0..self.outcome_count {
            self.debit(outcome, side, amount)?;
        }
        Ok(())
    }

    /// Largest complete set currently formable on a side.
    pub fn complete_set_size(&self, side: Side) -> Result<u64> {
        let mut size = u64::MAX;
        for outcome in 0..self.outcome_count {
            size = size.min(self.balance(outcome, side)?);
        }
        Ok(if self.outcome_count == 0 { 0 } else { size })
    }

    /// After resolution the winning outcome's balances redeem at par and
    /// everything else is dust. Returns `(asset_out, stable_out)` and leaves
    /// the ledger zeroed.
    pub fn redeem_resolved(&mut self, winning_outcome: u8) -> Result<(u64, u64)> {
        let asset_out = self.balance(winning_outcome, Side::Asset)?;
        let stable_out = self.balance(winning_outcome, Side::Stable)?;
        for entry in self.entries.iter_mut() {
            *entry = 0;
        }
        Ok((asset_out, stable_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(outcome_count: u8) -> OutcomeLedger {
        OutcomeLedger {
            owner: Pubkey::default(),
            amm: Pubkey::default(),
            proposal_id: 1,
            outcome_count,
            entries: vec![0; 2 * outcome_count as usize],
            bump: 255,
        }
    }

    #[test]
    fn test_swap_touches_only_one_outcome() {
        let mut l = ledger(50);
        l.mint_complete_set(Side::Stable, 1_000).unwrap();
        let before = l.entries.clone();

        // A ledger swap against outcome 7 debits stable and credits asset
        // for outcome 7 alone.
        l.debit(7, Side::Stable, 400).unwrap();
        l.credit(7, Side::Asset, 390).unwrap();

        for outcome in 0..50u8 {
            if outcome == 7 {
                assert_eq!(l.balance(outcome, Side::Stable).unwrap(), 600);
                assert_eq!(l.balance(outcome, Side::Asset).unwrap(), 390);
            } else {
                let base = outcome as usize * 2;
                assert_eq!(l.entries[base], before[base]);
                assert_eq!(l.entries[base + 1], before[base + 1]);
            }
        }
    }

    #[test]
    fn test_burn_requires_complete_set() {
        let mut l = ledger(3);
        l.mint_complete_set(Side::Asset, 500).unwrap();
        l.debit(1, Side::Asset, 100).unwrap();

        // 500/400/500 cannot form a 500-set
        assert!(l.burn_complete_set(Side::Asset, 500).is_err());
        assert_eq!(l.complete_set_size(Side::Asset).unwrap(), 400);
        l.burn_complete_set(Side::Asset, 400).unwrap();
        // 100/0/100 dust remains
        assert_eq!(l.balance(0, Side::Asset).unwrap(), 100);
        assert_eq!(l.balance(1, Side::Asset).unwrap(), 0);
    }

    #[test]
    fn test_redeem_pays_winner_and_sweeps_dust() {
        let mut l = ledger(3);
        l.mint_complete_set(Side::Stable, 200).unwrap();
        l.credit(2, Side::Asset, 50).unwrap();

        let (asset_out, stable_out) = l.redeem_resolved(2).unwrap();
        assert_eq!((asset_out, stable_out), (50, 200));
        assert!(l.entries.iter().all(|&entry| entry == 0));
    }

    #[test]
    fn test_reset_refuses_outstanding_balances() {
        let mut l = ledger(2);
        l.credit(0, Side::Asset, 1).unwrap();
        assert!(l.reset_for(2, 4).is_err());
        l.debit(0, Side::Asset, 1).unwrap();
        l.reset_for(2, 4).unwrap();
        assert_eq!(l.entries.len(), 8);
    }
}
