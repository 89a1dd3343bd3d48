//! Market account
//!
//! One account per asset/stable pair holding the spot market, the set of
//! conditional markets while a proposal is open, and the market
//! configuration. Conditional markets are a vector indexed by outcome:
//! outcome-indexed state is data, never a type-level enumeration, so the
//! market scales to any outcome count without new asset types.

use anchor_lang::prelude::*;

use crate::constants::{MAX_BPS, MAX_FEE_BPS, MAX_OUTCOMES};
use crate::error::PrismError;
use crate::state::conditional::ConditionalPool;
use crate::state::spot::SpotPool;
use crate::utils::SafeMath;

// ============================================================================
// Configuration
// ============================================================================

/// Minimum-liquidity floor protecting pools from draining to zero. Whether
/// the floor should be absolute or scale with pool size is a policy choice,
/// so both are representable and the market picks one at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinLiquidity {
    Absolute(u64),
    BasisPoints(u16),
}

impl MinLiquidity {
    /// Floor for a reserve of the given total size.
    pub fn floor_for(&self, reserve_total: u64) -> Result<u64> {
        match self {
            MinLiquidity::Absolute(amount) => Ok(*amount),
            MinLiquidity::BasisPoints(bps) => Ok((reserve_total as u128)
                .safe_mul(*bps as u128)?
                .safe_div(MAX_BPS as u128)? as u64),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmConfig {
    /// Fraction of the spot `Live` bucket mirrored into each conditional
    /// market at split time, in basis points, in (0, 10000].
    pub split_ratio_bps: u16,
    pub lp_fee_bps: u16,
    pub protocol_fee_bps: u16,
    pub min_liquidity: MinLiquidity,
    /// Minimum seconds between permissionless crank invocations.
    pub crank_interval_secs: i64,
    // TWAP oracle parameters for newly created pools
    pub twap_initial_observation: u128,
    pub twap_max_observation_change: u128,
    pub twap_start_delay_secs: u32,
}

impl AmmConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.split_ratio_bps > 0 && self.split_ratio_bps <= MAX_BPS,
            PrismError::InvalidSplitRatio
        );
        require_gte!(MAX_FEE_BPS, self.lp_fee_bps, PrismError::InvalidConfig);
        require_gte!(MAX_FEE_BPS, self.protocol_fee_bps, PrismError::InvalidConfig);
        require!(self.crank_interval_secs >= 0, PrismError::InvalidConfig);
        require!(
            self.twap_max_observation_change > 0,
            PrismError::InvalidConfig
        );
        if let MinLiquidity::BasisPoints(bps) = self.min_liquidity {
            require_gte!(MAX_BPS, bps, PrismError::InvalidConfig);
        }
        Ok(())
    }
}

// ============================================================================
// Market Account
// ============================================================================

/// The proposal this market's liquidity is currently mirrored across.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockedProposal {
    pub id: u64,
    pub outcome_count: u8,
}

#[account]
#[derive(InitSpace)]
pub struct Amm {
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub stable_mint: Pubkey,
    pub asset_vault: Pubkey,
    pub stable_vault: Pubkey,

    pub config: AmmConfig,
    pub spot: SpotPool,
    #[max_len(MAX_OUTCOMES)]
    pub conditionals: Vec<ConditionalPool>,
    pub proposal: Option<LockedProposal>,

    pub last_crank_ts: i64,
    pub bump: u8,
}

impl Amm {
    /// Whether a quantum split is currently in force.
    pub fn is_split(&self) -> bool {
        !self.conditionals.is_empty()
    }

    pub fn locked_proposal(&self) -> Result<LockedProposal> {
        self.proposal.ok_or_else(|| error!(PrismError::MarketNotSplit))
    }

    pub fn conditional(&self, outcome: u8) -> Result<&ConditionalPool> {
        self.conditionals
            .get(outcome as usize)
            .ok_or_else(|| error!(PrismError::OutcomeOutOfRange))
    }

    pub fn conditional_mut(&mut self, outcome: u8) -> Result<&mut ConditionalPool> {
        self.conditionals
            .get_mut(outcome as usize)
            .ok_or_else(|| error!(PrismError::OutcomeOutOfRange))
    }

    /// LP supply of the live cohort across the split: what the live bucket
    /// held before the split carved it up. Zero-outcome (unsplit) markets
    /// are just the spot live supply.
    pub fn cohort_live_lp(&self) -> Result<u64> {
        match self.conditionals.first() {
            Some(pool) => self.spot.lp_supply.live.safe_add(pool.lp_supply.live),
            None => Ok(self.spot.lp_supply.live),
        }
    }

    /// Same cohort view for the transitioning bucket.
    pub fn cohort_transitioning_lp(&self) -> Result<u64> {
        match self.conditionals.first() {
            Some(pool) => self
                .spot
                .lp_supply
                .transitioning
                .safe_add(pool.lp_supply.transitioning),
            None => Ok(self.spot.lp_supply.transitioning),
        }
    }

    /// Rate-limit guard shared by the permissionless cranks. Callers must
    /// persist the returned timestamp only after the crank actually did
    /// work.
    pub fn check_crank_interval(&self, now: i64) -> Result<()> {
        require_gte!(
            now,
            self.last_crank_ts
                .safe_add(self.config.crank_interval_secs)?,
            PrismError::CrankTooSoon
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ratio_bounds() {
        let mut config = AmmConfig {
            split_ratio_bps: 0,
            lp_fee_bps: 30,
            protocol_fee_bps: 10,
            min_liquidity: MinLiquidity::BasisPoints(10),
            crank_interval_secs: 60,
            twap_initial_observation: 1,
            twap_max_observation_change: 1,
            twap_start_delay_secs: 0,
        };
        assert!(config.validate().is_err());
        config.split_ratio_bps = MAX_BPS;
        assert!(config.validate().is_ok());
        config.split_ratio_bps = MAX_BPS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_liquidity_policies() {
        let absolute = MinLiquidity::Absolute(1_000);
        assert_eq!(absolute.floor_for(1_000_000).unwrap(), 1_000);

        let scaled = MinLiquidity::BasisPoints(50);
        assert_eq!(scaled.floor_for(1_000_000).unwrap(), 5_000);
        assert_eq!(scaled.floor_for(0).unwrap(), 0);
    }
}
