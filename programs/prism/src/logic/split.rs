//! Quantum split
//!
//! Mirrors one pool of spot collateral into an independent market per
//! proposal outcome without multiplying the capital required: the source
//! amount leaves the spot buckets once, and every conditional market is
//! seeded with the full mirrored amount. A configurable fraction of `Live`
//! is mirrored; `Transitioning` is always mirrored at 100% since it is
//! expected to leave permanently at recombination.

use anchor_lang::prelude::*;

use crate::constants::{MAX_BPS, MAX_OUTCOMES};
use crate::error::PrismError;
use crate::state::amm::{Amm, LockedProposal};
use crate::state::bucket::{Bucket, SplitBalance};
use crate::state::conditional::ConditionalPool;
use crate::state::oracle::TwapOracle;
use crate::state::proposal::Proposal;
use crate::utils::proportional_share;

/// Amounts carved out of the spot market, reported for event emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitAmounts {
    pub asset: SplitBalance,
    pub stable: SplitBalance,
    pub lp_supply: SplitBalance,
}

/// Split the spot market across every outcome of an opening proposal. Runs
/// exactly once per proposal; zero source amounts mirror as empty markets,
/// which is a no-op rather than an error.
pub fn quantum_split(amm: &mut Amm, proposal: &Proposal, now: i64) -> Result<SplitAmounts> {
    proposal.require_active()?;
    require!(
        amm.proposal.is_none() && !amm.is_split(),
        PrismError::MarketAlreadySplit
    );
    let outcome_count = proposal.outcome_count;
    require!(
        outcome_count >= 2 && (outcome_count as usize) <= MAX_OUTCOMES,
        PrismError::OutcomeOutOfRange
    );

    let ratio_bps = amm.config.split_ratio_bps;
    let asset = carve(&mut amm.spot.asset, ratio_bps)?;
    let stable = carve(&mut amm.spot.stable, ratio_bps)?;
    let lp_supply = carve(&mut amm.spot.lp_supply, ratio_bps)?;

    // Conditional oracles start from the spot market's current observation
    // so the governance TWAP has no artificial jump at proposal open.
    let initial_observation = if amm.spot.oracle.last_observation > 0 {
        amm.spot.oracle.last_observation
    } else {
        amm.config.twap_initial_observation
    };

    amm.conditionals = (0..outcome_count)
        .map(|outcome| {
            ConditionalPool::new(
                outcome,
                asset,
                stable,
                lp_supply,
                TwapOracle::new(
                    now,
                    initial_observation,
                    amm.config.twap_max_observation_change,
                    amm.config.twap_start_delay_secs,
                ),
            )
        })
        .collect();

    amm.proposal = Some(LockedProposal {
        id: proposal.id,
        outcome_count,
    });

    msg!(
        "quantum split: proposal {} across {} outcomes, {} bps of live",
        proposal.id,
        outcome_count,
        ratio_bps
    );

    Ok(SplitAmounts {
        asset,
        stable,
        lp_supply,
    })
}

/// Remove the split fraction from one spot quantity. The amounts come out of
/// the spot buckets exactly once; mirroring them across N outcomes is what
/// gives the split its quantum property.
fn carve(
    balance: &mut crate::state::bucket::BucketedBalance,
    ratio_bps: u16,
) -> Result<SplitBalance> {
    let from_live = proportional_share(balance.live, ratio_bps as u64, MAX_BPS as u64)?;
    let from_transitioning = balance.transitioning;

    if from_live > 0 {
        balance.withdraw(Bucket::Live, from_live)?;
    }
    if from_transitioning > 0 {
        balance.withdraw(Bucket::Transitioning, from_transitioning)?;
    }

    Ok(SplitBalance::new(from_live, from_transitioning))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::amm::{AmmConfig, MinLiquidity};
    use crate::state::proposal::ProposalState;
    use crate::state::spot::SpotPool;

    pub(crate) fn test_amm(split_ratio_bps: u16) -> Amm {
        Amm {
            authority: Pubkey::default(),
            asset_mint: Pubkey::default(),
            stable_mint: Pubkey::default(),
            asset_vault: Pubkey::default(),
            stable_vault: Pubkey::default(),
            config: AmmConfig {
                split_ratio_bps,
                lp_fee_bps: 30,
                protocol_fee_bps: 10,
                min_liquidity: MinLiquidity::Absolute(0),
                crank_interval_secs: 0,
                twap_initial_observation: crate::constants::PRICE_SCALE,
                twap_max_observation_change: crate::constants::PRICE_SCALE,
                twap_start_delay_secs: 0,
            },
            spot: SpotPool::default(),
            conditionals: Vec::new(),
            proposal: None,
            last_crank_ts: 0,
            bump: 255,
        }
    }

    pub(crate) fn test_proposal(id: u64, outcome_count: u8) -> Proposal {
        Proposal {
            id,
            outcome_count,
            state: ProposalState::Active,
            winning_outcome: None,
            created_at_ts: 0,
        }
    }

    #[test]
    fn test_split_consumes_source_once() {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();

        quantum_split(&mut amm, &test_proposal(1, 3), 0).unwrap();

        // Half of live left the spot market once, not once per outcome
        assert_eq!(amm.spot.asset.live, 500);
        assert_eq!(amm.conditionals.len(), 3);
        for pool in &amm.conditionals {
            assert_eq!(pool.asset.live, 500);
            assert_eq!(pool.stable.live, 500);
        }
    }

    #[test]
    fn test_split_mirrors_transitioning_fully() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        amm.spot
            .asset
            .shift(Bucket::Live, Bucket::Transitioning, 400)
            .unwrap();

        quantum_split(&mut amm, &test_proposal(1, 2), 0).unwrap();

        assert_eq!(amm.spot.asset.live, 0);
        assert_eq!(amm.spot.asset.transitioning, 0);
        for pool in &amm.conditionals {
            assert_eq!(pool.asset.live, 600);
            assert_eq!(pool.asset.transitioning, 400);
        }
    }

    #[test]
    fn test_split_never_touches_withdraw_only() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        amm.spot
            .asset
            .shift(Bucket::Live, Bucket::WithdrawOnly, 300)
            .unwrap();

        quantum_split(&mut amm, &test_proposal(1, 2), 0).unwrap();
        assert_eq!(amm.spot.asset.withdraw_only, 300);
    }

    #[test]
    fn test_second_split_rejected() {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        quantum_split(&mut amm, &test_proposal(1, 2), 0).unwrap();
        let err = quantum_split(&mut amm, &test_proposal(1, 2), 0);
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_spot_splits_as_noop() {
        let mut amm = test_amm(5_000);
        let amounts = quantum_split(&mut amm, &test_proposal(1, 2), 0).unwrap();
        assert_eq!(amounts.asset.total().unwrap(), 0);
        assert_eq!(amm.conditionals.len(), 2);
    }
}
