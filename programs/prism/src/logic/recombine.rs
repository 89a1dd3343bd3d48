//! Recombination crank
//!
//! Reverses the quantum split for the winning outcome only. Winning `Live`
//! liquidity returns to spot `Live`; winning `Transitioning` liquidity
//! returns to spot `WithdrawOnly` so liquidity that asked to exit is never
//! re-entered into the next split. Losing-outcome reserves are forfeited at
//! teardown: their backing already left the spot market at split time, and
//! discarding them is the mechanism by which losing liquidity is burned, not
//! refunded.
//!
//! The teardown runs through a consuming progress value so a caller that
//! begins recombination is forced by the type system to finish it.

use anchor_lang::prelude::*;

use crate::error::PrismError;
use crate::state::amm::Amm;
use crate::state::bucket::Bucket;
use crate::state::proposal::Proposal;
use crate::utils::SafeMath;

/// In-flight recombination. Holds the winning outcome's drained balances
/// between `begin_recombine` and `finish`; dropping it without finishing
/// would forfeit winning liquidity, hence `must_use`.
#[must_use = "a begun recombination must be finished or winning liquidity is lost"]
pub struct Recombination {
    winning_outcome: u8,
    /// (live, transitioning) drained from the winning pool
    asset: (u64, u64),
    stable: (u64, u64),
    lp_supply: (u64, u64),
}

/// Start recombining a resolved proposal. Returns `None` when there is
/// nothing to do (the market is not split), making repeat cranks a no-op
/// rather than an error.
pub fn begin_recombine(
    amm: &mut Amm,
    proposal: &Proposal,
    winning_outcome: u8,
) -> Result<Option<Recombination>> {
    if amm.proposal.is_none() && !amm.is_split() {
        return Ok(None);
    }

    let locked = amm.locked_proposal()?;
    require_eq!(proposal.id, locked.id, PrismError::ProposalMismatch);
    let resolved = proposal.resolved_winner()?;
    require_eq!(winning_outcome, resolved, PrismError::ProposalMismatch);

    let winning = amm.conditional_mut(winning_outcome)?;
    let asset = winning.asset.drain();
    let stable = winning.stable.drain();
    let lp_supply = winning.lp_supply.drain();

    Ok(Some(Recombination {
        winning_outcome,
        asset,
        stable,
        lp_supply,
    }))
}

impl Recombination {
    pub fn winning_outcome(&self) -> u8 {
        self.winning_outcome
    }

    /// Return the winning balances to the spot market and tear every
    /// conditional market down. Also settles any `Transitioning` balance the
    /// spot market accumulated from withdrawal requests made after the
    /// split.
    pub fn finish(self, amm: &mut Amm) -> Result<()> {
        let spot = &mut amm.spot;

        spot.asset.deposit(Bucket::Live, self.asset.0)?;
        spot.asset.deposit(Bucket::WithdrawOnly, self.asset.1)?;
        spot.stable.deposit(Bucket::Live, self.stable.0)?;
        spot.stable.deposit(Bucket::WithdrawOnly, self.stable.1)?;
        spot.lp_supply.deposit(Bucket::Live, self.lp_supply.0)?;
        spot.lp_supply
            .deposit(Bucket::WithdrawOnly, self.lp_supply.1)?;

        settle_spot_transitioning(amm)?;

        // Teardown: losing reserves are discarded here by design.
        amm.conditionals.clear();
        amm.proposal = None;

        Ok(())
    }
}

/// Migrate still-pending `Transitioning` balances to `WithdrawOnly` without
/// running the full recombine path. Legal once the locked proposal has
/// resolved; converges to the same bucket state recombination produces for
/// those balances.
pub fn transition_pending(amm: &mut Amm, proposal: &Proposal) -> Result<(u64, u64, u64)> {
    let locked = amm.locked_proposal()?;
    require_eq!(proposal.id, locked.id, PrismError::ProposalMismatch);
    let winning_outcome = proposal.resolved_winner()?;

    // Winning-pool transitioning balances move straight into spot
    // withdraw-only, leaving the live half for the recombiner.
    let winning = amm.conditional_mut(winning_outcome)?;
    let asset_pending = std::mem::take(&mut winning.asset.transitioning);
    let stable_pending = std::mem::take(&mut winning.stable.transitioning);
    let lp_pending = std::mem::take(&mut winning.lp_supply.transitioning);

    let spot = &mut amm.spot;
    spot.asset.deposit(Bucket::WithdrawOnly, asset_pending)?;
    spot.stable.deposit(Bucket::WithdrawOnly, stable_pending)?;
    spot.lp_supply.deposit(Bucket::WithdrawOnly, lp_pending)?;

    // Spot-side transitioning (marks made after the split) settles the same
    // way.
    let spot_settled = settle_spot_transitioning(amm)?;

    Ok((
        asset_pending.safe_add(spot_settled.0)?,
        stable_pending.safe_add(spot_settled.1)?,
        lp_pending.safe_add(spot_settled.2)?,
    ))
}

/// Shift the spot market's own transitioning balances to withdraw-only.
fn settle_spot_transitioning(amm: &mut Amm) -> Result<(u64, u64, u64)> {
    let spot = &mut amm.spot;
    let asset = spot.asset.transitioning;
    let stable = spot.stable.transitioning;
    let lp = spot.lp_supply.transitioning;

    if asset > 0 {
        spot.asset
            .shift(Bucket::Transitioning, Bucket::WithdrawOnly, asset)?;
    }
    if stable > 0 {
        spot.stable
            .shift(Bucket::Transitioning, Bucket::WithdrawOnly, stable)?;
    }
    if lp > 0 {
        spot.lp_supply
            .shift(Bucket::Transitioning, Bucket::WithdrawOnly, lp)?;
    }

    Ok((asset, stable, lp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::split::tests::{test_amm, test_proposal};
    use crate::logic::split::quantum_split;
    use crate::state::proposal::ProposalState;

    fn resolve(proposal: &mut Proposal, winner: u8) {
        proposal.state = ProposalState::Resolved;
        proposal.winning_outcome = Some(winner);
    }

    #[test]
    fn test_round_trip_restores_live() {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut proposal = test_proposal(1, 3);

        quantum_split(&mut amm, &proposal, 0).unwrap();
        assert_eq!(amm.spot.asset.live, 500);

        resolve(&mut proposal, 1);
        let recombination = begin_recombine(&mut amm, &proposal, 1).unwrap().unwrap();
        recombination.finish(&mut amm).unwrap();

        assert_eq!(amm.spot.asset.live, 1_000);
        assert_eq!(amm.spot.asset.withdraw_only, 0);
        assert!(amm.conditionals.is_empty());
        assert!(amm.proposal.is_none());
    }

    #[test]
    fn test_transitioning_returns_as_withdraw_only() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        for balance in [
            &mut amm.spot.asset,
            &mut amm.spot.stable,
            &mut amm.spot.lp_supply,
        ] {
            let shift = balance.live * 2 / 5;
            balance
                .shift(Bucket::Live, Bucket::Transitioning, shift)
                .unwrap();
        }
        let mut proposal = test_proposal(1, 2);

        quantum_split(&mut amm, &proposal, 0).unwrap();
        resolve(&mut proposal, 0);
        let recombination = begin_recombine(&mut amm, &proposal, 0).unwrap().unwrap();
        recombination.finish(&mut amm).unwrap();

        // The 400 that asked to exit is claimable, never re-splittable
        assert_eq!(amm.spot.asset.live, 600);
        assert_eq!(amm.spot.asset.withdraw_only, 400);
        assert_eq!(amm.spot.asset.transitioning, 0);
    }

    #[test]
    fn test_recombine_is_idempotent() {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut proposal = test_proposal(1, 2);

        quantum_split(&mut amm, &proposal, 0).unwrap();
        resolve(&mut proposal, 0);
        begin_recombine(&mut amm, &proposal, 0)
            .unwrap()
            .unwrap()
            .finish(&mut amm)
            .unwrap();

        // Second crank observes a torn-down market and no-ops
        let second = begin_recombine(&mut amm, &proposal, 0).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_recombine_requires_resolution() {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let proposal = test_proposal(1, 2);
        quantum_split(&mut amm, &proposal, 0).unwrap();

        assert!(begin_recombine(&mut amm, &proposal, 0).is_err());
    }

    #[test]
    fn test_transition_pending_converges_with_recombine() {
        let mut full = test_amm(10_000);
        full.spot.add_liquidity(1_000, 1_000).unwrap();
        for balance in [
            &mut full.spot.asset,
            &mut full.spot.stable,
            &mut full.spot.lp_supply,
        ] {
            let shift = balance.live * 2 / 5;
            balance
                .shift(Bucket::Live, Bucket::Transitioning, shift)
                .unwrap();
        }
        let mut partial = test_amm(10_000);
        partial.spot = full.spot;

        let mut proposal = test_proposal(1, 2);
        quantum_split(&mut full, &proposal, 0).unwrap();
        quantum_split(&mut partial, &proposal, 0).unwrap();
        resolve(&mut proposal, 0);

        // One market cranks transition first, then recombines; the other
        // recombines directly. Bucket state must converge.
        transition_pending(&mut partial, &proposal).unwrap();
        begin_recombine(&mut partial, &proposal, 0)
            .unwrap()
            .unwrap()
            .finish(&mut partial)
            .unwrap();
        begin_recombine(&mut full, &proposal, 0)
            .unwrap()
            .unwrap()
            .finish(&mut full)
            .unwrap();

        assert_eq!(full.spot, partial.spot);
    }

    #[test]
    fn test_wrong_winner_rejected() {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut proposal = test_proposal(1, 2);
        quantum_split(&mut amm, &proposal, 0).unwrap();
        resolve(&mut proposal, 1);

        assert!(begin_recombine(&mut amm, &proposal, 0).is_err());
    }
}
