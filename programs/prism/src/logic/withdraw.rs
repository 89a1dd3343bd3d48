//! Withdrawal state machine
//!
//! Governs an LP position's bucket membership:
//! `Live` (tradable) -> `Transitioning` (tradable, exit requested) ->
//! `WithdrawOnly` (claimable) -> claimed (position destroyed). A request
//! made while no proposal is open short-circuits straight to `WithdrawOnly`.
//! Positions parked in `Transitioning` are moved by the recombiner in bulk;
//! the per-position record catches up lazily the next time it is touched.

use anchor_lang::prelude::*;

use crate::error::PrismError;
use crate::state::amm::Amm;
use crate::state::bucket::Bucket;
use crate::state::position::LpPosition;
use crate::utils::{proportional_share, SafeMath};

/// Reconcile a position record with crank progress: once the proposal it was
/// locked to is gone, its transitioning liquidity has already been settled
/// into `WithdrawOnly` by the recombiner or the transition crank.
pub fn refresh_bucket(amm: &Amm, position: &mut LpPosition) {
    if position.bucket != Bucket::Transitioning {
        return;
    }
    let still_locked = match (position.locked_proposal, amm.proposal) {
        (Some(locked_id), Some(open)) => locked_id == open.id,
        _ => false,
    };
    if !still_locked {
        position.bucket = Bucket::WithdrawOnly;
    }
}

/// Request withdrawal for a position.
///
/// Returns the bucket the position landed in: `WithdrawOnly` when no
/// proposal is open (claimable right away), `Transitioning` when one is
/// (keeps trading until recombination).
pub fn mark_for_withdrawal(amm: &mut Amm, position: &mut LpPosition) -> Result<Bucket> {
    refresh_bucket(amm, position);
    require!(
        position.bucket == Bucket::Live && !position.withdraw_requested,
        PrismError::InvalidBucketTransition
    );
    require!(!position.is_empty(), PrismError::ZeroAmount);

    let amount = position.amount;
    let landed = match amm.proposal {
        None => {
            // No proposal cycle to wait out: the proportional share of the
            // live reserves moves immediately and is claimable right away.
            let supply = amm.spot.lp_supply.live;
            let asset_share = proportional_share(amm.spot.asset.live, amount, supply)?;
            let stable_share = proportional_share(amm.spot.stable.live, amount, supply)?;

            amm.spot
                .asset
                .shift(Bucket::Live, Bucket::WithdrawOnly, asset_share)?;
            amm.spot
                .stable
                .shift(Bucket::Live, Bucket::WithdrawOnly, stable_share)?;
            amm.spot
                .lp_supply
                .shift(Bucket::Live, Bucket::WithdrawOnly, amount)?;

            position.locked_proposal = None;
            Bucket::WithdrawOnly
        }
        Some(locked) => {
            // The position's live claim is spread across the spot remainder
            // and every conditional market; shift the same fraction
            // everywhere so the cohorts stay aligned.
            let cohort = amm.cohort_live_lp()?;
            require_gt!(cohort, 0, PrismError::InsufficientLiquidity);

            let spot = &mut amm.spot;
            let asset_share = proportional_share(spot.asset.live, amount, cohort)?;
            let stable_share = proportional_share(spot.stable.live, amount, cohort)?;
            let spot_lp_share = proportional_share(spot.lp_supply.live, amount, cohort)?;
            spot.asset
                .shift(Bucket::Live, Bucket::Transitioning, asset_share)?;
            spot.stable
                .shift(Bucket::Live, Bucket::Transitioning, stable_share)?;
            spot.lp_supply
                .shift(Bucket::Live, Bucket::Transitioning, spot_lp_share)?;

            // Every conditional mirrors the same cohort, so each shifts the
            // same LP amount; only the winning pool's shift ever returns.
            let mut conditional_lp_share = 0u64;
            for pool in amm.conditionals.iter_mut() {
                let asset_share = proportional_share(pool.asset.live, amount, cohort)?;
                let stable_share = proportional_share(pool.stable.live, amount, cohort)?;
                conditional_lp_share =
                    proportional_share(pool.lp_supply.live, amount, cohort)?;
                pool.asset.shift_to_transitioning(asset_share)?;
                pool.stable.shift_to_transitioning(stable_share)?;
                pool.lp_supply.shift_to_transitioning(conditional_lp_share)?;
            }

            // Floor division can strand a unit or two of the requested LP in
            // the live cohort; the position's claim is exactly what was
            // shifted, never more than reaches `WithdrawOnly`.
            position.amount = spot_lp_share.safe_add(conditional_lp_share)?;

            position.locked_proposal = Some(locked.id);
            Bucket::Transitioning
        }
    };

    position.withdraw_requested = true;
    position.bucket = landed;
    Ok(landed)
}

/// Claim a withdrawable position: pays the exact proportional share of the
/// `WithdrawOnly` bucket, floor division, and empties the position record so
/// the caller can close the account.
pub fn claim_withdrawal(amm: &mut Amm, position: &mut LpPosition) -> Result<(u64, u64)> {
    refresh_bucket(amm, position);

    if position.bucket == Bucket::Transitioning {
        // Only reachable while the locked proposal is still open.
        return Err(PrismError::ProposalStillActive.into());
    }
    require!(
        position.withdraw_requested && position.bucket == Bucket::WithdrawOnly,
        PrismError::NotInWithdrawMode
    );
    if position.is_empty() {
        // A dust-sized mark can shift nothing; claiming just retires the
        // record.
        return Ok((0, 0));
    }

    let payout = amm.spot.claim_from_withdraw_only(position.amount)?;
    position.amount = 0;

    Ok(payout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::recombine::begin_recombine;
    use crate::logic::split::quantum_split;
    use crate::logic::split::tests::{test_amm, test_proposal};
    use crate::state::proposal::ProposalState;

    fn position(amount: u64) -> LpPosition {
        LpPosition {
            owner: Pubkey::default(),
            amm: Pubkey::default(),
            amount,
            locked_proposal: None,
            withdraw_requested: false,
            bucket: Bucket::Live,
            bump: 255,
        }
    }

    #[test]
    fn test_mark_without_proposal_is_immediately_claimable() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut pos = position(400);

        let landed = mark_for_withdrawal(&mut amm, &mut pos).unwrap();
        assert_eq!(landed, Bucket::WithdrawOnly);
        assert_eq!(amm.spot.asset.live, 600);
        assert_eq!(amm.spot.asset.withdraw_only, 400);

        let (asset_out, stable_out) = claim_withdrawal(&mut amm, &mut pos).unwrap();
        assert_eq!((asset_out, stable_out), (400, 400));
        assert_eq!(amm.spot.asset.withdraw_only, 0);
        assert!(pos.is_empty());
    }

    #[test]
    fn test_mark_during_proposal_keeps_trading_then_isolates() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut proposal = test_proposal(7, 2);
        let mut pos = position(400);

        // Open proposal, request exit before the split runs
        amm.proposal = Some(crate::state::amm::LockedProposal {
            id: 7,
            outcome_count: 2,
        });
        let landed = mark_for_withdrawal(&mut amm, &mut pos).unwrap();
        assert_eq!(landed, Bucket::Transitioning);
        assert_eq!(amm.spot.asset.live, 600);
        assert_eq!(amm.spot.asset.transitioning, 400);

        // Claiming now is premature
        let err = claim_withdrawal(&mut amm, &mut pos).unwrap_err();
        assert_eq!(err, PrismError::ProposalStillActive.into());

        // Split mirrors the 600 at full ratio and the 400 transitioning
        amm.proposal = None;
        quantum_split(&mut amm, &proposal, 0).unwrap();
        for pool in &amm.conditionals {
            assert_eq!(pool.asset.live, 600);
            assert_eq!(pool.asset.transitioning, 400);
        }

        proposal.state = ProposalState::Resolved;
        proposal.winning_outcome = Some(0);
        begin_recombine(&mut amm, &proposal, 0)
            .unwrap()
            .unwrap()
            .finish(&mut amm)
            .unwrap();

        // The 400 is claimable, never re-split
        assert_eq!(amm.spot.asset.live, 600);
        assert_eq!(amm.spot.asset.withdraw_only, 400);

        let (asset_out, stable_out) = claim_withdrawal(&mut amm, &mut pos).unwrap();
        assert_eq!((asset_out, stable_out), (400, 400));
    }

    #[test]
    fn test_mark_after_split_shifts_every_market() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let proposal = test_proposal(3, 2);
        quantum_split(&mut amm, &proposal, 0).unwrap();

        let mut pos = position(400);
        let landed = mark_for_withdrawal(&mut amm, &mut pos).unwrap();
        assert_eq!(landed, Bucket::Transitioning);

        // Full-ratio split left spot live empty; the conditionals carry the
        // position's 40% of the cohort
        for pool in &amm.conditionals {
            assert_eq!(pool.lp_supply.live, 600);
            assert_eq!(pool.lp_supply.transitioning, 400);
            assert_eq!(pool.asset.transitioning, 400);
        }
        assert_eq!(pos.locked_proposal, Some(3));
    }

    #[test]
    fn test_double_mark_rejected() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut pos = position(400);
        mark_for_withdrawal(&mut amm, &mut pos).unwrap();
        let err = mark_for_withdrawal(&mut amm, &mut pos).unwrap_err();
        assert_eq!(err, PrismError::InvalidBucketTransition.into());
    }

    #[test]
    fn test_claim_without_request_rejected() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 1_000).unwrap();
        let mut pos = position(400);
        let err = claim_withdrawal(&mut amm, &mut pos).unwrap_err();
        assert_eq!(err, PrismError::NotInWithdrawMode.into());
    }

    #[test]
    fn test_rounding_dust_stays_in_bucket() {
        let mut amm = test_amm(10_000);
        amm.spot.add_liquidity(1_000, 999).unwrap();
        let supply = amm.spot.lp_supply.live;

        // Three positions covering the whole supply
        let mut a = position(supply / 3);
        let mut b = position(supply / 3);
        let mut c = position(supply - 2 * (supply / 3));

        for pos in [&mut a, &mut b, &mut c] {
            mark_for_withdrawal(&mut amm, pos).unwrap();
        }
        let mut paid_asset = 0u64;
        for pos in [&mut a, &mut b, &mut c] {
            let (asset_out, _) = claim_withdrawal(&mut amm, pos).unwrap();
            paid_asset += asset_out;
        }
        assert!(paid_asset <= 1_000);
        amm.spot.asset.check_conserved().unwrap();
    }
}
