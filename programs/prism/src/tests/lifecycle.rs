//! Full proposal-cycle scenarios across split, trading, withdrawal and
//! recombination.

use anchor_lang::prelude::*;

use crate::logic::arbitrage;
use crate::logic::recombine::begin_recombine;
use crate::logic::split::quantum_split;
use crate::logic::split::tests::{test_amm, test_proposal};
use crate::logic::withdraw::{claim_withdrawal, mark_for_withdrawal};
use crate::state::{
    Bucket, LpPosition, OutcomeLedger, Proposal, ProposalState, Side, SwapDirection,
};

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

fn resolve(proposal: &mut Proposal, winner: u8) {
    proposal.state = ProposalState::Resolved;
    proposal.winning_outcome = Some(winner);
}

fn user_ledger(outcome_count: u8, proposal_id: u64) -> OutcomeLedger {
    OutcomeLedger {
        owner: Pubkey::default(),
        amm: Pubkey::default(),
        proposal_id,
        outcome_count,
        entries: vec![0; 2 * outcome_count as usize],
        bump: 255,
    }
}

#[test]
fn full_cycle_with_mid_proposal_trading() {
    let mut amm = test_amm(5_000);
    amm.spot.add_liquidity(1_000_000, 1_000_000).unwrap();
    let mut proposal = test_proposal(1, 3);

    quantum_split(&mut amm, &proposal, 0).unwrap();
    assert_eq!(amm.conditionals.len(), 3);

    // Conditional trading while the proposal is open: a trader mints a
    // stable set and buys the asset under outcome 2
    let mut ledger = user_ledger(3, 1);
    ledger.mint_complete_set(Side::Stable, 50_000).unwrap();
    let pool = amm.conditional_mut(2).unwrap();
    let asset_out = pool.swap(SwapDirection::Buy, 50_000, 30, 60).unwrap();
    ledger.debit(2, Side::Stable, 50_000).unwrap();
    ledger.credit(2, Side::Asset, asset_out).unwrap();
    assert!(asset_out > 0);

    // Spot trading continues against the un-split remainder
    let spot_out = amm.spot.swap(SwapDirection::Sell, 10_000, 30, 10, 120).unwrap();
    assert!(spot_out > 0);

    resolve(&mut proposal, 2);
    begin_recombine(&mut amm, &proposal, 2)
        .unwrap()
        .unwrap()
        .finish(&mut amm)
        .unwrap();

    assert!(amm.conditionals.is_empty());
    assert!(amm.proposal.is_none());
    amm.spot.asset.check_conserved().unwrap();
    amm.spot.stable.check_conserved().unwrap();
    amm.spot.lp_supply.check_conserved().unwrap();

    // The trader's winning-outcome asset redeems at par
    let (asset_redeemed, stable_redeemed) = ledger.redeem_resolved(2).unwrap();
    assert_eq!(asset_redeemed, asset_out);
    assert_eq!(stable_redeemed, 0);
    assert!(ledger.entries.iter().all(|&entry| entry == 0));
}

#[test]
fn withdrawal_survives_losing_outcome() {
    // A provider who asks to exit during the proposal gets their share back
    // even though the market traded on every outcome meanwhile.
    let mut amm = test_amm(10_000);
    amm.spot.add_liquidity(1_000, 1_000).unwrap();
    let mut proposal = test_proposal(9, 2);

    quantum_split(&mut amm, &proposal, 0).unwrap();

    let mut pos = position(400);
    mark_for_withdrawal(&mut amm, &mut pos).unwrap();
    assert_eq!(pos.bucket, Bucket::Transitioning);
    assert_eq!(pos.locked_proposal, Some(9));

    // Outcome 1 wins; the position's transitioning share returns through
    // the winning pool
    resolve(&mut proposal, 1);
    begin_recombine(&mut amm, &proposal, 1)
        .unwrap()
        .unwrap()
        .finish(&mut amm)
        .unwrap();

    let (asset_out, stable_out) = claim_withdrawal(&mut amm, &mut pos).unwrap();
    assert_eq!((asset_out, stable_out), (400, 400));
    assert_eq!(pos.bucket, Bucket::WithdrawOnly);
    assert!(pos.is_empty());
}

#[test]
fn back_to_back_proposals_shield_withdrawn_liquidity() {
    // Liquidity that exited during proposal 1 must not be re-split by
    // proposal 2.
    let mut amm = test_amm(10_000);
    amm.spot.add_liquidity(1_000, 1_000).unwrap();

    let mut first = test_proposal(1, 2);
    quantum_split(&mut amm, &first, 0).unwrap();
    let mut pos = position(400);
    mark_for_withdrawal(&mut amm, &mut pos).unwrap();
    resolve(&mut first, 0);
    begin_recombine(&mut amm, &first, 0)
        .unwrap()
        .unwrap()
        .finish(&mut amm)
        .unwrap();
    assert_eq!(amm.spot.asset.withdraw_only, 400);

    let second = test_proposal(2, 4);
    quantum_split(&mut amm, &second, 1_000).unwrap();

    // The withdraw-only bucket stayed behind in full
    assert_eq!(amm.spot.asset.withdraw_only, 400);
    for pool in &amm.conditionals {
        assert_eq!(pool.asset.total().unwrap(), 600);
    }

    // And remains claimable while proposal 2 is still open
    let (asset_out, stable_out) = claim_withdrawal(&mut amm, &mut pos).unwrap();
    assert_eq!((asset_out, stable_out), (400, 400));
}

#[test]
fn ledger_swap_touches_only_target_outcome_of_fifty() {
    let mut amm = test_amm(10_000);
    amm.spot.add_liquidity(50_000_000, 50_000_000).unwrap();
    quantum_split(&mut amm, &test_proposal(1, 50), 0).unwrap();

    let mut ledger = user_ledger(50, 1);
    ledger.mint_complete_set(Side::Stable, 10_000).unwrap();
    let entries_before = ledger.entries.clone();

    let pool = amm.conditional_mut(7).unwrap();
    let asset_out = pool.swap(SwapDirection::Buy, 10_000, 30, 60).unwrap();
    ledger.debit(7, Side::Stable, 10_000).unwrap();
    ledger.credit(7, Side::Asset, asset_out).unwrap();

    for outcome in 0..50u8 {
        let base = outcome as usize * 2;
        if outcome == 7 {
            assert_eq!(ledger.entries[base], asset_out);
            assert_eq!(ledger.entries[base + 1], 0);
        } else {
            assert_eq!(ledger.entries[base], entries_before[base]);
            assert_eq!(ledger.entries[base + 1], entries_before[base + 1]);
        }
    }
}

#[test]
fn arbitrage_crank_is_benign_when_consistent() {
    let mut amm = test_amm(5_000);
    amm.spot.add_liquidity(1_000_000, 1_000_000).unwrap();
    quantum_split(&mut amm, &test_proposal(1, 2), 0).unwrap();
    let mut ledger = user_ledger(2, 1);

    let before = amm.spot;
    let result = arbitrage::execute(&mut amm, &mut ledger, 50_000);
    assert!(result.is_err());
    // A failed cycle changes nothing
    assert_eq!(amm.spot, before);
}
