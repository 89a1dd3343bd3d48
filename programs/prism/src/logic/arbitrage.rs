//! Cross-market arbitrage
//!
//! Keeps conditional prices consistent with spot by trading the cycle
//! spot <-> complete set <-> conditional markets. One unit on the spot side
//! converts to one unit on the same side of every outcome simultaneously, so
//! a cycle is a spot swap plus N ledger swaps using the shared
//! minimum-profitable amount across outcomes. All per-outcome state lives in
//! the flat ledger, so the engine is written once for any outcome count.
//!
//! Sizing walks a fixed ladder of step sizes and stops at the first rung
//! that fails to improve, mirroring the behavior of the reference venue
//! rather than solving the curve in closed form.

use anchor_lang::prelude::*;

use crate::constants::ARB_SEARCH_STEPS;
use crate::error::PrismError;
use crate::state::amm::Amm;
use crate::state::balances::{OutcomeLedger, Side};
use crate::state::spot::SwapDirection;
use crate::utils::SafeMath;

/// Which way around the cycle runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbDirection {
    /// Spot asset is cheap: buy on spot, sell into every conditional, burn
    /// the stable complete set back to spot stable.
    SpotToConditionals,
    /// Spot asset is rich: mint a stable complete set, buy on every
    /// conditional, burn the asset complete set, sell on spot.
    ConditionalsToSpot,
}

/// Outcome of an executed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbExecution {
    pub direction: ArbDirection,
    pub amount_in: u64,
    /// Stable-denominated profit accrued to the protocol fee balance.
    pub profit: u64,
}

/// Find and execute the best profitable cycle, or fail with
/// `NoProfitableCycle` when prices are already consistent.
pub fn execute(
    amm: &mut Amm,
    ledger: &mut OutcomeLedger,
    max_input: u64,
) -> Result<ArbExecution> {
    require!(amm.is_split(), PrismError::MarketNotSplit);
    require!(max_input > 0, PrismError::ZeroAmount);
    require_eq!(
        ledger.outcome_count as usize,
        amm.conditionals.len(),
        PrismError::ProposalMismatch
    );

    let forward = best_input(amm, ArbDirection::SpotToConditionals, max_input)?;
    let backward = best_input(amm, ArbDirection::ConditionalsToSpot, max_input)?;

    let (direction, amount_in, expected_profit) = if forward.1 >= backward.1 {
        (ArbDirection::SpotToConditionals, forward.0, forward.1)
    } else {
        (ArbDirection::ConditionalsToSpot, backward.0, backward.1)
    };
    require!(expected_profit > 0, PrismError::NoProfitableCycle);

    let profit = match direction {
        ArbDirection::SpotToConditionals => run_spot_to_conditionals(amm, ledger, amount_in)?,
        ArbDirection::ConditionalsToSpot => run_conditionals_to_spot(amm, ledger, amount_in)?,
    };

    // Execution replays the winning simulation; a shortfall means a reserve
    // invariant broke mid-cycle.
    require_eq!(profit, expected_profit as u64, PrismError::KInvariantViolated);

    amm.spot.stable_fees = amm.spot.stable_fees.safe_add(profit)?;

    msg!(
        "arbitrage: {:?} input {} profit {}",
        direction,
        amount_in,
        profit
    );

    Ok(ArbExecution {
        direction,
        amount_in,
        profit,
    })
}

/// Ladder search for the most profitable input size in one direction.
/// Returns `(input, profit)`; profit may be non-positive.
fn best_input(amm: &Amm, direction: ArbDirection, max_input: u64) -> Result<(u64, i128)> {
    let step = max_input / ARB_SEARCH_STEPS;
    if step == 0 {
        return Ok((0, 0));
    }

    let mut best_profit: i128 = 0;
    let mut best_input: u64 = 0;

    for rung in 1..=ARB_SEARCH_STEPS {
        let input = rung.safe_mul(step)?;
        let profit = match simulate_cycle(amm, direction, input) {
            Ok(output) => output as i128 - input as i128,
            // An unquotable rung (e.g. a drained conditional) ends the climb
            Err(_) => break,
        };
        if profit > best_profit {
            best_profit = profit;
            best_input = input;
        } else {
            break;
        }
    }

    Ok((best_input, best_profit))
}

/// Quote one cycle without mutating anything. Returns the stable output the
/// cycle would produce for `input` stable.
fn simulate_cycle(amm: &Amm, direction: ArbDirection, input: u64) -> Result<u64> {
    match direction {
        ArbDirection::SpotToConditionals => {
            let asset_out = amm.spot.simulate_swap(SwapDirection::Buy, input)?;
            let mut min_stable = u64::MAX;
            for pool in &amm.conditionals {
                let stable_out = pool.simulate_swap(SwapDirection::Sell, asset_out)?;
                min_stable = min_stable.min(stable_out);
            }
            Ok(min_stable)
        }
        ArbDirection::ConditionalsToSpot => {
            let mut min_asset = u64::MAX;
            for pool in &amm.conditionals {
                let asset_out = pool.simulate_swap(SwapDirection::Buy, input)?;
                min_asset = min_asset.min(asset_out);
            }
            amm.spot.simulate_swap(SwapDirection::Sell, min_asset)
        }
    }
}

/// Buy asset on spot, mirror it across every outcome, sell per outcome, and
/// burn the resulting stable complete set. Per-outcome remainders above the
/// shared minimum stay in the ledger as dust.
fn run_spot_to_conditionals(
    amm: &mut Amm,
    ledger: &mut OutcomeLedger,
    input: u64,
) -> Result<u64> {
    let asset_out = amm.spot.feeless_swap(SwapDirection::Buy, input)?;
    ledger.mint_complete_set(Side::Asset, asset_out)?;

    let mut min_stable = u64::MAX;
    let outcome_count = ledger.outcome_count;
    for outcome in 0..outcome_count {
        let pool = amm.conditional_mut(outcome)?;
        let stable_out = pool.feeless_swap(SwapDirection::Sell, asset_out)?;
        ledger.debit(outcome, Side::Asset, asset_out)?;
        ledger.credit(outcome, Side::Stable, stable_out)?;
        min_stable = min_stable.min(stable_out);
    }

    ledger.burn_complete_set(Side::Stable, min_stable)?;
    min_stable.safe_sub(input)
}

/// Mint a stable complete set, buy asset on every outcome, burn the shared
/// asset minimum back to spot asset and sell it.
fn run_conditionals_to_spot(
    amm: &mut Amm,
    ledger: &mut OutcomeLedger,
    input: u64,
) -> Result<u64> {
    ledger.mint_complete_set(Side::Stable, input)?;

    let mut min_asset = u64::MAX;
    let outcome_count = ledger.outcome_count;
    for outcome in 0..outcome_count {
        let pool = amm.conditional_mut(outcome)?;
        let asset_out = pool.feeless_swap(SwapDirection::Buy, input)?;
        ledger.debit(outcome, Side::Stable, input)?;
        ledger.credit(outcome, Side::Asset, asset_out)?;
        min_asset = min_asset.min(asset_out);
    }

    ledger.burn_complete_set(Side::Asset, min_asset)?;
    let stable_out = amm.spot.feeless_swap(SwapDirection::Sell, min_asset)?;
    stable_out.safe_sub(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::split::quantum_split;
    use crate::logic::split::tests::{test_amm, test_proposal};

    fn ledger_for(amm: &Amm) -> OutcomeLedger {
        let locked = amm.proposal.unwrap();
        OutcomeLedger {
            owner: Pubkey::default(),
            amm: Pubkey::default(),
            proposal_id: locked.id,
            outcome_count: locked.outcome_count,
            entries: vec![0; 2 * locked.outcome_count as usize],
            bump: 255,
        }
    }

    fn split_amm() -> Amm {
        let mut amm = test_amm(5_000);
        amm.spot.add_liquidity(1_000_000, 1_000_000).unwrap();
        quantum_split(&mut amm, &test_proposal(1, 2), 0).unwrap();
        amm
    }

    #[test]
    fn test_balanced_prices_yield_no_cycle() {
        let mut amm = split_amm();
        let mut ledger = ledger_for(&amm);
        let err = execute(&mut amm, &mut ledger, 100_000).unwrap_err();
        assert_eq!(err, PrismError::NoProfitableCycle.into());
    }

    #[test]
    fn test_cheap_spot_cycle_is_profitable() {
        let mut amm = split_amm();
        // Push every conditional price above spot
        for outcome in 0..2 {
            let pool = amm.conditional_mut(outcome).unwrap();
            pool.feeless_swap(SwapDirection::Buy, 200_000).unwrap();
        }
        let mut ledger = ledger_for(&amm);

        let result = execute(&mut amm, &mut ledger, 100_000).unwrap();
        assert_eq!(result.direction, ArbDirection::SpotToConditionals);
        assert!(result.profit > 0);
        assert_eq!(amm.spot.stable_fees, result.profit);
    }

    #[test]
    fn test_rich_spot_cycle_is_profitable() {
        let mut amm = split_amm();
        // Push spot price above the conditionals
        amm.spot.feeless_swap(SwapDirection::Buy, 300_000).unwrap();
        let mut ledger = ledger_for(&amm);

        let result = execute(&mut amm, &mut ledger, 100_000).unwrap();
        assert_eq!(result.direction, ArbDirection::ConditionalsToSpot);
        assert!(result.profit > 0);
    }

    #[test]
    fn test_cycle_narrows_price_gap() {
        let mut amm = split_amm();
        for outcome in 0..2 {
            let pool = amm.conditional_mut(outcome).unwrap();
            pool.feeless_swap(SwapDirection::Buy, 200_000).unwrap();
        }
        let gap_before = amm.conditionals[0].price().unwrap() as i128
            - amm.spot.price().unwrap() as i128;
        let mut ledger = ledger_for(&amm);
        execute(&mut amm, &mut ledger, 100_000).unwrap();
        let gap_after = amm.conditionals[0].price().unwrap() as i128
            - amm.spot.price().unwrap() as i128;
        assert!(gap_after < gap_before);
    }

    #[test]
    fn test_remainders_stay_as_dust() {
        let mut amm = split_amm();
        // Asymmetric conditional prices: outcome 0 well above outcome 1
        amm.conditional_mut(0)
            .unwrap()
            .feeless_swap(SwapDirection::Buy, 300_000)
            .unwrap();
        amm.conditional_mut(1)
            .unwrap()
            .feeless_swap(SwapDirection::Buy, 50_000)
            .unwrap();
        let mut ledger = ledger_for(&amm);

        let result = execute(&mut amm, &mut ledger, 100_000).unwrap();
        assert!(result.profit > 0);
        // The shared minimum was burned; the richer outcome keeps dust
        assert!(ledger.balance(0, Side::Stable).unwrap() > 0);
        assert_eq!(
            ledger.complete_set_size(Side::Stable).unwrap(),
            ledger.balance(1, Side::Stable).unwrap()
        );
    }
}
