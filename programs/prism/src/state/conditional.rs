//! Conditional (per-outcome) market state
//!
//! One pool per proposal outcome, created by the quantum split and destroyed
//! at recombination. Reserves here are virtual: their backing moved out of
//! the spot market at split time and either returns (winning outcome) or is
//! forfeited (losing outcomes). Conditional markets never hold withdrawable,
//! inert liquidity, so each quantity is a two-way `live`/`transitioning`
//! partition.

use anchor_lang::prelude::*;

use crate::constants::PRICE_SCALE;
use crate::error::PrismError;
use crate::state::bucket::SplitBalance;
use crate::state::oracle::TwapOracle;
use crate::state::spot::SwapDirection;
use crate::utils::SafeMath;

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConditionalPool {
    pub outcome: u8,
    pub asset: SplitBalance,
    pub stable: SplitBalance,
    pub lp_supply: SplitBalance,
    pub oracle: TwapOracle,
}

impl ConditionalPool {
    /// Seed a conditional market from the spot market's split amounts. Each
    /// quantity mirrors the same live/transitioning partition the spot side
    /// gave up.
    pub fn new(
        outcome: u8,
        asset: SplitBalance,
        stable: SplitBalance,
        lp_supply: SplitBalance,
        oracle: TwapOracle,
    ) -> Self {
        Self {
            outcome,
            asset,
            stable,
            lp_supply,
            oracle,
        }
    }

    /// Both buckets trade; transitioning liquidity keeps earning until
    /// recombination.
    pub fn trading_reserves(&self) -> Result<(u64, u64)> {
        Ok((self.asset.total()?, self.stable.total()?))
    }

    pub fn k(&self) -> Result<u128> {
        let (asset, stable) = self.trading_reserves()?;
        Ok(asset as u128 * stable as u128)
    }

    /// Implied price of the asset under this outcome, scaled by 1e12.
    pub fn price(&self) -> Result<u128> {
        let (asset, stable) = self.trading_reserves()?;
        require_neq!(asset, 0, PrismError::InsufficientLiquidity);
        Ok((stable as u128).safe_mul(PRICE_SCALE)? / asset as u128)
    }

    pub fn update_twap(&mut self, now: i64) -> Result<Option<u128>> {
        let (asset, stable) = self.trading_reserves()?;
        self.oracle.observe(now, asset, stable)
    }

    /// Fee-charging swap against this outcome's virtual reserves. The LP fee
    /// stays in the reserves, growing k for the cohort that wins.
    pub fn swap(
        &mut self,
        direction: SwapDirection,
        amount_in: u64,
        lp_fee_bps: u16,
        now: i64,
    ) -> Result<u64> {
        require!(amount_in > 0, PrismError::ZeroAmount);
        self.update_twap(now)?;
        let k_before = self.k()?;
        let amount_out = self.apply_curve(direction, amount_in, lp_fee_bps)?;
        require_gte!(self.k()?, k_before, PrismError::KInvariantViolated);
        Ok(amount_out)
    }

    /// Fee-free swap used by the arbitrage path.
    pub fn feeless_swap(&mut self, direction: SwapDirection, amount_in: u64) -> Result<u64> {
        require!(amount_in > 0, PrismError::ZeroAmount);
        let k_before = self.k()?;
        let amount_out = self.apply_curve(direction, amount_in, 0)?;
        require_gte!(self.k()?, k_before, PrismError::KInvariantViolated);
        Ok(amount_out)
    }

    /// Quote a feeless swap without mutating the pool.
    pub fn simulate_swap(&self, direction: SwapDirection, amount_in: u64) -> Result<u64> {
        let mut pool = *self;
        pool.feeless_swap(direction, amount_in)
    }

    fn apply_curve(
        &mut self,
        direction: SwapDirection,
        amount_in: u64,
        lp_fee_bps: u16,
    ) -> Result<u64> {
        let (asset_reserve, stable_reserve) = self.trading_reserves()?;
        let (in_reserve, out_reserve) = match direction {
            SwapDirection::Buy => (stable_reserve, asset_reserve),
            SwapDirection::Sell => (asset_reserve, stable_reserve),
        };
        require_neq!(in_reserve, 0, PrismError::InsufficientLiquidity);
        require_neq!(out_reserve, 0, PrismError::InsufficientLiquidity);

        let amount_out = crate::logic::swap::constant_product_out(
            amount_in, in_reserve, out_reserve, lp_fee_bps,
        )?;

        match direction {
            SwapDirection::Buy => {
                self.stable.credit(amount_in)?;
                self.asset.debit(amount_out)?;
            }
            SwapDirection::Sell => {
                self.asset.credit(amount_in)?;
                self.stable.debit(amount_out)?;
            }
        }

        Ok(amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ConditionalPool {
        ConditionalPool::new(
            0,
            SplitBalance::new(500_000, 0),
            SplitBalance::new(500_000, 0),
            SplitBalance::new(500_000, 0),
            TwapOracle::new(0, PRICE_SCALE, PRICE_SCALE, 0),
        )
    }

    #[test]
    fn test_swap_prices_both_buckets() {
        let mut p = pool();
        p.asset.shift_to_transitioning(200_000).unwrap();
        p.stable.shift_to_transitioning(200_000).unwrap();
        // Reserves unchanged by the shift: both buckets trade.
        let out = p.feeless_swap(SwapDirection::Buy, 500_000).unwrap();
        assert_eq!(out, 250_000);
    }

    #[test]
    fn test_swap_grows_k_with_fees() {
        let mut p = pool();
        let k_before = p.k().unwrap();
        p.swap(SwapDirection::Sell, 10_000, 30, 0).unwrap();
        assert!(p.k().unwrap() > k_before);
    }

    #[test]
    fn test_price_tracks_reserve_ratio() {
        let mut p = pool();
        assert_eq!(p.price().unwrap(), PRICE_SCALE);
        p.feeless_swap(SwapDirection::Buy, 100_000).unwrap();
        assert!(p.price().unwrap() > PRICE_SCALE);
    }
}
