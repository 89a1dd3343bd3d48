//! Spot market bucket ledger
//!
//! The always-present base market every conditional market mirrors from and
//! recombines into. Reserves and LP supply are partitioned into the three
//! buckets; swaps price against `live + transitioning` while `withdraw_only`
//! holds claimable liquidity that never trades again.

use anchor_lang::prelude::*;
use integer_sqrt::IntegerSquareRoot;

use crate::constants::{MAX_BPS, PRICE_SCALE};
use crate::error::PrismError;
use crate::state::bucket::{Bucket, BucketedBalance};
use crate::state::oracle::TwapOracle;
use crate::utils::{proportional_share, SafeMath};

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpotPool {
    pub asset: BucketedBalance,
    pub stable: BucketedBalance,
    pub lp_supply: BucketedBalance,
    /// Accrued protocol fees, held outside the priced reserves.
    pub asset_fees: u64,
    pub stable_fees: u64,
    pub oracle: TwapOracle,
}

/// Swap direction. `Buy` trades stable in for asset out.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    Buy,
    Sell,
}

impl SpotPool {
    pub fn new(oracle: TwapOracle) -> Self {
        Self {
            oracle,
            ..Default::default()
        }
    }

    /// Reserves that participate in pricing: `live + transitioning`.
    pub fn trading_reserves(&self) -> Result<(u64, u64)> {
        Ok((self.asset.trading()?, self.stable.trading()?))
    }

    pub fn k(&self) -> Result<u128> {
        let (asset, stable) = self.trading_reserves()?;
        Ok(asset as u128 * stable as u128)
    }

    /// Instantaneous price over the trading reserves, scaled by 1e12.
    pub fn price(&self) -> Result<u128> {
        let (asset, stable) = self.trading_reserves()?;
        require_neq!(asset, 0, PrismError::InsufficientLiquidity);
        Ok((stable as u128).safe_mul(PRICE_SCALE)? / asset as u128)
    }

    /// Record a TWAP observation. Called before any change to the reserves.
    pub fn update_twap(&mut self, now: i64) -> Result<Option<u128>> {
        let (asset, stable) = self.trading_reserves()?;
        self.oracle.observe(now, asset, stable)
    }

    // ------------------------------------------------------------------------
    // Liquidity
    // ------------------------------------------------------------------------

    /// Deposit both sides, minting LP into the `Live` bucket. The first
    /// deposit mints `sqrt(asset_in * stable_in)`; later deposits mint
    /// pro-rata against the live cohort, floor division.
    pub fn add_liquidity(&mut self, asset_in: u64, stable_in: u64) -> Result<u64> {
        require!(asset_in > 0 && stable_in > 0, PrismError::ZeroAmount);

        let lp_minted = if self.lp_supply.live == 0 {
            (asset_in as u128 * stable_in as u128).integer_sqrt() as u64
        } else {
            let by_asset = proportional_share(asset_in, self.lp_supply.live, self.asset.live)?;
            let by_stable = proportional_share(stable_in, self.lp_supply.live, self.stable.live)?;
            std::cmp::min(by_asset, by_stable)
        };
        require!(lp_minted > 0, PrismError::ZeroAmount);

        self.asset.deposit(Bucket::Live, asset_in)?;
        self.stable.deposit(Bucket::Live, stable_in)?;
        self.lp_supply.deposit(Bucket::Live, lp_minted)?;

        Ok(lp_minted)
    }

    /// Burn live LP for its proportional share of the live reserves. Only
    /// legal from `Live`, i.e. before a withdrawal request.
    pub fn remove_from_live(&mut self, lp_amount: u64) -> Result<(u64, u64)> {
        require!(lp_amount > 0, PrismError::ZeroAmount);
        require_gte!(
            self.lp_supply.live,
            lp_amount,
            PrismError::InsufficientLiquidity
        );

        let asset_out = proportional_share(self.asset.live, lp_amount, self.lp_supply.live)?;
        let stable_out = proportional_share(self.stable.live, lp_amount, self.lp_supply.live)?;

        self.lp_supply.withdraw(Bucket::Live, lp_amount)?;
        self.asset.withdraw(Bucket::Live, asset_out)?;
        self.stable.withdraw(Bucket::Live, stable_out)?;

        Ok((asset_out, stable_out))
    }

    /// Pay out withdraw-only LP. The floor-division share guarantees the sum
    /// of all claims never exceeds the bucket; dust stays behind.
    pub fn claim_from_withdraw_only(&mut self, lp_amount: u64) -> Result<(u64, u64)> {
        require!(lp_amount > 0, PrismError::ZeroAmount);
        require_gte!(
            self.lp_supply.withdraw_only,
            lp_amount,
            PrismError::InsufficientLiquidity
        );

        let asset_out =
            proportional_share(self.asset.withdraw_only, lp_amount, self.lp_supply.withdraw_only)?;
        let stable_out = proportional_share(
            self.stable.withdraw_only,
            lp_amount,
            self.lp_supply.withdraw_only,
        )?;

        self.lp_supply.withdraw(Bucket::WithdrawOnly, lp_amount)?;
        self.asset.withdraw(Bucket::WithdrawOnly, asset_out)?;
        self.stable.withdraw(Bucket::WithdrawOnly, stable_out)?;

        Ok((asset_out, stable_out))
    }

    // ------------------------------------------------------------------------
    // Swaps
    // ------------------------------------------------------------------------

    /// Fee-charging user swap. A protocol fee is skimmed off the input, the
    /// LP fee is folded into the curve denominator, and the constant product
    /// over the trading reserves must not decrease.
    pub fn swap(
        &mut self,
        direction: SwapDirection,
        amount_in: u64,
        lp_fee_bps: u16,
        protocol_fee_bps: u16,
        now: i64,
    ) -> Result<u64> {
        require!(amount_in > 0, PrismError::ZeroAmount);

        self.update_twap(now)?;

        let net_in = (amount_in as u128)
            .safe_mul((MAX_BPS - protocol_fee_bps) as u128)?
            .safe_div(MAX_BPS as u128)? as u64;
        let protocol_fee = amount_in.safe_sub(net_in)?;
        match direction {
            SwapDirection::Buy => self.stable_fees = self.stable_fees.safe_add(protocol_fee)?,
            SwapDirection::Sell => self.asset_fees = self.asset_fees.safe_add(protocol_fee)?,
        }

        let k_before = self.k()?;
        let amount_out = self.apply_curve(direction, net_in, lp_fee_bps)?;
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
                self.stable.credit_trading(amount_in)?;
                self.asset.debit_trading(amount_out)?;
            }
            SwapDirection::Sell => {
                self.asset.credit_trading(amount_in)?;
                self.stable.debit_trading(amount_out)?;
            }
        }

        Ok(amount_out)
    }
}
