//! Bucketed balance partitions
//!
//! Every pool quantity (asset reserve, stable reserve, LP supply) is
//! partitioned into named buckets with distinct trading and withdrawal
//! eligibility. The partition carries its own recorded total so the
//! conservation law `live + transitioning + withdraw_only == total` can be
//! asserted after every operation.

use anchor_lang::prelude::*;

use crate::error::PrismError;
use crate::utils::{proportional_share, SafeMath};

// ============================================================================
// Bucket
// ============================================================================

/// Named partition of a pool quantity.
///
/// The spot market uses all three buckets. Conditional markets only ever hold
/// `Live` and `Transitioning` liquidity: withdrawable, inert liquidity exists
/// only once it is back in the spot market.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    /// Tradable, no withdrawal requested.
    Live,
    /// Tradable, withdrawal requested, awaiting proposal resolution.
    Transitioning,
    /// Not tradable, claimable.
    WithdrawOnly,
}

// ============================================================================
// Three-way partition (spot market)
// ============================================================================

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketedBalance {
    pub live: u64,
    pub transitioning: u64,
    pub withdraw_only: u64,
    pub total: u64,
}

impl BucketedBalance {
    pub fn amount_in(&self, bucket: Bucket) -> u64 {
        match bucket {
            Bucket::Live => self.live,
            Bucket::Transitioning => self.transitioning,
            Bucket::WithdrawOnly => self.withdraw_only,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut u64 {
        match bucket {
            Bucket::Live => &mut self.live,
            Bucket::Transitioning => &mut self.transitioning,
            Bucket::WithdrawOnly => &mut self.withdraw_only,
        }
    }

    /// Add externally supplied value to a bucket.
    pub fn deposit(&mut self, bucket: Bucket, amount: u64) -> Result<()> {
        let slot = self.bucket_mut(bucket);
        *slot = slot.safe_add(amount)?;
        self.total = self.total.safe_add(amount)?;
        self.check_conserved()
    }

    /// Remove value from a bucket, handing it back to the caller.
    pub fn withdraw(&mut self, bucket: Bucket, amount: u64) -> Result<()> {
        require_gte!(
            self.amount_in(bucket),
            amount,
            PrismError::InsufficientLiquidity
        );
        let slot = self.bucket_mut(bucket);
        *slot = slot.safe_sub(amount)?;
        self.total = self.total.safe_sub(amount)?;
        self.check_conserved()
    }

    /// Move value between buckets without changing the total.
    pub fn shift(&mut self, from: Bucket, to: Bucket, amount: u64) -> Result<()> {
        require_gte!(
            self.amount_in(from),
            amount,
            PrismError::InsufficientLiquidity
        );
        let src = self.bucket_mut(from);
        *src = src.safe_sub(amount)?;
        let dst = self.bucket_mut(to);
        *dst = dst.safe_add(amount)?;
        self.check_conserved()
    }

    /// The portion that participates in swap pricing. `WithdrawOnly` never
    /// trades.
    pub fn trading(&self) -> Result<u64> {
        self.live.safe_add(self.transitioning)
    }

    /// Add swap proceeds to the trading buckets, pro-rata by current bucket
    /// size so the live/transitioning reserve ratio is preserved. Rounding
    /// remainder lands in `transitioning`.
    pub fn credit_trading(&mut self, amount: u64) -> Result<()> {
        let trading = self.trading()?;
        let to_live = if trading == 0 {
            amount
        } else {
            proportional_share(amount, self.live, trading)?
        };
        let to_transitioning = amount.safe_sub(to_live)?;
        self.live = self.live.safe_add(to_live)?;
        self.transitioning = self.transitioning.safe_add(to_transitioning)?;
        self.total = self.total.safe_add(amount)?;
        self.check_conserved()
    }

    /// Remove swap output from the trading buckets, pro-rata by current
    /// bucket size.
    pub fn debit_trading(&mut self, amount: u64) -> Result<()> {
        let trading = self.trading()?;
        require_gte!(trading, amount, PrismError::InsufficientLiquidity);
        let from_live = proportional_share(amount, self.live, trading)?;
        let from_transitioning = amount.safe_sub(from_live)?;
        self.live = self.live.safe_sub(from_live)?;
        self.transitioning = self.transitioning.safe_sub(from_transitioning)?;
        self.total = self.total.safe_sub(amount)?;
        self.check_conserved()
    }

    /// Asserted after every mutation. Unreachable in correct code.
    pub fn check_conserved(&self) -> Result<()> {
        let sum = self
            .live
            .safe_add(self.transitioning)?
            .safe_add(self.withdraw_only)?;
        if sum != self.total {
            msg!(
                "bucket conservation violated: {} + {} + {} != {}",
                self.live,
                self.transitioning,
                self.withdraw_only,
                self.total
            );
            return Err(PrismError::BucketConservationViolation.into());
        }
        Ok(())
    }
}

// ============================================================================
// Two-way partition (conditional markets)
// ============================================================================

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitBalance {
    pub live: u64,
    pub transitioning: u64,
}

impl SplitBalance {
    pub fn new(live: u64, transitioning: u64) -> Self {
        Self { live, transitioning }
    }

    pub fn total(&self) -> Result<u64> {
        self.live.safe_add(self.transitioning)
    }

    /// Add swap proceeds pro-rata by current bucket size; remainder lands in
    /// `transitioning`.
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        let total = self.total()?;
        let to_live = if total == 0 {
            amount
        } else {
            proportional_share(amount, self.live, total)?
        };
        self.live = self.live.safe_add(to_live)?;
        self.transitioning = self.transitioning.safe_add(amount.safe_sub(to_live)?)?;
        Ok(())
    }

    /// Remove swap output pro-rata by current bucket size.
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        let total = self.total()?;
        require_gte!(total, amount, PrismError::InsufficientLiquidity);
        let from_live = proportional_share(amount, self.live, total)?;
        self.live = self.live.safe_sub(from_live)?;
        self.transitioning = self
            .transitioning
            .safe_sub(amount.safe_sub(from_live)?)?;
        Ok(())
    }

    /// Move value from `live` to `transitioning` (withdrawal request while a
    /// proposal is open).
    pub fn shift_to_transitioning(&mut self, amount: u64) -> Result<()> {
        require_gte!(self.live, amount, PrismError::InsufficientLiquidity);
        self.live = self.live.safe_sub(amount)?;
        self.transitioning = self.transitioning.safe_add(amount)?;
        Ok(())
    }

    /// Empty the partition, handing both buckets to the caller. Used by the
    /// recombiner when tearing a conditional market down.
    pub fn drain(&mut self) -> (u64, u64) {
        let out = (self.live, self.transitioning);
        self.live = 0;
        self.transitioning = 0;
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> BucketedBalance {
        let mut b = BucketedBalance::default();
        b.deposit(Bucket::Live, 600).unwrap();
        b.deposit(Bucket::Transitioning, 400).unwrap();
        b
    }

    #[test]
    fn test_deposit_and_shift_conserve_total() {
        let mut b = seeded();
        assert_eq!(b.total, 1_000);
        b.shift(Bucket::Transitioning, Bucket::WithdrawOnly, 400).unwrap();
        assert_eq!(b.total, 1_000);
        assert_eq!(b.withdraw_only, 400);
        b.check_conserved().unwrap();
    }

    #[test]
    fn test_withdraw_more_than_bucket_fails() {
        let mut b = seeded();
        assert!(b.withdraw(Bucket::Live, 601).is_err());
    }

    #[test]
    fn test_trading_excludes_withdraw_only() {
        let mut b = seeded();
        b.shift(Bucket::Transitioning, Bucket::WithdrawOnly, 400).unwrap();
        assert_eq!(b.trading().unwrap(), 600);
    }

    #[test]
    fn test_debit_trading_is_pro_rata() {
        let mut b = seeded();
        b.debit_trading(100).unwrap();
        assert_eq!(b.live, 540);
        assert_eq!(b.transitioning, 360);
        assert_eq!(b.total, 900);
    }

    #[test]
    fn test_debit_trading_full_amount_empties_both() {
        let mut b = seeded();
        b.debit_trading(1_000).unwrap();
        assert_eq!(b.live, 0);
        assert_eq!(b.transitioning, 0);
        assert_eq!(b.total, 0);
    }

    #[test]
    fn test_corrupted_total_is_detected() {
        let mut b = seeded();
        b.total = 999;
        assert!(b.check_conserved().is_err());
    }

    #[test]
    fn test_split_balance_drain() {
        let mut s = SplitBalance::new(500, 400);
        let (live, transitioning) = s.drain();
        assert_eq!((live, transitioning), (500, 400));
        assert_eq!(s.total().unwrap(), 0);
    }
}
