//! Manipulation-resistant time-weighted average price oracle
//!
//! Raw price TWAPs can be pushed with a few extreme outliers, so the oracle
//! tracks a capped observation that can move at most
//! `max_observation_change` per update, and a minimum interval between
//! updates bounds how many updates a bursty caller can land. The aggregator
//! accumulates `observation * elapsed_seconds`; dividing by total elapsed
//! time yields the TWAP.

use anchor_lang::prelude::*;
use std::cmp::Ordering;

use crate::constants::{PRICE_SCALE, TWAP_UPDATE_INTERVAL_SECS};
use crate::error::PrismError;

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TwapOracle {
    /// Running sum of `last_observation * seconds_since_last_update`.
    /// Wraps rather than aborting on overflow; readers are expected to
    /// sanity-check an aggregator at T2 being smaller than one at T1.
    pub aggregator: u128,
    pub last_updated_ts: i64,
    pub created_at_ts: i64,
    /// Stable units per asset unit, scaled by 1e12.
    pub last_price: u128,
    /// The capped value that actually feeds the aggregator.
    pub last_observation: u128,
    /// The most an observation can move per update.
    pub max_observation_change: u128,
    pub initial_observation: u128,
    /// Seconds after creation before the aggregator starts recording.
    pub start_delay_secs: u32,
}

impl TwapOracle {
    pub fn new(
        now: i64,
        initial_observation: u128,
        max_observation_change: u128,
        start_delay_secs: u32,
    ) -> Self {
        Self {
            aggregator: 0,
            last_updated_ts: now,
            created_at_ts: now,
            last_price: 0,
            last_observation: initial_observation,
            max_observation_change,
            initial_observation,
            start_delay_secs,
        }
    }

    /// Record an observation from current reserves. Called before any change
    /// to the reserves it prices. Returns the observation if one was taken.
    pub fn observe(
        &mut self,
        now: i64,
        asset_reserve: u64,
        stable_reserve: u64,
    ) -> Result<Option<u128>> {
        if now < self.last_updated_ts + TWAP_UPDATE_INTERVAL_SECS {
            return Ok(None);
        }
        if asset_reserve == 0 || stable_reserve == 0 {
            return Ok(None);
        }

        let price = (stable_reserve as u128 * PRICE_SCALE) / asset_reserve as u128;

        let new_observation = if price > self.last_observation {
            let ceiling = self
                .last_observation
                .saturating_add(self.max_observation_change);
            std::cmp::min(price, ceiling)
        } else {
            let floor = self
                .last_observation
                .saturating_sub(self.max_observation_change);
            std::cmp::max(price, floor)
        };

        // Before the start delay has passed, the observation still tracks the
        // market but the aggregator stays untouched.
        let start_ts = self.created_at_ts + self.start_delay_secs as i64;
        let new_aggregator = if now <= start_ts {
            self.aggregator
        } else {
            let effective_last = self.last_updated_ts.max(start_ts);
            let elapsed: u128 = (now - effective_last)
                .try_into()
                .map_err(|_| PrismError::InvalidTimestamp)?;
            // Saturation here only wraps the aggregator back around; it must
            // not abort the swap carrying the update.
            let weighted = new_observation.saturating_mul(elapsed);
            self.aggregator.wrapping_add(weighted)
        };

        require_gt!(now, self.last_updated_ts, PrismError::InvalidTimestamp);

        // The capped observation always lands between the previous
        // observation and the spot price.
        match price.cmp(&self.last_observation) {
            Ordering::Greater => {
                require_gte!(new_observation, self.last_observation);
                require_gte!(price, new_observation);
            }
            Ordering::Equal => {
                require_eq!(new_observation, price);
            }
            Ordering::Less => {
                require_gte!(self.last_observation, new_observation);
                require_gte!(new_observation, price);
            }
        }

        self.aggregator = new_aggregator;
        self.last_updated_ts = now;
        self.last_price = price;
        self.last_observation = new_observation;

        Ok(Some(new_observation))
    }

    /// Time-weighted average price since recording started.
    pub fn twap(&self) -> Result<u128> {
        let start_ts = self.created_at_ts + self.start_delay_secs as i64;
        require_gt!(
            self.last_updated_ts,
            start_ts,
            PrismError::InsufficientTwapDuration
        );
        let elapsed = (self.last_updated_ts - start_ts) as u128;
        require_neq!(self.aggregator, 0, PrismError::InsufficientTwapDuration);
        Ok(self.aggregator / elapsed)
    }
}
