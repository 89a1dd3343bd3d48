//! Protocol-wide constants

use anchor_lang::prelude::*;

// ============================================================================
// PDA Seeds
// ============================================================================

#[constant]
pub const AMM_SEED: &[u8] = b"amm";

#[constant]
pub const POSITION_SEED: &[u8] = b"position";

#[constant]
pub const LEDGER_SEED: &[u8] = b"ledger";

#[constant]
pub const ARB_LEDGER_SEED: &[u8] = b"arb";

#[constant]
pub const ASSET_VAULT_SEED: &[u8] = b"asset_vault";

#[constant]
pub const STABLE_VAULT_SEED: &[u8] = b"stable_vault";

#[constant]
pub const PROPOSAL_SEED: &[u8] = b"proposal";

// ============================================================================
// Market Limits
// ============================================================================

/// Maximum number of proposal outcomes a market can be split across.
/// Outcome-indexed state is sized as data, never as types, so raising this
/// only changes account space.
pub const MAX_OUTCOMES: usize = 64;

/// Ledger entry capacity: one entry per `(outcome, side)` pair.
pub const MAX_LEDGER_ENTRIES: usize = 2 * MAX_OUTCOMES;

/// A split ratio, like every other rate in the protocol, is expressed in
/// basis points.
pub const MAX_BPS: u16 = 10_000;

/// Upper bound on swap fees so a misconfigured market cannot confiscate
/// trade input.
pub const MAX_FEE_BPS: u16 = 1_000;

// ============================================================================
// Pricing
// ============================================================================

/// Prices are stored as stable units per asset unit scaled by 1e12.
pub const PRICE_SCALE: u128 = 1_000_000_000_000;

/// Minimum seconds between TWAP observations. Once a minute bounds how fast
/// a bursty manipulator can move the observation while still letting normal
/// trading keep the oracle fresh.
pub const TWAP_UPDATE_INTERVAL_SECS: i64 = 60;

// ============================================================================
// Cranks
// ============================================================================

/// Default minimum interval between permissionless crank invocations.
pub const DEFAULT_CRANK_INTERVAL_SECS: i64 = 60;

/// Number of rungs on the arbitrage search ladder.
pub const ARB_SEARCH_STEPS: u64 = 100;
