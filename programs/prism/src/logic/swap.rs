//! Constant-product swap math
//!
//! The curve itself is deliberately unremarkable: any curve where reserves
//! scale monotonically with bucket size works for the split/recombine
//! machinery. This is the uniswap v1 form with the LP fee folded into the
//! denominator.

use anchor_lang::prelude::*;

use crate::constants::MAX_BPS;
use crate::error::PrismError;
use crate::utils::SafeMath;

/// Output amount for `amount_in` against `(in_reserve, out_reserve)` after an
/// LP fee of `lp_fee_bps`.
pub fn constant_product_out(
    amount_in: u64,
    in_reserve: u64,
    out_reserve: u64,
    lp_fee_bps: u16,
) -> Result<u64> {
    require_neq!(in_reserve, 0, PrismError::InsufficientLiquidity);
    require_neq!(out_reserve, 0, PrismError::InsufficientLiquidity);
    require_gte!(MAX_BPS, lp_fee_bps, PrismError::InvalidConfig);

    let in_with_fee = (amount_in as u128).safe_mul((MAX_BPS - lp_fee_bps) as u128)?;
    let numerator = in_with_fee.safe_mul(out_reserve as u128)?;
    let denominator = (in_reserve as u128)
        .safe_mul(MAX_BPS as u128)?
        .safe_add(in_with_fee)?;

    let amount_out = numerator.safe_div(denominator)?;
    // Strictly less than out_reserve for any positive in_reserve.
    Ok(amount_out as u64)
}
