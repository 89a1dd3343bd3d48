/// Provides overflow-safe arithmetic operations for all numerical calculations.
/// Prevents integer overflow from corrupting reserve and supply accounting by
/// using checked arithmetic that returns errors instead of wrapping. A failed
/// check aborts the whole transaction; amounts are never silently clamped.

use anchor_lang::prelude::*;
use crate::error::PrismError;

// ============================================================================
// Type Definitions
// ============================================================================

pub trait SafeMath<T> {
    fn safe_add(self, v: T) -> Result<T>;
    fn safe_sub(self, v: T) -> Result<T>;
    fn safe_mul(self, v: T) -> Result<T>;
    fn safe_div(self, v: T) -> Result<T>;
}

// ============================================================================
// Core Implementation
// ============================================================================

macro_rules! impl_safe_math {
    ($type:ty) => {
        impl SafeMath<$type> for $type {
            fn safe_add(self, v: $type) -> Result<$type> {
                self.checked_add(v).ok_or_else(|| {
                    msg!("Math overflow in safe_add: {} + {}", self, v);
                    PrismError::ArithmeticOverflow.into()
                })
            }

            fn safe_sub(self, v: $type) -> Result<$type> {
                self.checked_sub(v).ok_or_else(|| {
                    msg!("Math underflow in safe_sub: {} - {}", self, v);
                    PrismError::ArithmeticUnderflow.into()
                })
            }

            fn safe_mul(self, v: $type) -> Result<$type> {
                self.checked_mul(v).ok_or_else(|| {
                    msg!("Math overflow in safe_mul: {} * {}", self, v);
                    PrismError::ArithmeticOverflow.into()
                })
            }

            fn safe_div(self, v: $type) -> Result<$type> {
                if v == 0 {
                    msg!("Division by zero in safe_div: {} / {}", self, v);
                    return Err(PrismError::DivisionByZero.into());
                }
                self.checked_div(v).ok_or_else(|| {
                    msg!("Math error in safe_div: {} / {}", self, v);
                    PrismError::ArithmeticOverflow.into()
                })
            }
        }
    };
}

// Implement SafeMath for common integer types
impl_safe_math!(u16);
impl_safe_math!(u32);
impl_safe_math!(u64);
impl_safe_math!(u128);
impl_safe_math!(i64);
impl_safe_math!(i128);

// ============================================================================
// Proportional Shares
// ============================================================================

/// Floor-division pro-rata share: `amount * numerator / denominator`.
///
/// Every proportional bucket move in the protocol routes through this so that
/// the sum of all claims never exceeds the bucket it draws on; rounding dust
/// stays behind.
pub fn proportional_share(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Err(PrismError::DivisionByZero.into());
    }
    let share = (amount as u128).safe_mul(numerator as u128)? / denominator as u128;
    // Fits back into u64 whenever numerator <= denominator; checked otherwise.
    u64::try_from(share).map_err(|_| PrismError::ArithmeticOverflow.into())
}

// ============================================================================
// Tests
// ============================================================================
