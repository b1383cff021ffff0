//! Price Calculator
//!
//! Constant product math (x * y = k) with zero fee and floor rounding.
//! Stateless: every function takes the reserves it works on.
//!
//! Created: 2026-10-19

use alloy::primitives::U256;

/// Pure constant-product calculations
pub struct PriceCalculator;

impl PriceCalculator {
    /// Output amount for a zero-fee swap.
    ///
    /// Formula: amount_out = floor(reserve_out * amount_in / (reserve_in + amount_in))
    ///
    /// Returns `None` if an intermediate value overflows 256 bits.
    pub fn get_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Option<U256> {
        if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
            return Some(U256::ZERO);
        }

        let numerator = reserve_out.checked_mul(amount_in)?;
        let denominator = reserve_in.checked_add(amount_in)?;

        Some(numerator / denominator)
    }

    /// `numerator / denominator` as f64.
    ///
    /// Values wider than 128 bits are shifted down together first so the
    /// ratio keeps its leading bits instead of saturating.
    pub fn ratio(numerator: U256, denominator: U256) -> f64 {
        if denominator.is_zero() {
            return 0.0;
        }

        let widest = numerator.bit_len().max(denominator.bit_len());
        let shift = widest.saturating_sub(128);
        let num = (numerator >> shift).to::<u128>() as f64;
        let den = (denominator >> shift).to::<u128>() as f64;

        if den == 0.0 {
            return f64::INFINITY;
        }

        num / den
    }
}
