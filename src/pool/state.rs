//! Shared Pool State
//!
//! Thread-safe constant-product pool shared by every agent in a swarm.
//! Each public operation takes the pool's own lock for its full
//! read-modify-write, so callers never see a torn reserve pair and never
//! coordinate locking themselves.
//!
//! Created: 2026-10-19

use super::calculator::PriceCalculator;
use crate::types::SwapDirection;
use alloy::primitives::{U256, U512};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

/// Errors raised by pool operations. None of them mutate the pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("amount must be positive")]
    InvalidAmount,

    #[error("reserve {0} must be positive")]
    EmptyReserve(String),

    #[error("swap overflows 256-bit arithmetic")]
    Overflow,
}

#[derive(Debug)]
struct Reserves {
    a: U256,
    b: U256,
}

/// Point-in-time view of the pool, for logging and reports
#[derive(Debug, Clone, Serialize)]
pub struct PoolSnapshot {
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: String,
    pub reserve_b: String,
    pub price_a_in_b: f64,
}

/// Constant-product pool (x * y = k, zero fee, floor rounding)
#[derive(Debug)]
pub struct SharedPool {
    token_a: String,
    token_b: String,
    reserves: Mutex<Reserves>,
}

impl SharedPool {
    /// Create a pool. Both reserves must be non-zero.
    pub fn new(
        token_a: impl Into<String>,
        token_b: impl Into<String>,
        reserve_a: U256,
        reserve_b: U256,
    ) -> Result<Self, PoolError> {
        let token_a = token_a.into();
        let token_b = token_b.into();

        if reserve_a.is_zero() {
            return Err(PoolError::EmptyReserve(token_a));
        }
        if reserve_b.is_zero() {
            return Err(PoolError::EmptyReserve(token_b));
        }

        Ok(Self {
            token_a,
            token_b,
            reserves: Mutex::new(Reserves {
                a: reserve_a,
                b: reserve_b,
            }),
        })
    }

    pub fn token_a(&self) -> &str {
        &self.token_a
    }

    pub fn token_b(&self) -> &str {
        &self.token_b
    }

    /// Swap `amount_in` into the pool and return what comes out.
    ///
    /// The output is computed from the pre-swap reserves and both reserves
    /// are updated under the same lock.
    pub fn swap(&self, direction: SwapDirection, amount_in: U256) -> Result<U256, PoolError> {
        if amount_in.is_zero() {
            return Err(PoolError::InvalidAmount);
        }

        let mut reserves = self.reserves.lock();
        let (reserve_in, reserve_out) = match direction {
            SwapDirection::AToB => (reserves.a, reserves.b),
            SwapDirection::BToA => (reserves.b, reserves.a),
        };

        let amount_out = PriceCalculator::get_amount_out(amount_in, reserve_in, reserve_out)
            .ok_or(PoolError::Overflow)?;
        // amount_out < reserve_out always holds, so only the input side can overflow
        let new_in = reserve_in.checked_add(amount_in).ok_or(PoolError::Overflow)?;
        let new_out = reserve_out - amount_out;

        match direction {
            SwapDirection::AToB => {
                reserves.a = new_in;
                reserves.b = new_out;
            }
            SwapDirection::BToA => {
                reserves.b = new_in;
                reserves.a = new_out;
            }
        }

        trace!(
            "Swap {} | in={} out={} | reserves=({}, {})",
            direction, amount_in, amount_out, reserves.a, reserves.b
        );

        Ok(amount_out)
    }

    /// Price of token A in token B (reserve_b / reserve_a)
    pub fn price_a_in_b(&self) -> f64 {
        let reserves = self.reserves.lock();
        PriceCalculator::ratio(reserves.b, reserves.a)
    }

    /// Price of token B in token A (reserve_a / reserve_b)
    pub fn price_b_in_a(&self) -> f64 {
        let reserves = self.reserves.lock();
        PriceCalculator::ratio(reserves.a, reserves.b)
    }

    /// Consistent (reserve_a, reserve_b) pair
    pub fn reserves(&self) -> (U256, U256) {
        let reserves = self.reserves.lock();
        (reserves.a, reserves.b)
    }

    /// The constant product k = reserve_a * reserve_b
    pub fn invariant(&self) -> U512 {
        let (a, b) = self.reserves();
        U512::from(a) * U512::from(b)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let (a, b) = self.reserves();
        PoolSnapshot {
            token_a: self.token_a.clone(),
            token_b: self.token_b.clone(),
            reserve_a: a.to_string(),
            reserve_b: b.to_string(),
            price_a_in_b: PriceCalculator::ratio(b, a),
        }
    }
}
