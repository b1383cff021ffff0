//! Pool module for the bot swarm
//!
//! Constant-product math and the lock-guarded pool every agent trades against.
//!
//! Created: 2026-10-19

pub mod calculator;
pub mod state;

pub use calculator::PriceCalculator;
pub use state::{PoolError, PoolSnapshot, SharedPool};
