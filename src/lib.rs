//! AMM Bot Swarm Library
//!
//! A swarm of concurrent bots trading against one shared constant-product
//! pool. In live mode the bots also send signed transfers to an EVM chain,
//! drawing nonces from a single shared allocator.
//!
//! Created: 2026-10-19

pub mod chain;
pub mod config;
pub mod contracts;
pub mod nonce;
pub mod pool;
pub mod swarm;
pub mod types;

// Re-export commonly used types
pub use chain::{AlloyChainClient, ChainClient, ChainError};
pub use config::{load_config, load_config_from_file, load_simulation_config};
pub use nonce::NonceAllocator;
pub use pool::{PoolError, SharedPool};
pub use swarm::{AgentReport, LiveConfig, Outcome, OutcomeStream, Swarm, SwarmSummary};
pub use types::{AgentMode, AgentSettings, SimulationConfig, SwapDirection, SwarmConfig};
