//! Core data structures shared across the swarm
//!
//! Swap direction, agent mode, per-agent timing/amount settings, and the
//! two configuration shapes (environment-driven `SwarmConfig`, TOML-driven
//! `SimulationConfig`).
//!
//! Created: 2026-10-19

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which side of the pool a swap pays into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Pay token A, receive token B
    AToB,
    /// Pay token B, receive token A
    BToA,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SwapDirection::AToB => write!(f, "A->B"),
            SwapDirection::BToA => write!(f, "B->A"),
        }
    }
}

/// Operating mode of an agent, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentMode {
    /// Pool swaps only, no chain access
    Simulation,
    /// Pool swaps plus native-currency transfers
    Live,
    /// Pool swaps plus ERC20 token transfers
    LiveToken,
}

impl AgentMode {
    pub fn is_live(&self) -> bool {
        !matches!(self, AgentMode::Simulation)
    }
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AgentMode::Simulation => write!(f, "simulation"),
            AgentMode::Live => write!(f, "live"),
            AgentMode::LiveToken => write!(f, "live-token"),
        }
    }
}

/// 1 token with 18 decimals
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Timing and sizing knobs for a single agent
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Simulated swap cadence
    pub swap_interval: Duration,
    /// Live transaction cadence (slow, to stay under RPC rate limits)
    pub tx_interval: Duration,
    /// Swap amounts are drawn uniformly from `1..=max_swap_amount`
    pub max_swap_amount: u64,
    /// Value of each native transfer, in wei
    pub native_transfer_amount: U256,
    /// Value of each token transfer, in token base units
    pub token_transfer_amount: U256,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            swap_interval: Duration::from_millis(500),
            tx_interval: Duration::from_secs(10),
            max_swap_amount: 100,
            native_transfer_amount: U256::from(1u64),
            token_transfer_amount: U256::from(ONE_TOKEN),
        }
    }
}

/// Process configuration (from env)
#[derive(Debug, Clone)]
pub struct SwarmConfig {
    // Network
    pub rpc_url: String,
    pub expected_chain_id: u64,

    // Swarm size
    pub bot_count: usize,

    // Wallet (both required for live mode)
    pub wallet_address: Option<Address>,
    pub signer: Option<PrivateKeySigner>,

    // ERC20 contract; when set, live agents transfer tokens instead of native currency
    pub token_address: Option<Address>,
}

impl SwarmConfig {
    /// True when the config carries everything needed to sign and send
    pub fn is_live(&self) -> bool {
        self.wallet_address.is_some() && self.signer.is_some()
    }
}

/// Pool section of the simulation TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolSettings {
    #[serde(default = "default_token_a")]
    pub token_a: String,
    #[serde(default = "default_token_b")]
    pub token_b: String,
    #[serde(default = "default_reserve_a")]
    pub reserve_a: u64,
    #[serde(default = "default_reserve_b")]
    pub reserve_b: u64,
}

fn default_token_a() -> String { "ETH".to_string() }
fn default_token_b() -> String { "USDC".to_string() }
fn default_reserve_a() -> u64 { 1_000_000_000 }
fn default_reserve_b() -> u64 { 2_000_000_000 }

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            token_a: default_token_a(),
            token_b: default_token_b(),
            reserve_a: default_reserve_a(),
            reserve_b: default_reserve_b(),
        }
    }
}

/// Agent section of the simulation TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentTiming {
    #[serde(default = "default_swap_interval")]
    pub swap_interval_ms: u64,
    #[serde(default = "default_tx_interval")]
    pub tx_interval_ms: u64,
    #[serde(default = "default_max_swap_amount")]
    pub max_swap_amount: u64,
}

fn default_swap_interval() -> u64 { 500 }
fn default_tx_interval() -> u64 { 10_000 }
fn default_max_swap_amount() -> u64 { 100 }

impl Default for AgentTiming {
    fn default() -> Self {
        Self {
            swap_interval_ms: default_swap_interval(),
            tx_interval_ms: default_tx_interval(),
            max_swap_amount: default_max_swap_amount(),
        }
    }
}

/// Simulation parameters, optionally read from a TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub pool: PoolSettings,
    #[serde(default)]
    pub agent: AgentTiming,
}

impl SimulationConfig {
    /// Build agent settings from the TOML timing section
    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            swap_interval: Duration::from_millis(self.agent.swap_interval_ms),
            tx_interval: Duration::from_millis(self.agent.tx_interval_ms),
            max_swap_amount: self.agent.max_swap_amount,
            ..AgentSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_display() {
        assert_eq!(SwapDirection::AToB.to_string(), "A->B");
        assert_eq!(SwapDirection::BToA.to_string(), "B->A");
    }

    #[test]
    fn test_agent_settings_from_timing() {
        let sim = SimulationConfig {
            agent: AgentTiming {
                swap_interval_ms: 20,
                tx_interval_ms: 100,
                max_swap_amount: 7,
            },
            ..Default::default()
        };

        let settings = sim.agent_settings();
        assert_eq!(settings.swap_interval, Duration::from_millis(20));
        assert_eq!(settings.tx_interval, Duration::from_millis(100));
        assert_eq!(settings.max_swap_amount, 7);
        assert_eq!(settings.native_transfer_amount, U256::from(1u64));
    }

    #[test]
    fn test_mode_is_live() {
        assert!(!AgentMode::Simulation.is_live());
        assert!(AgentMode::Live.is_live());
        assert!(AgentMode::LiveToken.is_live());
    }
}
