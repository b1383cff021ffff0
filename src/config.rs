//! Configuration management
//!
//! Swarm settings come from the environment (optionally seeded from a .env
//! file); pool and agent timing come from an optional TOML file.
//!
//! Created: 2026-10-19

use crate::chain::parse_address;
use crate::types::SimulationConfig;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::str::FromStr;

// Re-export SwarmConfig for external access
pub use crate::types::SwarmConfig;

pub const DEFAULT_RPC_URL: &str = "https://testnet.rpc.nexus.xyz";
pub const DEFAULT_CHAIN_ID: u64 = 3945;
pub const DEFAULT_BOT_COUNT: usize = 3;

/// Load from the process environment, after applying `.env` if present
pub fn load_config() -> Result<SwarmConfig> {
    dotenv::dotenv().ok();
    SwarmConfig::from_lookup(|key| std::env::var(key).ok())
}

/// Load from a specific env file (e.g. `.env.testnet`), then the environment
pub fn load_config_from_file(env_file: &str) -> Result<SwarmConfig> {
    dotenv::from_filename(env_file)
        .with_context(|| format!("Failed to load env file {}", env_file))?;
    SwarmConfig::from_lookup(|key| std::env::var(key).ok())
}

/// Read the simulation TOML. Missing sections and keys fall back to defaults.
pub fn load_simulation_config(path: &Path) -> Result<SimulationConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read simulation config {}", path.display()))?;
    let sim: SimulationConfig = toml::from_str(&raw)
        .with_context(|| format!("Invalid simulation config {}", path.display()))?;
    validate_simulation_config(&sim)
        .with_context(|| format!("Invalid simulation config {}", path.display()))?;
    Ok(sim)
}

/// Reject agent timing that cannot drive a loop
pub fn validate_simulation_config(sim: &SimulationConfig) -> Result<()> {
    if sim.agent.swap_interval_ms == 0 {
        bail!("agent.swap_interval_ms must be at least 1");
    }
    if sim.agent.tx_interval_ms == 0 {
        bail!("agent.tx_interval_ms must be at least 1");
    }
    if sim.agent.max_swap_amount == 0 {
        bail!("agent.max_swap_amount must be at least 1");
    }
    Ok(())
}

impl SwarmConfig {
    /// Build from a key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = get("NEXUS_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let expected_chain_id = match get("NEXUS_CHAIN_ID") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("NEXUS_CHAIN_ID is not a number: {}", raw))?,
            None => DEFAULT_CHAIN_ID,
        };

        let bot_count = match get("BOT_COUNT") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("BOT_COUNT is not a number: {}", raw))?,
            None => DEFAULT_BOT_COUNT,
        };
        if bot_count == 0 {
            bail!("BOT_COUNT must be at least 1");
        }

        let wallet_address = get("WALLET_ADDRESS")
            .map(|raw| parse_address(&raw))
            .transpose()
            .context("Invalid WALLET_ADDRESS")?;

        let signer = get("NEXUS_PRIVATE_KEY")
            .map(|raw| PrivateKeySigner::from_str(&raw))
            .transpose()
            // never echo the key itself
            .context("NEXUS_PRIVATE_KEY is not a valid private key")?;

        let token_address = get("TOKEN_ADDRESS")
            .map(|raw| parse_address(&raw))
            .transpose()
            .context("Invalid TOKEN_ADDRESS")?;

        Ok(Self {
            rpc_url,
            expected_chain_id,
            bot_count,
            wallet_address,
            signer,
            token_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use std::collections::HashMap;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_WALLET: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn create_test_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn from_env(env: &HashMap<String, String>) -> Result<SwarmConfig> {
        SwarmConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = tokio_test::assert_ok!(from_env(&HashMap::new()));

        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.expected_chain_id, 3945);
        assert_eq!(config.bot_count, 3);
        assert!(config.wallet_address.is_none());
        assert!(config.signer.is_none());
        assert!(config.token_address.is_none());
        assert!(!config.is_live());
    }

    #[test]
    fn test_live_config() {
        let env = create_test_env(&[
            ("NEXUS_RPC_URL", "http://localhost:8545"),
            ("NEXUS_CHAIN_ID", "31337"),
            ("BOT_COUNT", "8"),
            ("WALLET_ADDRESS", TEST_WALLET),
            ("NEXUS_PRIVATE_KEY", TEST_KEY),
            ("TOKEN_ADDRESS", "0x000000000000000000000000000000000000dEaD"),
        ]);
        let config = from_env(&env).unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.expected_chain_id, 31337);
        assert_eq!(config.bot_count, 8);
        assert!(config.is_live());
        let wallet: Address = TEST_WALLET.parse().unwrap();
        assert_eq!(config.wallet_address, Some(wallet));
        // the anvil key signs for the anvil wallet
        assert_eq!(config.signer.unwrap().address(), wallet);
        assert!(config.token_address.is_some());
    }

    #[test]
    fn test_key_without_wallet_is_not_live() {
        let env = create_test_env(&[("NEXUS_PRIVATE_KEY", TEST_KEY), ("WALLET_ADDRESS", "  ")]);
        let config = from_env(&env).unwrap();
        assert!(config.signer.is_some());
        assert!(!config.is_live());
    }

    #[test]
    fn test_invalid_values() {
        let err = tokio_test::assert_err!(from_env(&create_test_env(&[("NEXUS_CHAIN_ID", "nexus")])));
        assert!(err.to_string().contains("NEXUS_CHAIN_ID"));

        let err = from_env(&create_test_env(&[("BOT_COUNT", "-1")])).unwrap_err();
        assert!(err.to_string().contains("BOT_COUNT"));

        let err = from_env(&create_test_env(&[("BOT_COUNT", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        let err = from_env(&create_test_env(&[("WALLET_ADDRESS", "0x1234")])).unwrap_err();
        assert!(err.to_string().contains("WALLET_ADDRESS"));

        let err = from_env(&create_test_env(&[("NEXUS_PRIVATE_KEY", "0xnotakey")])).unwrap_err();
        assert!(err.to_string().contains("NEXUS_PRIVATE_KEY"));
        assert!(!err.to_string().contains("0xnotakey"));
    }

    #[test]
    fn test_simulation_config_partial_toml() {
        let sim: SimulationConfig = toml::from_str(
            r#"
            [pool]
            token_a = "WETH"
            reserve_a = 5000

            [agent]
            swap_interval_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(sim.pool.token_a, "WETH");
        assert_eq!(sim.pool.token_b, "USDC");
        assert_eq!(sim.pool.reserve_a, 5000);
        assert_eq!(sim.pool.reserve_b, 2_000_000_000);
        assert_eq!(sim.agent.swap_interval_ms, 50);
        assert_eq!(sim.agent.tx_interval_ms, 10_000);
        assert_eq!(sim.agent.max_swap_amount, 100);
    }

    #[test]
    fn test_simulation_config_from_file() {
        let path = std::env::temp_dir().join(format!("bot-swarm-sim-{}.toml", std::process::id()));
        std::fs::write(&path, "[agent]\nmax_swap_amount = 25\n").unwrap();

        let sim = load_simulation_config(&path).unwrap();
        assert_eq!(sim.agent.max_swap_amount, 25);
        assert_eq!(sim.pool.reserve_a, 1_000_000_000);

        std::fs::remove_file(&path).unwrap();
        assert!(load_simulation_config(&path).is_err());
    }

    #[test]
    fn test_simulation_config_rejects_zero_timing() {
        let cases = [
            ("swap_interval_ms = 0", "swap_interval_ms"),
            ("tx_interval_ms = 0", "tx_interval_ms"),
            ("max_swap_amount = 0", "max_swap_amount"),
        ];

        for (i, (line, key)) in cases.iter().enumerate() {
            let path = std::env::temp_dir()
                .join(format!("bot-swarm-zero-{}-{}.toml", std::process::id(), i));
            std::fs::write(&path, format!("[agent]\n{}\n", line)).unwrap();

            let err = tokio_test::assert_err!(load_simulation_config(&path));
            // {:#} includes the cause under the file context
            let message = format!("{:#}", err);
            assert!(message.contains(key), "{} accepted: {}", line, message);

            std::fs::remove_file(&path).unwrap();
        }

        assert!(validate_simulation_config(&SimulationConfig::default()).is_ok());
    }
}
