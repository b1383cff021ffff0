//! Chain Client Port
//!
//! The capability set the swarm needs from an EVM chain: nonce lookup,
//! balance queries, and signed native/ERC20 transfers with an explicit
//! nonce. Agents only see this trait; `AlloyChainClient` is the RPC-backed
//! implementation used by the binary.
//!
//! Created: 2026-10-19

pub mod alloy_client;

pub use alloy_client::{redact_url, AlloyChainClient};

use alloy::primitives::{Address, TxHash, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::str::FromStr;
use thiserror::Error;

/// Substrings nodes use when a submitted nonce is already consumed
pub const STALE_NONCE_MARKERS: [&str; 2] = ["nonce too low", "already known"];

/// Errors surfaced by a chain client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("submission error: {0}")]
    Submission(String),

    #[error("stale nonce: {0}")]
    StaleNonce(String),

    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
}

impl ChainError {
    /// True if the node rejected the transaction because its nonce was
    /// already used. Prefers the structured variant and falls back to
    /// matching the submission text.
    pub fn is_stale_nonce(&self) -> bool {
        match self {
            ChainError::StaleNonce(_) => true,
            ChainError::Submission(reason) => is_stale_nonce_message(reason),
            _ => false,
        }
    }
}

/// Substring check used when a node only reports the condition as text
pub fn is_stale_nonce_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    STALE_NONCE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Parse a hex address, mapping failures to `ChainError::InvalidAddress`
pub fn parse_address(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim()).map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}

/// EVM chain capability consumed by the swarm
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest block number
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Native balance in wei
    async fn balance(&self, address: Address) -> Result<U256, ChainError>;

    /// ERC20 balance via `balanceOf`
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    /// Pending nonce for `address` (includes mempool transactions)
    async fn get_pending_nonce(&self, address: Address) -> Result<u64, ChainError>;

    /// Sign and submit a native-currency transfer with an explicit nonce
    async fn transfer_native(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
        nonce: u64,
    ) -> Result<TxHash, ChainError>;

    /// Sign and submit an ERC20 `transfer` with an explicit nonce
    async fn transfer_token(
        &self,
        token: Address,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
        nonce: u64,
    ) -> Result<TxHash, ChainError>;
}
