//! Scripted chain client for agent and swarm tests

use crate::chain::{ChainClient, ChainError};
use alloy::primitives::{Address, TxHash, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Well-known development key (anvil account 0)
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn test_signer() -> PrivateKeySigner {
    TEST_KEY.parse().unwrap()
}

/// Records every call; optionally fails transfers or stalls them
#[derive(Default)]
pub struct MockChainClient {
    pub pending_nonce: Mutex<u64>,
    pub fail_with: Mutex<Option<ChainError>>,
    pub transfer_delay: Option<Duration>,
    pub native_nonces: Mutex<Vec<u64>>,
    pub token_transfers: Mutex<Vec<(Address, u64)>>,
    pub nonce_queries: Mutex<Vec<Address>>,
}

impl MockChainClient {
    pub fn failing(err: ChainError, pending_nonce: u64) -> Self {
        Self {
            pending_nonce: Mutex::new(pending_nonce),
            fail_with: Mutex::new(Some(err)),
            ..Default::default()
        }
    }

    pub fn stalled(delay: Duration) -> Self {
        Self {
            transfer_delay: Some(delay),
            ..Default::default()
        }
    }

    async fn submit(&self, nonce: u64) -> Result<TxHash, ChainError> {
        if let Some(delay) = self.transfer_delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_with.lock().clone() {
            Some(err) => Err(err),
            None => Ok(TxHash::with_last_byte((nonce % 256) as u8)),
        }
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(1)
    }

    async fn balance(&self, _address: Address) -> Result<U256, ChainError> {
        Ok(U256::from(1_000_000u64))
    }

    async fn token_balance(&self, _token: Address, _owner: Address) -> Result<U256, ChainError> {
        Ok(U256::ZERO)
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<u64, ChainError> {
        self.nonce_queries.lock().push(address);
        Ok(*self.pending_nonce.lock())
    }

    async fn transfer_native(
        &self,
        _signer: &PrivateKeySigner,
        _to: Address,
        _amount: U256,
        nonce: u64,
    ) -> Result<TxHash, ChainError> {
        self.native_nonces.lock().push(nonce);
        self.submit(nonce).await
    }

    async fn transfer_token(
        &self,
        token: Address,
        _signer: &PrivateKeySigner,
        _to: Address,
        _amount: U256,
        nonce: u64,
    ) -> Result<TxHash, ChainError> {
        self.token_transfers.lock().push((token, nonce));
        self.submit(nonce).await
    }
}
