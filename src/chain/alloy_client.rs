//! Alloy Chain Client
//!
//! JSON-RPC implementation of `ChainClient` on top of an alloy provider.
//! Connects over HTTP or WebSocket (scheme picked from the URL), verifies
//! the chain ID up front, and signs legacy EIP-155 transactions locally
//! with the caller's key and nonce.
//!
//! Created: 2026-10-19
//!
//! Notes:
//!     - Gas price comes from eth_gasPrice on every send; no fee modeling.
//!     - Node error responses matching the stale-nonce markers are mapped to
//!       `ChainError::StaleNonce` so callers do not need to parse text.

use super::{is_stale_nonce_message, ChainClient, ChainError};
use crate::contracts::IERC20;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use tracing::{debug, info};

/// Gas limit for a plain value transfer
const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Gas limit for an ERC20 transfer (higher than a value transfer)
const TOKEN_TRANSFER_GAS: u64 = 100_000;

/// RPC-backed chain client
#[derive(Clone)]
pub struct AlloyChainClient {
    provider: DynProvider,
    chain_id: u64,
}

impl AlloyChainClient {
    /// Connect to `rpc_url` and fail fast if the node reports a different chain.
    pub async fn connect(rpc_url: &str, expected_chain_id: u64) -> Result<Self, ChainError> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|e| ChainError::Connection(format!("failed to connect to RPC {}: {}", rpc_url, e)))?
            .erased();

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Connection(format!("failed to get chain ID: {}", e)))?;

        if chain_id != expected_chain_id {
            return Err(ChainError::ChainIdMismatch {
                expected: expected_chain_id,
                actual: chain_id,
            });
        }

        info!("Connected to chain {} via {}", chain_id, redact_url(rpc_url));
        Ok(Self { provider, chain_id })
    }

    /// Chain ID verified at connect time (no RPC call)
    pub fn connected_chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign `tx` with `signer` and submit it, returning the hash
    async fn sign_and_send(
        &self,
        signer: &PrivateKeySigner,
        tx: TransactionRequest,
    ) -> Result<TxHash, ChainError> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Connection(format!("failed to get gas price: {}", e)))?;

        let tx = tx
            .with_from(signer.address())
            .with_chain_id(self.chain_id)
            .with_gas_price(gas_price);

        let wallet = EthereumWallet::from(signer.clone());
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| ChainError::Signing(format!("failed to sign tx: {}", e)))?;

        let pending = self
            .provider
            .send_tx_envelope(envelope)
            .await
            .map_err(submission_error)?;

        let hash = *pending.tx_hash();
        debug!("Submitted tx {:?} (gas price {})", hash, gas_price);
        Ok(hash)
    }
}

/// Map a send failure onto the error taxonomy
fn submission_error(err: TransportError) -> ChainError {
    match &err {
        RpcError::ErrorResp(payload) if is_stale_nonce_message(&payload.message) => {
            ChainError::StaleNonce(payload.message.to_string())
        }
        RpcError::ErrorResp(payload) => ChainError::Submission(payload.to_string()),
        RpcError::Transport(_) => ChainError::Connection(err.to_string()),
        _ => ChainError::Submission(err.to_string()),
    }
}

fn query_error(what: &str, err: TransportError) -> ChainError {
    ChainError::Connection(format!("failed to get {}: {}", what, err))
}

/// Keep API keys embedded in RPC URLs out of the logs (first 40 chars)
pub fn redact_url(url: &str) -> &str {
    match url.char_indices().nth(40) {
        Some((cut, _)) => &url[..cut],
        None => url,
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| query_error("block number", e))
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| query_error("balance", e))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        let contract = IERC20::new(token, self.provider.clone());
        contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ChainError::Connection(format!("failed to call balanceOf: {}", e)))
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| query_error("nonce", e))
    }

    async fn transfer_native(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
        nonce: u64,
    ) -> Result<TxHash, ChainError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(amount)
            .with_nonce(nonce)
            .with_gas_limit(NATIVE_TRANSFER_GAS);

        self.sign_and_send(signer, tx).await
    }

    async fn transfer_token(
        &self,
        token: Address,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
        nonce: u64,
    ) -> Result<TxHash, ChainError> {
        let calldata = IERC20::transferCall { to, amount }.abi_encode();

        // value = 0, the transfer is a contract call
        let tx = TransactionRequest::default()
            .with_to(token)
            .with_value(U256::ZERO)
            .with_input(calldata)
            .with_nonce(nonce)
            .with_gas_limit(TOKEN_TRANSFER_GAS);

        self.sign_and_send(signer, tx).await
    }
}
