//! Swarm Agent
//!
//! One bot. Every agent trades random amounts against the shared pool on a
//! fast timer; live agents also send a signed transfer on a slow timer,
//! drawing nonces from the allocator shared with the rest of the swarm.
//!
//! Created: 2026-10-19
//!
//! Notes:
//!     - The two loops run side by side, so a stalled RPC call never delays
//!       swaps.
//!     - In-flight chain calls are raced against cancellation and dropped
//!       when it fires.
//!     - A stale-nonce rejection moves the shared allocator forward to the
//!       chain's pending nonce (never backward). The failed transaction is
//!       not retried.

use super::outcome::{AgentReport, AgentStats, Outcome};
use crate::chain::ChainClient;
use crate::nonce::NonceAllocator;
use crate::pool::SharedPool;
use crate::types::{AgentMode, AgentSettings, SwapDirection};
use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use rand::Rng;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything a live agent needs to reach the chain
#[derive(Clone)]
pub struct LiveLink {
    pub client: Arc<dyn ChainClient>,
    pub signer: PrivateKeySigner,
    /// Transfer recipient
    pub to: Address,
    /// ERC20 contract; `None` sends native currency
    pub token: Option<Address>,
    pub nonces: Arc<NonceAllocator>,
}

impl LiveLink {
    pub fn mode(&self) -> AgentMode {
        if self.token.is_some() {
            AgentMode::LiveToken
        } else {
            AgentMode::Live
        }
    }
}

pub struct Agent {
    id: usize,
    pool: Arc<SharedPool>,
    settings: AgentSettings,
    live: Option<LiveLink>,
}

impl Agent {
    /// Simulation-only agent
    pub fn new(id: usize, pool: Arc<SharedPool>, settings: AgentSettings) -> Self {
        Self {
            id,
            pool,
            settings,
            live: None,
        }
    }

    /// Agent that also sends transactions through `live`
    pub fn new_live(id: usize, pool: Arc<SharedPool>, settings: AgentSettings, live: LiveLink) -> Self {
        Self {
            id,
            pool,
            settings,
            live: Some(live),
        }
    }

    pub fn mode(&self) -> AgentMode {
        self.live.as_ref().map_or(AgentMode::Simulation, LiveLink::mode)
    }

    /// Run until `cancel` fires, then report.
    pub async fn run(self, cancel: CancellationToken) -> AgentReport {
        let mode = self.mode();
        info!("[Bot {}] Started ({})", self.id, mode);

        let stats = match &self.live {
            Some(link) => {
                let (mut swaps, txs) =
                    tokio::join!(self.swap_loop(&cancel), self.tx_loop(link, &cancel));
                swaps.merge(&txs);
                swaps
            }
            None => self.swap_loop(&cancel).await,
        };

        info!(
            "[Bot {}] Shutting down ({} swaps, {} txs sent, {} txs failed)",
            self.id, stats.swaps, stats.txs_sent, stats.txs_failed
        );
        AgentReport::new(self.id, mode, Outcome::Cancelled, stats)
    }

    async fn swap_loop(&self, cancel: &CancellationToken) -> AgentStats {
        let mut stats = AgentStats::default();
        let mut ticker = interval(self.settings.swap_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.random_swap(&mut stats),
            }
        }

        stats
    }

    /// Draw a direction and amount, apply them to the pool.
    /// Pool rejections are counted and otherwise ignored.
    fn random_swap(&self, stats: &mut AgentStats) {
        let (direction, amount, sampled) = {
            let mut rng = rand::thread_rng();
            let direction = if rng.gen_bool(0.5) {
                SwapDirection::AToB
            } else {
                SwapDirection::BToA
            };
            let amount = rng.gen_range(1..=self.settings.max_swap_amount);
            (direction, amount, rng.gen_ratio(1, 10))
        };

        match self.pool.swap(direction, U256::from(amount)) {
            Ok(amount_out) => {
                stats.swaps += 1;
                if sampled {
                    debug!(
                        "[Bot {}] Swap {} in={} out={} | price {:.6} {}/{}",
                        self.id,
                        direction,
                        amount,
                        amount_out,
                        self.pool.price_a_in_b(),
                        self.pool.token_b(),
                        self.pool.token_a()
                    );
                }
            }
            Err(_) => stats.swaps_rejected += 1,
        }
    }

    async fn tx_loop(&self, link: &LiveLink, cancel: &CancellationToken) -> AgentStats {
        let mut stats = AgentStats::default();
        let mut ticker = interval(self.settings.tx_interval);
        // A slow send should not be followed by a burst of catch-up sends
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = self.send_transfer(link, &mut stats) => {}
                    }
                }
            }
        }

        stats
    }

    async fn send_transfer(&self, link: &LiveLink, stats: &mut AgentStats) {
        let nonce = link.nonces.allocate();

        let result = match link.token {
            Some(token) => {
                info!("[Bot {}] Transferring tokens (nonce {})", self.id, nonce);
                link.client
                    .transfer_token(token, &link.signer, link.to, self.settings.token_transfer_amount, nonce)
                    .await
            }
            None => {
                info!("[Bot {}] Sending native transfer (nonce {})", self.id, nonce);
                link.client
                    .transfer_native(&link.signer, link.to, self.settings.native_transfer_amount, nonce)
                    .await
            }
        };

        match result {
            Ok(hash) => {
                stats.txs_sent += 1;
                info!("[Bot {}] TX sent (nonce {}): {:?}", self.id, nonce, hash);
            }
            Err(e) => {
                stats.txs_failed += 1;
                warn!("[Bot {}] TX failed (nonce {}): {}", self.id, nonce, e);
                let stale = e.is_stale_nonce();
                stats.last_error = Some(e.to_string());

                if stale {
                    self.resync_nonce(link, stats).await;
                }
            }
        }
    }

    /// Pull the allocator up to the chain's pending nonce for the sender
    async fn resync_nonce(&self, link: &LiveLink, stats: &mut AgentStats) {
        match link.client.get_pending_nonce(link.signer.address()).await {
            Ok(chain_nonce) => {
                if let Some(previous) = link.nonces.advance_to(chain_nonce) {
                    stats.nonce_resyncs += 1;
                    info!("[Bot {}] Nonce synced: {} -> {}", self.id, previous, chain_nonce);
                }
            }
            Err(e) => warn!("[Bot {}] Nonce resync failed: {}", self.id, e),
        }
    }
}
