//! Bot Swarm
//!
//! Starts N agents against one shared pool and fans their terminal reports
//! into a single stream. The stream yields exactly one report per agent and
//! closes once all N are in, so draining it is how callers wait for a clean
//! shutdown.
//!
//! Created: 2026-10-19

pub mod agent;
pub mod outcome;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{Agent, LiveLink};
pub use outcome::{AgentReport, AgentStats, Outcome, SwarmSummary};

use crate::chain::ChainClient;
use crate::nonce::NonceAllocator;
use crate::pool::SharedPool;
use crate::types::{AgentMode, AgentSettings};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Reports in completion order; ends after the last agent reports
pub type OutcomeStream = ReceiverStream<AgentReport>;

/// Chain access for a live swarm
pub struct LiveConfig {
    pub client: Arc<dyn ChainClient>,
    pub signer: PrivateKeySigner,
    pub to: Address,
    pub token: Option<Address>,
    /// First nonce to hand out (normally the account's pending nonce)
    pub start_nonce: u64,
}

pub struct Swarm {
    bot_count: usize,
    pool: Arc<SharedPool>,
    settings: AgentSettings,
    live: Option<LiveLink>,
}

impl Swarm {
    /// Simulation swarm with default agent settings
    pub fn new(bot_count: usize, pool: Arc<SharedPool>) -> Self {
        Self::with_settings(bot_count, pool, AgentSettings::default())
    }

    /// Simulation swarm
    pub fn with_settings(bot_count: usize, pool: Arc<SharedPool>, settings: AgentSettings) -> Self {
        Self {
            bot_count,
            pool,
            settings,
            live: None,
        }
    }

    /// Live swarm. Every agent shares one nonce allocator seeded at
    /// `config.start_nonce`.
    pub fn new_live(
        bot_count: usize,
        pool: Arc<SharedPool>,
        settings: AgentSettings,
        config: LiveConfig,
    ) -> Self {
        let link = LiveLink {
            client: config.client,
            signer: config.signer,
            to: config.to,
            token: config.token,
            nonces: Arc::new(NonceAllocator::new(config.start_nonce)),
        };

        Self {
            bot_count,
            pool,
            settings,
            live: Some(link),
        }
    }

    pub fn pool(&self) -> &Arc<SharedPool> {
        &self.pool
    }

    pub fn bot_count(&self) -> usize {
        self.bot_count
    }

    /// Shared allocator of a live swarm
    pub fn nonce_allocator(&self) -> Option<&Arc<NonceAllocator>> {
        self.live.as_ref().map(|link| &link.nonces)
    }

    pub fn mode(&self) -> AgentMode {
        self.live.as_ref().map_or(AgentMode::Simulation, LiveLink::mode)
    }

    /// Spawn every agent and return the stream of their reports.
    ///
    /// Agents are numbered from 1. All of them stop when `cancel` fires.
    pub fn start(self, cancel: CancellationToken) -> OutcomeStream {
        let mode = self.mode();
        info!("Starting {} bots ({})", self.bot_count, mode);

        let (tx, rx) = mpsc::channel(self.bot_count.max(1));
        let mut pending = FuturesUnordered::new();

        for id in 1..=self.bot_count {
            let agent = match &self.live {
                Some(link) => Agent::new_live(id, Arc::clone(&self.pool), self.settings.clone(), link.clone()),
                None => Agent::new(id, Arc::clone(&self.pool), self.settings.clone()),
            };

            let (report_tx, report_rx) = oneshot::channel();
            let handle = tokio::spawn(agent.run(cancel.clone()));

            // Relay the agent's single report, or a panic report in its place
            tokio::spawn(async move {
                let report = match handle.await {
                    Ok(report) => report,
                    Err(e) => {
                        error!("[Bot {}] Task failed: {}", id, e);
                        AgentReport::new(id, mode, Outcome::Panicked(e.to_string()), AgentStats::default())
                    }
                };
                let _ = report_tx.send(report);
            });

            pending.push(report_rx);
        }

        tokio::spawn(async move {
            while let Some(received) = pending.next().await {
                // A relay only drops its sender without sending if the runtime is shutting down
                if let Ok(report) = received {
                    if tx.send(report).await.is_err() {
                        break;
                    }
                }
            }
            info!("All bots reported");
            // dropping `tx` here closes the stream
        });

        ReceiverStream::new(rx)
    }
}
