//! Agent Outcomes
//!
//! What an agent hands back to the swarm when it stops: one report per
//! agent, carrying the terminal outcome plus the counters gathered while it
//! ran. Transaction failures never stop an agent; they show up here.
//!
//! Created: 2026-10-19

use crate::types::AgentMode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// How an agent terminated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Stopped by the shared cancellation signal (the normal path)
    Cancelled,
    /// The agent task panicked; reported by the supervisor in its place
    Panicked(String),
}

impl Outcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Cancelled => write!(f, "cancelled"),
            Outcome::Panicked(reason) => write!(f, "panicked: {}", reason),
        }
    }
}

/// Counters collected over an agent's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    /// Swaps applied to the pool
    pub swaps: u64,
    /// Swaps the pool refused (ignored by the agent)
    pub swaps_rejected: u64,
    /// Transactions accepted by the node
    pub txs_sent: u64,
    /// Transactions that failed to sign or submit
    pub txs_failed: u64,
    /// Times the shared nonce allocator was moved forward after a stale nonce
    pub nonce_resyncs: u64,
    /// Most recent external-call error, if any
    pub last_error: Option<String>,
}

impl AgentStats {
    /// Fold another set of counters into this one
    pub fn merge(&mut self, other: &AgentStats) {
        self.swaps += other.swaps;
        self.swaps_rejected += other.swaps_rejected;
        self.txs_sent += other.txs_sent;
        self.txs_failed += other.txs_failed;
        self.nonce_resyncs += other.nonce_resyncs;
        if other.last_error.is_some() {
            self.last_error = other.last_error.clone();
        }
    }
}

/// Terminal report of one agent
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub agent_id: usize,
    pub mode: AgentMode,
    pub outcome: Outcome,
    pub stats: AgentStats,
    pub finished_at: DateTime<Utc>,
}

impl AgentReport {
    pub fn new(agent_id: usize, mode: AgentMode, outcome: Outcome, stats: AgentStats) -> Self {
        Self {
            agent_id,
            mode,
            outcome,
            stats,
            finished_at: Utc::now(),
        }
    }
}

/// Totals across every report drained from a swarm
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwarmSummary {
    pub agents: usize,
    pub cancelled: usize,
    pub panicked: usize,
    pub totals: AgentStats,
}

impl SwarmSummary {
    pub fn record(&mut self, report: &AgentReport) {
        self.agents += 1;
        match report.outcome {
            Outcome::Cancelled => self.cancelled += 1,
            Outcome::Panicked(_) => self.panicked += 1,
        }
        self.totals.merge(&report.stats);
    }
}
