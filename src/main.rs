//! AMM Bot Swarm
//!
//! Main entry point. Loads configuration, connects to the chain (unless
//! simulate-only), starts the swarm and runs it until SIGINT/SIGTERM or the
//! optional run duration, then drains every bot's report and prints a
//! summary.
//!
//! Live mode needs both NEXUS_PRIVATE_KEY and WALLET_ADDRESS; without them
//! the bots only trade against the in-memory pool.
//!
//! Created: 2026-10-19

use alloy::primitives::U256;
use amm_bot_swarm::chain::{redact_url, AlloyChainClient, ChainClient};
use amm_bot_swarm::config::{load_config, load_config_from_file, load_simulation_config};
use amm_bot_swarm::pool::SharedPool;
use amm_bot_swarm::swarm::{LiveConfig, Swarm, SwarmSummary};
use amm_bot_swarm::types::{AgentSettings, SimulationConfig, SwarmConfig};
use anyhow::{bail, Context, Result};
use clap::Parser;
use futures::{Stream, StreamExt};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How long to wait for the RPC handshake
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long bots get to report after cancellation
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// AMM Bot Swarm: concurrent bots on a shared constant-product pool
#[derive(Parser)]
#[command(name = "bot-swarm")]
struct Args {
    /// Number of bots (overrides BOT_COUNT)
    #[arg(short, long)]
    bots: Option<usize>,

    /// Never connect to the chain; pool swaps only
    #[arg(long)]
    simulate_only: bool,

    /// TOML file with [pool] and [agent] settings
    #[arg(long, env = "SIM_CONFIG")]
    sim_config: Option<PathBuf>,

    /// Env file to load instead of .env
    #[arg(long)]
    env_file: Option<String>,

    /// Stop automatically after this many seconds
    #[arg(long)]
    duration_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = match &args.env_file {
        Some(env_file) => load_config_from_file(env_file)?,
        None => load_config()?,
    };
    if let Some(bots) = args.bots {
        if bots == 0 {
            bail!("--bots must be at least 1");
        }
        config.bot_count = bots;
    }

    let sim = match &args.sim_config {
        Some(path) => {
            info!("Simulation config: {}", path.display());
            load_simulation_config(path)?
        }
        None => SimulationConfig::default(),
    };

    info!("AMM Bot Swarm starting ({} bots)", config.bot_count);

    let pool = Arc::new(
        SharedPool::new(
            sim.pool.token_a.clone(),
            sim.pool.token_b.clone(),
            U256::from(sim.pool.reserve_a),
            U256::from(sim.pool.reserve_b),
        )
        .context("Invalid pool configuration")?,
    );
    let (reserve_a, reserve_b) = pool.reserves();
    info!(
        "Pool {}/{}: reserves ({}, {}) | price {:.6} {} per {}",
        pool.token_a(),
        pool.token_b(),
        reserve_a,
        reserve_b,
        pool.price_a_in_b(),
        pool.token_b(),
        pool.token_a()
    );

    let settings = sim.agent_settings();
    let swarm = if args.simulate_only {
        info!("Simulate-only mode: no RPC connection");
        Swarm::with_settings(config.bot_count, Arc::clone(&pool), settings)
    } else {
        connect_swarm(&config, Arc::clone(&pool), settings).await?
    };

    let bot_count = swarm.bot_count();
    let cancel = CancellationToken::new();
    let mut reports = swarm.start(cancel.clone());

    wait_for_shutdown(args.duration_secs).await?;
    cancel.cancel();

    // Drain every report; the stream closes once all bots are in
    let mut summary = SwarmSummary::default();
    let drained = timeout(SHUTDOWN_GRACE, async {
        while let Some(report) = reports.next().await {
            if !report.outcome.is_cancelled() {
                warn!("[Bot {}] Stopped abnormally: {}", report.agent_id, report.outcome);
            }
            summary.record(&report);
        }
    })
    .await;

    if drained.is_err() {
        warn!(
            "Timed out waiting for bots: {} of {} reported",
            summary.agents, bot_count
        );
    }

    info!("Final pool: {}", serde_json::to_string(&pool.snapshot())?);
    info!("Summary: {}", serde_json::to_string(&summary)?);
    info!("All bots stopped");

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Connect to the chain and build a live swarm when a wallet is configured,
/// a simulation swarm otherwise.
async fn connect_swarm(
    config: &SwarmConfig,
    pool: Arc<SharedPool>,
    settings: AgentSettings,
) -> Result<Swarm> {
    info!("Connecting to {}...", redact_url(&config.rpc_url));
    let client = timeout(
        CONNECT_TIMEOUT,
        AlloyChainClient::connect(&config.rpc_url, config.expected_chain_id),
    )
    .await
    .context("Timed out connecting to RPC")??;

    let block = client.block_number().await?;
    info!("Connected! Chain {} | current block: {}", client.connected_chain_id(), block);

    if let Some(wallet) = config.wallet_address {
        match client.balance(wallet).await {
            Ok(balance) => info!("Wallet {} balance: {} wei", wallet, balance),
            Err(e) => warn!("Failed to fetch wallet balance: {}", e),
        }
        if let Some(token) = config.token_address {
            match client.token_balance(token, wallet).await {
                Ok(balance) => info!("Token {} balance: {}", token, balance),
                Err(e) => warn!("Failed to fetch token balance: {}", e),
            }
        }
    }

    let (signer, wallet) = match (&config.signer, config.wallet_address) {
        (Some(signer), Some(wallet)) => (signer.clone(), wallet),
        _ => {
            info!("No wallet configured (NEXUS_PRIVATE_KEY + WALLET_ADDRESS); simulation only");
            return Ok(Swarm::with_settings(config.bot_count, pool, settings));
        }
    };

    if signer.address() != wallet {
        warn!(
            "NEXUS_PRIVATE_KEY signs for {} but WALLET_ADDRESS is {} (transfer recipient)",
            signer.address(),
            wallet
        );
    }

    let start_nonce = client
        .get_pending_nonce(signer.address())
        .await
        .context("Failed to fetch starting nonce")?;
    match config.token_address {
        Some(token) => info!("Live mode: token transfers via {} | starting nonce {}", token, start_nonce),
        None => info!("Live mode: native transfers | starting nonce {}", start_nonce),
    }

    Ok(Swarm::new_live(
        config.bot_count,
        pool,
        settings,
        LiveConfig {
            client: Arc::new(client),
            signer,
            to: wallet,
            token: config.token_address,
            start_nonce,
        },
    ))
}

/// Block until SIGINT/SIGTERM, or until `duration_secs` elapses if set
async fn wait_for_shutdown(duration_secs: Option<u64>) -> Result<()> {
    let signals = Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;
    let handle = signals.handle();

    match shutdown_trigger(signals, duration_secs).await {
        ShutdownTrigger::Signal(signal) => info!("Received signal {}, shutting down...", signal),
        ShutdownTrigger::Deadline => info!("Run duration elapsed, shutting down..."),
        ShutdownTrigger::SignalsClosed => warn!("Signal stream closed, shutting down..."),
    }

    handle.close();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ShutdownTrigger {
    Signal(i32),
    Deadline,
    SignalsClosed,
}

/// First of: a signal, the run deadline, or the signal stream ending
async fn shutdown_trigger<S>(signals: S, duration_secs: Option<u64>) -> ShutdownTrigger
where
    S: Stream<Item = i32>,
{
    let mut signals = std::pin::pin!(signals);
    let deadline = async {
        match duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        signal = signals.next() => match signal {
            Some(signal) => ShutdownTrigger::Signal(signal),
            None => ShutdownTrigger::SignalsClosed,
        },
        _ = deadline => ShutdownTrigger::Deadline,
    }
}
