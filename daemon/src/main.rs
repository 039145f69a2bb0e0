//! vouch daemon — runs the RPC server and the scheduled webhook driver.

mod config;

use clap::Parser;
use config::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vouch_crypto::sha256_hex;
use vouch_kyc::{KycEngine, RequestEngine, TokenEngine, VerifierRegistry};
use vouch_rewards::RewardLedger;
use vouch_rpc::{AppState, StaticTokens};
use vouch_store::{CredentialStore, ProfileStore, UserProfile, VerifierRecord, VerifierStatus};
use vouch_store_memory::MemoryStore;
use vouch_types::{Timestamp, UserId, VerifierId};
use vouch_webhooks::{DeliveryDriver, HttpTransport, Outbox};

#[derive(Parser)]
#[command(name = "vouch-daemon", about = "Consent-gated identity verification service")]
struct Cli {
    /// Address to bind the RPC server to.
    #[arg(long, env = "VOUCH_BIND")]
    bind: Option<String>,

    /// RPC server port.
    #[arg(long, env = "VOUCH_PORT")]
    port: Option<u16>,

    /// Seconds between webhook driver runs.
    #[arg(long, env = "VOUCH_DRIVER_INTERVAL")]
    driver_interval: Option<u64>,

    /// Seed a demo verifier, user and profile on startup (dev only).
    #[arg(long, env = "VOUCH_SEED_DEMO")]
    seed_demo: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "VOUCH_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", &cli.log_level);
    }
    vouch_utils::init_tracing();

    let file_config: Option<ServiceConfig> = if let Some(ref config_path) = cli.config {
        match ServiceConfig::from_toml_file(&config_path.display().to_string()) {
            Ok(cfg) => {
                tracing::info!("loaded config from {}", config_path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("failed to load config file: {e}, using CLI defaults");
                None
            }
        }
    } else {
        None
    };

    let base = file_config.unwrap_or_default();
    let config = ServiceConfig {
        bind: cli.bind.unwrap_or(base.bind),
        port: cli.port.unwrap_or(base.port),
        driver_interval_secs: cli.driver_interval.unwrap_or(base.driver_interval_secs),
        log_level: cli.log_level,
        seed_demo: cli.seed_demo || base.seed_demo,
        params: base.params,
    };
    let params = config.params.clone();

    let store = Arc::new(MemoryStore::new());
    let mut identity = StaticTokens::new();
    if config.seed_demo {
        identity = seed_demo_data(&store, identity)?;
    }

    let engine = KycEngine::new(
        RequestEngine::new(store.clone(), params.clone()),
        TokenEngine::new(store.clone(), params.clone()),
        Outbox::new(store.clone(), store.clone()),
        RewardLedger::new(store.clone(), params.clone()),
        store.clone(),
        store.clone(),
    );
    let registry = VerifierRegistry::new(store.clone(), store.clone());

    let timeout = Duration::from_secs(params.webhook_timeout_secs);
    let state = Arc::new(AppState {
        engine,
        registry,
        identity: Arc::new(identity),
        driver: DeliveryDriver::new(
            store.clone(),
            HttpTransport::with_timeout(timeout),
            params.clone(),
        ),
    });

    // Background webhook driver on a fixed cadence.
    let driver = DeliveryDriver::new(
        store.clone(),
        HttpTransport::with_timeout(timeout),
        params.clone(),
    );
    let interval_secs = config.driver_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match driver.run_once(Timestamp::now()).await {
                Ok(stats) if stats.claimed > 0 => {
                    tracing::info!(
                        claimed = stats.claimed,
                        delivered = stats.delivered,
                        rescheduled = stats.rescheduled,
                        exhausted = stats.exhausted,
                        "webhook driver run complete"
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "webhook driver run failed"),
            }
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    tracing::info!(
        %addr,
        driver_interval_secs = config.driver_interval_secs,
        "starting vouch daemon"
    );
    vouch_rpc::serve(addr, state).await?;
    Ok(())
}

/// Seed a demo verifier, user profile and bearer tokens so a fresh daemon
/// is usable end to end without external provisioning.
fn seed_demo_data(
    store: &Arc<MemoryStore>,
    identity: StaticTokens,
) -> anyhow::Result<StaticTokens> {
    store.put_verifier(&VerifierRecord {
        id: VerifierId::new("vrf_demo"),
        name: "Demo Verifier".into(),
        api_key_hash: sha256_hex("demo-verifier-key"),
        callback_url: "http://127.0.0.1:8711/webhook-sink".into(),
        status: VerifierStatus::Active,
    })?;
    store.put_profile(
        &UserProfile::new(UserId::new("u_demo"))
            .with_attribute("fullName", "Demo User")
            .with_attribute("idNumber", "D0000001")
            .with_attribute("address", "1 Demo Street")
            .with_attribute("dob", "1990-01-01"),
    )?;

    tracing::warn!(
        "demo seed active: api key \"demo-verifier-key\", bearer tokens \
         \"demo-user-token\" (u_demo) and \"demo-admin-token\""
    );

    Ok(identity
        .with_user("demo-user-token", "u_demo")
        .with_admin("demo-admin-token", "admin_demo"))
}
