mod stdio;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use std::process::ExitCode;
use std::time::Duration;
use tandem_core::{IceServerConfig, Role};
use tandem_session::{
    EngineConfig, RestartOnFailure, RetryThenRestart, RtcEngine, Session, SessionCommand,
    SessionConfig, Supervisor,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::stdio::StdoutSignaling;

/// Device end of a cloud audio session. Signaling is exchanged as JSON
/// lines: inbound on stdin, outbound on stdout.
///
/// Microphone and speaker are not opened here; a platform integration
/// attaches them with `Session::with_uplink` and `Session::with_downlink`.
#[derive(Parser)]
#[command(name = "tandem-device", version)]
struct Args {
    /// Negotiation tick period in milliseconds.
    #[arg(long, default_value_t = 15)]
    tick_ms: u64,

    /// Longest time publisher negotiation may stay in one step; 0 disables.
    #[arg(long, default_value_t = 30)]
    negotiation_timeout_secs: u64,

    /// STUN/TURN server URL, may be repeated.
    #[arg(long = "ice-server")]
    ice_servers: Vec<String>,

    #[arg(long, value_enum, default_value_t = RecoveryMode::Restart)]
    recovery: RecoveryMode,

    /// Failures tolerated before restarting, with `--recovery retry`.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Name sent with the add-track request.
    #[arg(long, default_value = "microphone")]
    track_name: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecoveryMode {
    /// Exit on the first lost connection.
    Restart,
    /// Keep going for `--retries` failures.
    Retry,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        let engine = if self.ice_servers.is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig {
                ice_servers: self
                    .ice_servers
                    .iter()
                    .map(|url| IceServerConfig::from_url(url))
                    .collect(),
            }
        };

        SessionConfig {
            tick_interval: Duration::from_millis(self.tick_ms.max(1)),
            negotiation_timeout: (self.negotiation_timeout_secs > 0)
                .then(|| Duration::from_secs(self.negotiation_timeout_secs)),
            track_name: self.track_name.clone(),
            engine,
        }
    }

    fn supervisor(&self) -> Box<dyn Supervisor> {
        match self.recovery {
            RecoveryMode::Restart => Box::new(RestartOnFailure),
            RecoveryMode::Retry => Box::new(RetryThenRestart::new(self.retries)),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    eprintln!("{}", "Starting tandem device session...".green().bold());

    match run(args).await {
        Ok(()) => {
            eprintln!("{}", "Session finished.".green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {:#}", "Session failed:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.session_config();

    let subscriber = RtcEngine::new(Role::Subscriber, &config.engine)
        .await
        .context("Failed to create subscriber connection")?;
    let publisher = RtcEngine::new(Role::Publisher, &config.engine)
        .await
        .context("Failed to create publisher connection")?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(100);
    let signaling = StdoutSignaling::spawn();

    let session = Session::new(
        config,
        Box::new(subscriber),
        Box::new(publisher),
        args.supervisor(),
        cmd_rx,
        Box::new(signaling),
    );

    tokio::spawn(stdio::read_commands(cmd_tx));
    info!("Waiting for signaling on stdin");

    session.run().await?;
    Ok(())
}
