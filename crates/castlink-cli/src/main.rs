//! Castlink demo host.
//!
//! Connects a session and ticks it at a fixed rate, logging everything the
//! session delivers.
//!
//! # Usage
//!
//! ```bash
//! # Against a scripted in-process service
//! castlink --offline --bindings bindings.json --default-scene lobby
//!
//! # Against a real endpoint
//! castlink --address wss://example.invalid/gameclient --header x-protocol-version=2.0
//! ```

mod bindings;
mod offline;

use std::{path::PathBuf, time::Duration};

use castlink_harness::ScriptedRemote;
use castlink_session::{Session, SessionConfig, SystemEnv};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Castlink interactive session host
#[derive(Parser, Debug)]
#[command(name = "castlink")]
#[command(about = "Drive a castlink interactive session from the command line")]
#[command(version)]
struct Args {
    /// Service endpoint
    #[arg(short, long, default_value = castlink_session::DEFAULT_ADDRESS)]
    address: String,

    /// Extra handshake header, as name=value (repeatable)
    #[arg(long = "header", value_parser = bindings::parse_header)]
    headers: Vec<(String, String)>,

    /// JSON file with group-to-scene bindings
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Scene for the default group
    #[arg(long)]
    default_scene: Option<String>,

    /// Connect without going interactive
    #[arg(long)]
    no_interactive: bool,

    /// Use a scripted in-process service instead of the network
    #[arg(long)]
    offline: bool,

    /// Tick period in milliseconds
    #[arg(long, default_value = "16")]
    tick_ms: u64,

    /// Stop after this many seconds
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Report an error if provisioning takes longer than this many seconds
    #[arg(long)]
    provisioning_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig, Box<dyn std::error::Error>> {
        let mut config = SessionConfig::new(&self.address);
        config.headers.clone_from(&self.headers);
        if let Some(path) = &self.bindings {
            config = config.with_bindings(bindings::load(path)?);
        }
        if let Some(scene) = &self.default_scene {
            config = config.with_default_scene(scene);
        }
        if let Some(secs) = self.provisioning_timeout_secs {
            config = config.with_provisioning_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn subscribe_logging(session: &mut Session<SystemEnv>) {
    session.on_ready(|| tracing::info!("session ready"));
    session.on_state_changed(|change| {
        tracing::info!(previous = ?change.previous, current = ?change.current, "state");
    });
    session.on_participant_state_changed(|event| {
        tracing::info!(
            participant = %event.participant.participant_id,
            name = %event.participant.user_name,
            state = ?event.state,
            "participant"
        );
    });
    session.on_button_event(|event| {
        tracing::info!(control = %event.control_id, participant = %event.participant_id, pressed = event.pressed, "button");
    });
    session.on_joystick_event(|event| {
        tracing::debug!(control = %event.control_id, x = event.x, y = event.y, "joystick");
    });
    session.on_error(|event| tracing::warn!(code = event.code, message = %event.message, "session error"));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = args.session_config()?;
    let mut remote = args.offline.then(ScriptedRemote::new);
    let mut session = match &remote {
        Some(remote) => {
            tracing::info!("offline mode, using scripted service");
            Session::with_transport(config, SystemEnv, remote.transport())
        },
        None => Session::new(config, SystemEnv),
    };
    subscribe_logging(&mut session);

    session.connect(!args.no_interactive);

    let mut audience = offline::Audience::default();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    let deadline = args.duration_secs.map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(remote) = remote.as_mut() {
                    audience.step(remote);
                }
                session.tick();
                if !session.state().is_active() {
                    tracing::warn!(state = ?session.state(), "session no longer connected");
                    break;
                }
                if deadline.is_some_and(|deadline| tokio::time::Instant::now() >= deadline) {
                    tracing::info!("duration elapsed");
                    break;
                }
            },
            _ = &mut shutdown => {
                tracing::info!("interrupted");
                break;
            },
        }
    }

    session.disconnect();
    if let Some(scene) = session.current_scene() {
        tracing::info!(scene, "last scene");
    }
    Ok(())
}
