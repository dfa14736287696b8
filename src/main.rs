//! Oval Racer - headless host
//!
//! Runs one session at the configured tick rate. Key events arrive as JSON
//! lines on stdin (`{"type":"key_down","key":"w"}`), or from the built-in
//! autopilot when `AUTOPILOT=true`.

use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oval_racer::config::Config;
use oval_racer::driver::{self, Autopilot};
use oval_racer::game::context::ContextOptions;
use oval_racer::game::VehicleTuning;
use oval_racer::present::LogPresenter;
use oval_racer::session::{Session, SessionRunner};
use oval_racer::track::Track;

/// Autopilot target speed, well under the asphalt top speed
const AUTOPILOT_CRUISE: f32 = 12.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Oval Racer");

    let tuning = VehicleTuning::default();
    let track = Track::new(config.track_spec(), tuning.ride_height)?;
    let options = ContextOptions {
        tuning,
        coin_count: config.coin_count,
        spawn_progress: config.spawn_progress,
    };

    info!(
        outer_x = config.track_outer_x,
        outer_z = config.track_outer_z,
        width = config.track_width,
        coins = config.coin_count,
        tick_rate = config.tick_rate,
        "Track built"
    );

    // HUD line roughly once a second
    let presenter = LogPresenter::new(config.json_snapshots, u64::from(config.tick_rate));
    let session = Session::new(track.clone(), options, Box::new(presenter), Instant::now());
    let (runner, handle) = SessionRunner::new(session, config.tick_rate);
    let mut runner_task = tokio::spawn(runner.run());

    handle.start().await?;

    // Input sources
    tokio::spawn(driver::run_stdin(handle.clone()));
    if config.autopilot {
        let autopilot = Autopilot::new(track, AUTOPILOT_CRUISE);
        tokio::spawn(driver::run_autopilot(handle.clone(), autopilot));
    }

    // Optional time limit
    if let Some(seconds) = config.session_seconds {
        let handle = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            info!(seconds, "Session time limit reached");
            if handle.shutdown().await.is_err() {
                warn!("Session already closed");
            }
        });
    }

    let session = tokio::select! {
        result = &mut runner_task => result?,
        _ = shutdown_signal() => {
            if handle.shutdown().await.is_err() {
                warn!("Session already closed");
            }
            runner_task.await?
        }
    };

    let totals = session.totals();
    info!(
        session_id = %session.id(),
        sessions = totals.sessions,
        laps = totals.laps_completed,
        coins = totals.coins_collected,
        best_ms = totals.best_lap.map(|d| d.as_millis() as u64),
        "Shutdown complete"
    );

    // A pending stdin read holds a blocking thread the runtime would wait on
    std::process::exit(0)
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
