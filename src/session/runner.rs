//! Async host loop driving a session at a fixed tick rate

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use super::Session;
use crate::game::Snapshot;
use crate::input::KeyEvent;
use crate::util::time::tick_interval;

/// Commands accepted by the host loop, applied before the next tick
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Start,
    Stop,
    Key(KeyEvent),
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session loop has shut down")]
    Closed,
}

/// Cloneable handle to a running host loop
#[derive(Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    command_tx: mpsc::Sender<SessionCommand>,
    snapshot_tx: broadcast::Sender<Snapshot>,
    running: Arc<AtomicBool>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn start(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Start).await
    }

    pub async fn stop(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Stop).await
    }

    pub async fn key(&self, event: KeyEvent) -> Result<(), SessionError> {
        self.send(SessionCommand::Key(event)).await
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }

    /// Receive snapshots published after each presented tick
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Whether the session was ticking at the end of the last loop iteration
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Owns the session and runs the tick loop
pub struct SessionRunner {
    session: Session,
    tick_rate: u32,
    command_rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: broadcast::Sender<Snapshot>,
    running: Arc<AtomicBool>,
}

impl SessionRunner {
    pub fn new(session: Session, tick_rate: u32) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (snapshot_tx, _) = broadcast::channel(64);
        let running = Arc::new(AtomicBool::new(false));

        let handle = SessionHandle {
            id: session.id(),
            command_tx,
            snapshot_tx: snapshot_tx.clone(),
            running: running.clone(),
        };

        let runner = Self {
            session,
            tick_rate,
            command_rx,
            snapshot_tx,
            running,
        };

        (runner, handle)
    }

    /// Run until shutdown or until every handle is dropped.
    /// Returns the session so totals can be inspected afterwards.
    pub async fn run(mut self) -> Session {
        info!(session_id = %self.session.id(), tick_rate = self.tick_rate, "Session loop started");

        let mut ticker = interval(tick_interval(self.tick_rate));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            // Drain command queue
            if !self.process_commands() {
                break;
            }

            // Run simulation tick
            if let Some(snapshot) = self.session.tick(Instant::now()) {
                // No subscribers is fine
                let _ = self.snapshot_tx.send(snapshot);
            }

            self.running
                .store(self.session.is_running(), Ordering::Relaxed);
        }

        self.session.stop(Instant::now());
        self.running.store(false, Ordering::Relaxed);
        info!(session_id = %self.session.id(), "Session loop finished");
        self.session
    }

    /// Apply queued commands. Returns false when the loop should exit.
    fn process_commands(&mut self) -> bool {
        loop {
            let command = match self.command_rx.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    debug!(session_id = %self.session.id(), "All handles dropped");
                    return false;
                }
            };

            let now = Instant::now();
            match command {
                SessionCommand::Start => {
                    self.session.start(now);
                }
                SessionCommand::Stop => {
                    self.session.stop(now);
                }
                SessionCommand::Key(event) => self.session.handle_key(&event, now),
                SessionCommand::Shutdown => return false,
            }
        }
    }
}
