//! Daemon module for pomoflow.
//!
//! This module contains the core daemon functionality:
//! - `timer`: Timer engine with the countdown state machine and tick source
//! - `ipc`: Unix socket server and request dispatch
//! - The daemon run loop wiring engine, IPC, and the expiry notifier

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};

use crate::notify::Notifier;
use crate::types::{IpcResponse, TimerConfig};

pub mod ipc;
pub mod timer;

pub use ipc::{IpcServer, RequestHandler};
pub use timer::{StartOutcome, TimerEngine, TimerEvent};

/// Runs the daemon until interrupted.
///
/// Owns the timer engine and serves IPC requests on `socket_path`. Timer
/// events are drained continuously; expiries are forwarded to `notifier`
/// according to the transient notification settings. The socket file is
/// removed on shutdown.
pub async fn run(socket_path: &Path, notifier: Arc<dyn Notifier>) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (engine, mut tick_rx) = TimerEngine::new(TimerConfig::default(), event_tx);
    let engine = Arc::new(Mutex::new(engine));
    let handler = RequestHandler::new(engine.clone());

    let server = IpcServer::new(socket_path)?;
    tracing::info!(path = %server.socket_path().display(), "Daemon listening");

    loop {
        tokio::select! {
            conn = server.accept() => {
                match conn {
                    Ok(mut stream) => {
                        match IpcServer::receive_request(&mut stream).await {
                            Ok(request) => {
                                tracing::debug!(?request, "Handling request");
                                let response = handler.handle(request).await;
                                if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
                                    tracing::warn!("Failed to send response: {e:#}");
                                }
                            }
                            Err(e) => {
                                tracing::warn!("Invalid request: {e:#}");
                                let response = IpcResponse::error(e.to_string());
                                let _ = IpcServer::send_response(&mut stream, &response).await;
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Failed to accept connection: {e:#}"),
                }
            }
            Some(generation) = tick_rx.recv() => {
                engine.lock().await.on_tick(generation)?;
            }
            Some(event) = event_rx.recv() => {
                dispatch_event(&engine, notifier.as_ref(), event).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Forwards a timer event to the notifier.
///
/// Only expiry is user-visible; everything else is logged. The notification
/// and sound toggles are read at dispatch time so `configure` takes effect
/// immediately.
async fn dispatch_event(
    engine: &Arc<Mutex<TimerEngine>>,
    notifier: &dyn Notifier,
    event: TimerEvent,
) {
    match event {
        TimerEvent::Expired { mode } => {
            let (notifications, sound) = {
                let engine = engine.lock().await;
                (engine.config().notifications, engine.config().sound)
            };
            tracing::info!(mode = mode.as_str(), "Timer expired");
            if notifications {
                if let Err(e) = notifier.notify_expired(mode, sound) {
                    tracing::warn!("Failed to deliver expiry notification: {e}");
                }
            }
        }
        TimerEvent::Tick { remaining_seconds } => {
            tracing::trace!(remaining_seconds, "Tick");
        }
        other => {
            tracing::debug!(?other, "Timer event");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
