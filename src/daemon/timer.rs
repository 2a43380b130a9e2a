//! Timer engine for pomoflow.
//!
//! This module provides the core countdown functionality:
//! - The Idle / Running / Expired state machine over `TimerState`
//! - A cancelable one-second tick source (tokio::time::interval)
//! - Event firing for status updates and the expiry notification hook
//!
//! The tick source is an explicit scheduled task: starting the countdown
//! spawns it, and every pause or mode switch revokes it through the held
//! abort handle. Ticks carry the generation they were scheduled under, so a
//! tick that was already in flight when the schedule was revoked is
//! discarded instead of being applied to the new state.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::types::{ConfigureParams, TimerConfig, TimerMode, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for status updates and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started (or resumed after a pause)
    Started {
        /// Active mode
        mode: TimerMode,
        /// Remaining seconds at start
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Remaining seconds at pause
        remaining_seconds: u32,
    },
    /// Mode switched, countdown reset
    ModeSwitched {
        /// New mode
        mode: TimerMode,
        /// Full duration of the new mode in seconds
        duration_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Remaining time reached zero
    Expired {
        /// Mode that expired
        mode: TimerMode,
    },
}

// ============================================================================
// StartOutcome
// ============================================================================

/// Result of a start request.
///
/// Starting is a total operation; the outcome only selects the message shown
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Countdown started (or resumed)
    Started,
    /// Countdown was already advancing
    AlreadyRunning,
    /// Remaining time is zero; a mode switch is required to reset
    AtZero,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages countdown state, the tick source, and events.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Transient timer configuration
    config: TimerConfig,
    /// Generation of the active tick schedule
    generation: u64,
    /// Abort handle for the outstanding tick task (at most one)
    ticker: Option<AbortHandle>,
    /// Sender cloned into spawned tick tasks
    tick_tx: mpsc::UnboundedSender<u64>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a new TimerEngine with the given configuration and event
    /// channel.
    ///
    /// Returns the engine together with the tick receiver; the daemon loop
    /// forwards received ticks back into [`TimerEngine::on_tick`].
    pub fn new(
        config: TimerConfig,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let engine = Self {
            state: TimerState::new(&config),
            config,
            generation: 0,
            ticker: None,
            tick_tx,
            event_tx,
        };
        (engine, tick_rx)
    }

    /// Starts (or resumes) the countdown.
    ///
    /// No-op when already running or when the remaining time is zero.
    pub fn start(&mut self) -> Result<StartOutcome> {
        if self.state.is_running {
            return Ok(StartOutcome::AlreadyRunning);
        }
        if self.state.is_expired() {
            return Ok(StartOutcome::AtZero);
        }

        self.state.start();
        self.spawn_ticker();

        self.event_tx
            .send(TimerEvent::Started {
                mode: self.state.mode,
                remaining_seconds: self.state.remaining_seconds,
            })
            .context("Failed to send started event")?;

        Ok(StartOutcome::Started)
    }

    /// Pauses the countdown and revokes the tick schedule. Idempotent.
    pub fn pause(&mut self) -> Result<()> {
        if !self.state.is_running {
            return Ok(());
        }

        self.cancel_ticker();
        self.state.pause();

        self.event_tx
            .send(TimerEvent::Paused {
                remaining_seconds: self.state.remaining_seconds,
            })
            .context("Failed to send paused event")?;

        Ok(())
    }

    /// Switches to the given mode.
    ///
    /// Revokes the tick schedule, resets the remaining time to the mode's
    /// configured duration, and stops the countdown. Always succeeds.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Result<()> {
        self.cancel_ticker();
        self.state.switch_mode(mode, &self.config);

        self.event_tx
            .send(TimerEvent::ModeSwitched {
                mode,
                duration_seconds: self.config.duration_seconds(mode),
            })
            .context("Failed to send mode switched event")?;

        Ok(())
    }

    /// Applies configuration changes.
    ///
    /// New durations take effect on subsequent mode switches; an active
    /// countdown keeps its remaining time.
    pub fn configure(&mut self, params: &ConfigureParams) -> Result<(), String> {
        let mut config = self.config.clone();

        if let Some(work) = params.work_minutes {
            config.work_minutes = work;
        }
        if let Some(short_break) = params.short_break_minutes {
            config.short_break_minutes = short_break;
        }
        if let Some(long_break) = params.long_break_minutes {
            config.long_break_minutes = long_break;
        }
        if let Some(notifications) = params.notifications {
            config.notifications = notifications;
        }
        if let Some(sound) = params.sound {
            config.sound = sound;
        }

        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Applies one tick from the tick source.
    ///
    /// Ticks from a revoked schedule (stale generation) and ticks while not
    /// running are discarded. On expiry the schedule is revoked, the running
    /// flag is cleared, and a single `Expired` event is emitted.
    pub fn on_tick(&mut self, generation: u64) -> Result<()> {
        if generation != self.generation || !self.state.is_running {
            return Ok(());
        }

        let expired = self.state.tick();

        self.event_tx
            .send(TimerEvent::Tick {
                remaining_seconds: self.state.remaining_seconds,
            })
            .context("Failed to send tick event")?;

        if expired {
            self.cancel_ticker();
            self.state.pause();

            self.event_tx
                .send(TimerEvent::Expired {
                    mode: self.state.mode,
                })
                .context("Failed to send expired event")?;
        }

        Ok(())
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the generation of the active tick schedule.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    /// Spawns the tick task, revoking any predecessor first.
    fn spawn_ticker(&mut self) {
        self.cancel_ticker();

        let generation = self.generation;
        let tick_tx = self.tick_tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // the countdown advances a full second after start.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tick_tx.send(generation).is_err() {
                    break;
                }
            }
        });
        self.ticker = Some(handle.abort_handle());
    }

    /// Revokes the outstanding tick schedule.
    ///
    /// Bumping the generation first makes any tick already queued under the
    /// old schedule a no-op, so cancellation takes effect before the next
    /// tick is applied.
    fn cancel_ticker(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
