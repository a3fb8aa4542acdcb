//! Countdown timer for focused reading sessions
//!
//! [`TimerEngine`] is the pure state machine: it never schedules anything and
//! only moves when [`TimerEngine::tick`] is called. [`CountdownTimer`] owns an
//! engine plus the one-second tokio task that drives it; the task exists only
//! while the timer is running and is aborted on pause, reset, duration change
//! and drop.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::config::DEFAULT_TIMER_MINUTES;

const TICK: Duration = Duration::from_secs(1);

/// Urgency label derived from remaining progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Active,
    Warning,
    Danger,
}

impl Severity {
    pub fn from_progress(progress: f64) -> Self {
        if progress > 0.3 {
            Severity::Active
        } else if progress > 0.1 {
            Severity::Warning
        } else {
            Severity::Danger
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is stopped or already at zero
    Idle,
    /// One second elapsed, time remains
    Counting,
    /// This tick reached zero and stopped the timer
    Completed,
}

/// Countdown state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEngine {
    total_seconds: u32,
    initial_seconds: u32,
    is_running: bool,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TIMER_MINUTES as u32)
    }
}

impl TimerEngine {
    pub fn new(minutes: u32) -> Self {
        let seconds = minutes.saturating_mul(60);
        Self {
            total_seconds: seconds,
            initial_seconds: seconds,
            is_running: false,
        }
    }

    /// Start counting down. Does nothing when no time remains.
    pub fn start(&mut self) {
        if self.total_seconds > 0 {
            self.is_running = true;
        }
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    pub fn toggle(&mut self) {
        if self.is_running {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.is_running = false;
        self.total_seconds = self.initial_seconds;
    }

    pub fn set_duration(&mut self, minutes: u32) {
        self.is_running = false;
        self.initial_seconds = minutes.saturating_mul(60);
        self.total_seconds = self.initial_seconds;
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running || self.total_seconds == 0 {
            return TickOutcome::Idle;
        }

        self.total_seconds -= 1;
        if self.total_seconds == 0 {
            self.is_running = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Counting
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn minutes(&self) -> u32 {
        self.total_seconds / 60
    }

    pub fn seconds(&self) -> u32 {
        self.total_seconds % 60
    }

    /// Remaining fraction of the configured duration, 0 for a zero duration
    pub fn progress(&self) -> f64 {
        if self.initial_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds) / f64::from(self.initial_seconds)
    }

    pub fn severity(&self) -> Severity {
        Severity::from_progress(self.progress())
    }

    /// Configured duration in whole minutes
    pub fn current_duration(&self) -> u32 {
        (f64::from(self.initial_seconds) / 60.0).round() as u32
    }

    /// `MM:SS` rendering of the remaining time
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            minutes: self.minutes(),
            seconds: self.seconds(),
            total_seconds: self.total_seconds,
            is_running: self.is_running,
            progress: self.progress(),
            severity: self.severity(),
            current_duration: self.current_duration(),
        }
    }
}

/// Point-in-time view of a timer, for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub minutes: u32,
    pub seconds: u32,
    pub total_seconds: u32,
    pub is_running: bool,
    pub progress: f64,
    pub severity: Severity,
    pub current_duration: u32,
}

type CompletionCallback = Box<dyn FnMut() + Send>;

/// Timer engine driven by a cancellable one-second task.
///
/// Must be used from within a tokio runtime; `start` spawns the ticking task.
pub struct CountdownTimer {
    engine: Arc<Mutex<TimerEngine>>,
    on_complete: Arc<Mutex<Option<CompletionCallback>>>,
    task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn new(minutes: u32) -> Self {
        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new(minutes))),
            on_complete: Arc::new(Mutex::new(None)),
            task: None,
        }
    }

    /// Register the callback invoked each time the countdown reaches zero
    pub fn on_complete<F>(self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        *self.on_complete.lock() = Some(Box::new(callback));
        self
    }

    pub fn start(&mut self) {
        let running = {
            let mut engine = self.engine.lock();
            engine.start();
            engine.is_running()
        };

        if running && !self.has_live_task() {
            self.task = Some(self.spawn_ticker());
        }
    }

    pub fn pause(&mut self) {
        self.engine.lock().pause();
        self.cancel_task();
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.engine.lock().reset();
        self.cancel_task();
    }

    pub fn set_duration(&mut self, minutes: u32) {
        self.engine.lock().set_duration(minutes);
        self.cancel_task();
    }

    pub fn is_running(&self) -> bool {
        self.engine.lock().is_running()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.lock().snapshot()
    }

    /// Whether a ticking task is currently scheduled
    pub fn has_live_task(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let on_complete = Arc::clone(&self.on_complete);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            loop {
                ticker.tick().await;
                let outcome = engine.lock().tick();
                match outcome {
                    TickOutcome::Counting => {}
                    TickOutcome::Completed => {
                        tracing::debug!("Reading timer completed");
                        if let Some(callback) = on_complete.lock().as_mut() {
                            callback();
                        }
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
        })
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel_task();
    }
}
