//! Timer registry: delayed commands feeding back into the controller.
//!
//! Every timed transition (countdown beats, round time limit, transient
//! flash windows, round advancement) is a spawned task that sleeps and then
//! re-enters the same serialized command path user commands go through. The
//! registry keeps the join handles so pausing or resetting can abort them,
//! and stamps each task with an epoch so a task that already woke up but
//! lost the race for the command gate is detected as stale and dropped.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;

/// The delayed commands the controller can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Splash screen elapsed; move to team setup.
    SplashAdvance,
    /// Round banner elapsed; begin the countdown.
    RoundIntro,
    /// One countdown beat elapsed.
    CountdownTick,
    /// Round time limit expired.
    RoundTimeLimit,
    /// Quiz intro delay elapsed; present the quiz.
    QuizIntro,
    /// Wrong-ingredient flash window elapsed.
    WrongFlash,
    /// Round result display elapsed; advance or finish the game.
    RoundAdvance,
}

/// Handles and epoch for the currently scheduled delayed commands.
///
/// At most one timer per [`TimerKind`] is live; scheduling a kind again
/// replaces (aborts) the previous handle.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    epoch: AtomicU64,
    handles: Mutex<HashMap<TimerKind, JoinHandle<()>>>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Epoch stamped onto newly scheduled timers.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Invalidate every timer scheduled before this call.
    ///
    /// Aborting alone is not enough: a task that finished sleeping may be
    /// parked on the command gate and survive the abort window. Such a task
    /// re-checks the epoch once it holds the gate and bails out.
    pub fn bump_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Track the handle for `kind`, aborting any previous one.
    pub fn insert(&self, kind: TimerKind, handle: JoinHandle<()>) {
        let mut handles = self.handles.lock().expect("timer registry lock poisoned");
        if let Some(previous) = handles.insert(kind, handle) {
            previous.abort();
        }
    }

    /// Abort and forget the timer for `kind`, if one is scheduled.
    pub fn cancel(&self, kind: TimerKind) {
        let mut handles = self.handles.lock().expect("timer registry lock poisoned");
        if let Some(handle) = handles.remove(&kind) {
            handle.abort();
        }
    }

    /// Abort and forget every scheduled timer.
    pub fn cancel_all(&self) {
        let mut handles = self.handles.lock().expect("timer registry lock poisoned");
        for (_, handle) in handles.drain() {
            handle.abort();
        }
    }
}
