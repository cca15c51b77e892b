pub mod scheduler;
pub mod session;
mod sse;
pub mod state_machine;

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, RwLock};

use crate::{config::AppConfig, content::ContentProvider, services::round_service};

pub use self::sse::SseHub;
use self::{
    scheduler::{TimerKind, TimerRegistry},
    session::Session,
};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state owning the game session, timers, and SSE hub.
///
/// The session is only ever mutated by command handlers, and every handler
/// (user command or timer callback) takes `command_gate` first, so commands
/// are processed strictly one at a time in issue order.
pub struct AppState {
    config: AppConfig,
    session: RwLock<Session>,
    timers: TimerRegistry,
    sse: SseHub,
    command_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            session: RwLock::new(Session::new()),
            timers: TimerRegistry::new(),
            sse: SseHub::new(16),
            command_gate: Mutex::new(()),
        })
    }

    /// The validated content pools the controller draws from.
    pub fn content(&self) -> &ContentProvider {
        self.config.content()
    }

    /// The session aggregate; read-only access for projections.
    pub fn session(&self) -> &RwLock<Session> {
        &self.session
    }

    /// Registry of the scheduled delayed commands.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Gate serializing every mutating command.
    pub fn command_gate(&self) -> &Mutex<()> {
        &self.command_gate
    }
}

/// Schedule the delayed command `kind` to fire after `delay`.
///
/// The spawned task re-enters the controller through the same command gate
/// as user commands; the epoch captured here lets the handler drop the fire
/// when it was cancelled while already awake.
pub fn schedule_timer(state: &SharedState, kind: TimerKind, delay: Duration) {
    let epoch = state.timers().epoch();
    let app = Arc::clone(state);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        round_service::handle_timer(&app, kind, epoch).await;
    });
    state.timers().insert(kind, handle);
}
