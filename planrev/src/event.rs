//! Event bus for planrev.
//!
//! All user input, timer ticks, and store-worker results are normalised into a
//! single `AppEvent` enum and sent over a tokio unbounded MPSC channel. The main
//! loop receives from this channel and dispatches accordingly.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms, about 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) ages status-bar messages.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use planrev_core::actions::ActionError;
use planrev_core::api::ApiError;
use planrev_core::types::{Plan, RejectTarget};
use tokio::sync::mpsc;
use tokio::time::interval;

/// All events the application can receive from any source.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    ///
    /// Release and repeat events are filtered in [`spawn_event_task`] to avoid
    /// double-firing on Windows, which synthesises both press and release for
    /// every keystroke.
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Logic tick for state updates (250 ms).
    Tick,
    /// Render tick, triggers a `terminal.draw()` call.
    Render,
    /// A fresh plan snapshot from the store worker.
    PlanLoaded(Arc<Plan>),
    /// The store worker could not reload the plan.
    PlanLoadFailed(ApiError),
    /// Outcome of a reject sent to the store worker.
    RejectFinished(Result<RejectTarget, ActionError>),
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned and distributed to background tasks;
/// the receiver (`rx`) is owned by the main event loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background tokio task that drives the unified event channel.
///
/// `reader.next().fuse()` keeps `tokio::select!` from polling a completed future if
/// the crossterm stream ends. Send errors are ignored: once the receiver is gone
/// the process is shutting down anyway.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = tick_tick => {
                    let _ = tx.send(AppEvent::Tick);
                }
                _ = render_tick => {
                    let _ = tx.send(AppEvent::Render);
                }
                maybe_event = crossterm_event => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if key.kind == KeyEventKind::Press {
                                let _ = tx.send(AppEvent::Key(key));
                            }
                        }
                        Some(Ok(Event::Resize(w, h))) => {
                            let _ = tx.send(AppEvent::Resize(w, h));
                        }
                        Some(Ok(Event::Mouse(mouse))) => {
                            let _ = tx.send(AppEvent::Mouse(mouse));
                        }
                        Some(Err(e)) => {
                            tracing::warn!("terminal event error: {e}");
                        }
                        _ => {}
                    }
                }
            }
        }
    });
}
