//! Central application state for planrev.
//!
//! Wraps the core [`ReviewState`] with what only the terminal front end needs: the
//! help overlay, the status-bar message, the clipboard, and the channel to the store
//! worker. Effects returned by the review reducer are carried out here.

use std::sync::Arc;

use planrev_core::actions::{self, ActionError, Clipboard};
use planrev_core::api::ApiError;
use planrev_core::review::{Effect, Intent, ReviewState};
use planrev_core::types::{Plan, RejectTarget};
use tokio::sync::mpsc::UnboundedSender;

use crate::worker::StoreRequest;

/// Ticks (250 ms each) a status message stays visible.
const STATUS_TICKS: u8 = 16;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    ticks_left: u8,
}

pub struct AppState {
    pub mode: Mode,
    pub help_scroll: u16,
    pub review: ReviewState,
    pub status: Option<StatusMessage>,
    /// True between sending a reject and hearing back from the store worker.
    pub reject_pending: bool,
    store_tx: UnboundedSender<StoreRequest>,
    clipboard: Box<dyn Clipboard>,
}

impl AppState {
    pub fn new(
        review: ReviewState,
        store_tx: UnboundedSender<StoreRequest>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            mode: Mode::default(),
            help_scroll: 0,
            review,
            status: None,
            reject_pending: false,
            store_tx,
            clipboard,
        }
    }

    /// Feeds one intent to the reducer and runs whatever effect it asks for.
    ///
    /// Nothing here is fatal: failures end up in the status bar.
    pub fn apply(&mut self, intent: Intent) {
        match self.review.update(intent) {
            Ok(None) => {}
            Ok(Some(Effect::Reject(target))) => self.send_reject(target),
            Ok(Some(Effect::Copy(text))) => {
                match actions::copy_to_clipboard(self.clipboard.as_mut(), &text) {
                    Ok(()) => {
                        let lines = text.lines().count().max(1);
                        let plural = if lines == 1 { "" } else { "s" };
                        self.set_status(StatusKind::Info, format!("Copied {lines} line{plural} to clipboard"));
                    }
                    Err(e) => self.set_error(&e),
                }
            }
            Err(e) => self.set_error(&e),
        }
    }

    fn send_reject(&mut self, target: RejectTarget) {
        tracing::debug!(replacement = %target.replacement_id, "queueing reject");
        if self.store_tx.send(StoreRequest::Reject(target)).is_err() {
            self.set_status(StatusKind::Error, "plan store is not running".to_owned());
            return;
        }
        self.reject_pending = true;
        self.set_status(StatusKind::Info, "Rejecting change...".to_owned());
    }

    /// Asks the store worker for a fresh snapshot of the plan.
    pub fn request_reload(&mut self) {
        if self.store_tx.send(StoreRequest::Reload).is_err() {
            self.set_status(StatusKind::Error, "plan store is not running".to_owned());
            return;
        }
        self.set_status(StatusKind::Info, "Reloading plan...".to_owned());
    }

    /// Swaps in a reloaded plan. Selection indices are re-clamped by the reducer.
    pub fn on_plan_loaded(&mut self, plan: Arc<Plan>) {
        self.review.replace_plan(plan);
    }

    pub fn on_plan_load_failed(&mut self, error: &ApiError) {
        self.set_status(StatusKind::Error, format!("error reloading plan: {error}"));
    }

    pub fn on_reject_finished(&mut self, result: Result<RejectTarget, ActionError>) {
        self.reject_pending = false;
        match result {
            Ok(_) => self.set_status(StatusKind::Info, "Change rejected".to_owned()),
            Err(e) => self.set_error(&e),
        }
    }

    /// Ages the status message; called on every logic tick.
    pub fn tick(&mut self) {
        if let Some(status) = self.status.as_mut() {
            status.ticks_left = status.ticks_left.saturating_sub(1);
            if status.ticks_left == 0 {
                self.status = None;
            }
        }
    }

    fn set_error(&mut self, error: &ActionError) {
        self.set_status(StatusKind::Error, error.to_string());
    }

    fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusMessage { text, kind, ticks_left: STATUS_TICKS });
    }
}
