//! Store worker: runs rejects and plan reloads off the event loop.
//!
//! Requests arrive over an unbounded channel and are handled one at a time in
//! arrival order; results go back as [`AppEvent`]s. A successful reject is always
//! followed by a reload, so the UI only ever learns about decisions through a fresh
//! plan snapshot.

use std::sync::Arc;

use planrev_core::actions;
use planrev_core::api::ChangeApi;
use planrev_core::types::RejectTarget;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::event::AppEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    Reject(RejectTarget),
    Reload,
}

/// Spawns the worker task. It exits when every request sender is dropped.
pub fn spawn_store_worker<A: ChangeApi>(
    api: A,
    plan_id: String,
    branch: String,
    mut rx: UnboundedReceiver<StoreRequest>,
    event_tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            match request {
                StoreRequest::Reject(target) => {
                    let result = actions::reject(&api, &target).await;
                    let rejected = result.is_ok();
                    let _ = event_tx.send(AppEvent::RejectFinished(result.map(|()| target)));
                    if rejected {
                        reload(&api, &plan_id, &branch, &event_tx).await;
                    }
                }
                StoreRequest::Reload => reload(&api, &plan_id, &branch, &event_tx).await,
            }
        }
        tracing::debug!("store worker stopped");
    })
}

async fn reload<A: ChangeApi>(api: &A, plan_id: &str, branch: &str, event_tx: &UnboundedSender<AppEvent>) {
    let event = match api.load_plan(plan_id, branch).await {
        Ok(plan) => {
            tracing::debug!(plan = plan_id, paths = plan.path_count(), "plan reloaded");
            AppEvent::PlanLoaded(Arc::new(plan))
        }
        Err(e) => {
            tracing::error!(plan = plan_id, "error reloading plan: {e}");
            AppEvent::PlanLoadFailed(e)
        }
    };
    let _ = event_tx.send(event);
}
