//! The change-management seam: where decisions are persisted and plans come from.
//!
//! The TUI only talks to [`ChangeApi`]. [`SqliteStore`] implements it over the local
//! plan database; tests substitute in-memory doubles.

use std::future::Future;

use thiserror::Error;
use tokio_rusqlite::Connection;

use crate::db::{self, RejectOutcome};
use crate::types::{Plan, RejectTarget};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("plan store error: {0}")]
    Store(#[from] tokio_rusqlite::Error),
    #[error("plan {plan_id} not found on branch {branch}")]
    PlanNotFound { plan_id: String, branch: String },
    #[error("replacement {0} not found")]
    ReplacementNotFound(String),
    #[error("replacement {0} was already accepted or rejected")]
    Conflict(String),
}

/// Operations the reviewer needs from the change-management backend.
///
/// Futures are `Send` so calls can run on a worker task off the event loop.
pub trait ChangeApi: Send + Sync + 'static {
    /// Marks one replacement rejected for the plan/branch named in `target`.
    fn reject_replacement(
        &self,
        target: &RejectTarget,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Fetches a fresh snapshot of the plan.
    fn load_plan(
        &self,
        plan_id: &str,
        branch: &str,
    ) -> impl Future<Output = Result<Plan, ApiError>> + Send;
}

/// [`ChangeApi`] backed by the SQLite plan store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and migrates) the store at `path`.
    pub async fn open(path: &str) -> Result<Self, ApiError> {
        let conn = db::open_db(path).await?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ChangeApi for SqliteStore {
    async fn reject_replacement(&self, target: &RejectTarget) -> Result<(), ApiError> {
        match db::reject_replacement(&self.conn, target.clone()).await? {
            RejectOutcome::Rejected => Ok(()),
            RejectOutcome::NotFound => {
                Err(ApiError::ReplacementNotFound(target.replacement_id.clone()))
            }
            RejectOutcome::AlreadyDecided => Err(ApiError::Conflict(target.replacement_id.clone())),
        }
    }

    async fn load_plan(&self, plan_id: &str, branch: &str) -> Result<Plan, ApiError> {
        db::load_plan(&self.conn, plan_id, branch)
            .await?
            .ok_or_else(|| ApiError::PlanNotFound {
                plan_id: plan_id.to_owned(),
                branch: branch.to_owned(),
            })
    }
}
