use std::collections::{HashMap, HashSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::types::{FileResult, Plan, PlanResult, PlanSnapshot, PlanSummary, RejectTarget, Replacement};

/// Opens (or creates) the SQLite plan store at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all database connections.
/// It sets `busy_timeout` via the `Connection` method (not a PRAGMA string) to
/// ensure the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    conn.call(|db| -> rusqlite::Result<()> {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    })
    .await?;

    conn.call(|db| -> rusqlite::Result<()> { crate::schema::migrate(db) })
        .await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Stores a backend-produced plan snapshot and returns the new plan id.
///
/// Every file becomes one `results` row; its replacements keep their snapshot
/// order. A repeated path is skipped so each plan lists a path at most once.
/// Everything is written inside a single `BEGIN IMMEDIATE` transaction.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if any insert fails; nothing is stored then.
pub async fn import_plan(
    conn: &Connection,
    snapshot: PlanSnapshot,
) -> Result<String, tokio_rusqlite::Error> {
    conn.call(move |db| -> rusqlite::Result<String> {
        let plan_id = uuid::Uuid::new_v4().to_string();
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO plans (id, name, branch, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![&plan_id, &snapshot.name, &snapshot.branch, now],
        )?;

        let mut seen = HashSet::new();
        for file in &snapshot.files {
            if !seen.insert(file.path.as_str()) {
                tracing::warn!(path = %file.path, "duplicate path in plan snapshot skipped");
                continue;
            }
            let result_id = uuid::Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO results (id, plan_id, path, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![&result_id, &plan_id, &file.path, &file.content],
            )?;
            for (position, rep) in file.replacements.iter().enumerate() {
                tx.execute(
                    "INSERT INTO replacements (id, result_id, position, old_text, new_text)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        uuid::Uuid::new_v4().to_string(),
                        &result_id,
                        position as i64,
                        &rep.old,
                        &rep.new
                    ],
                )?;
            }
            if let Some(body) = file.current_body() {
                tx.execute(
                    "INSERT INTO plan_files (plan_id, path, body) VALUES (?1, ?2, ?3)",
                    rusqlite::params![&plan_id, &file.path, body],
                )?;
            }
            if let Some(original) = &file.original {
                tx.execute(
                    "INSERT INTO contexts (plan_id, path, body) VALUES (?1, ?2, ?3)",
                    rusqlite::params![&plan_id, &file.path, original],
                )?;
            }
        }
        tx.commit()?;
        Ok(plan_id)
    })
    .await
}

/// Lists every stored plan, most recently updated first, with its pending count.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn list_plans(conn: &Connection) -> Result<Vec<PlanSummary>, tokio_rusqlite::Error> {
    conn.call(|db| -> rusqlite::Result<Vec<PlanSummary>> {
        let mut stmt = db.prepare(
            "SELECT p.id, p.name, p.branch, p.created_at,
                    (SELECT COUNT(*) FROM replacements r
                       JOIN results res ON res.id = r.result_id
                      WHERE res.plan_id = p.id
                        AND r.rejected_at IS NULL AND r.applied_at IS NULL)
               FROM plans p
              ORDER BY p.updated_at DESC, p.created_at DESC",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(PlanSummary {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    branch: r.get(2)?,
                    created_at: r.get(3)?,
                    pending: r.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    })
    .await
}

/// Materialises the plan `plan_id` on `branch` as a fresh [`Plan`] snapshot.
///
/// Only pending replacements (neither rejected nor applied) are included, so a
/// rejected replacement disappears from navigation on the next load.
///
/// Returns `Ok(None)` when no plan matches.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if any query fails.
pub async fn load_plan(
    conn: &Connection,
    plan_id: &str,
    branch: &str,
) -> Result<Option<Plan>, tokio_rusqlite::Error> {
    let plan_id = plan_id.to_owned();
    let branch = branch.to_owned();

    conn.call(move |db| -> rusqlite::Result<Option<Plan>> {
        let header: Option<(String, String, String)> = db
            .query_row(
                "SELECT id, name, branch FROM plans WHERE id = ?1 AND branch = ?2",
                rusqlite::params![&plan_id, &branch],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        let Some((id, name, branch)) = header else {
            return Ok(None);
        };

        let mut results_stmt =
            db.prepare("SELECT id, path, content FROM results WHERE plan_id = ?1 ORDER BY path")?;
        let mut reps_stmt = db.prepare(
            "SELECT id, old_text, new_text FROM replacements
              WHERE result_id = ?1 AND rejected_at IS NULL AND applied_at IS NULL
              ORDER BY position",
        )?;

        let heads = results_stmt
            .query_map(rusqlite::params![&id], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, Option<String>>(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut results = Vec::with_capacity(heads.len());
        for (result_id, path, content) in heads {
            let replacements = reps_stmt
                .query_map(rusqlite::params![&result_id], |r| {
                    Ok(Replacement { id: r.get(0)?, old: r.get(1)?, new: r.get(2)? })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            let pending = replacements.len();
            results.push(FileResult { id: result_id, path, content, replacements, pending });
        }

        let files = load_bodies(db, "SELECT path, body FROM plan_files WHERE plan_id = ?1", &id)?;
        let contexts = load_bodies(db, "SELECT path, body FROM contexts WHERE plan_id = ?1", &id)?;

        Ok(Some(Plan {
            id,
            name,
            branch,
            result: PlanResult::from_results(results),
            files,
            contexts,
        }))
    })
    .await
}

/// Reads a `path → body` map with the given single-parameter query.
fn load_bodies(
    db: &rusqlite::Connection,
    sql: &str,
    plan_id: &str,
) -> rusqlite::Result<HashMap<String, String>> {
    let mut stmt = db.prepare(sql)?;
    let rows = stmt
        .query_map(rusqlite::params![plan_id], |r| Ok((r.get(0)?, r.get(1)?)))?
        .collect::<rusqlite::Result<HashMap<String, String>>>()?;
    Ok(rows)
}

/// What happened to a reject request on the store side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectOutcome {
    /// The replacement is now rejected.
    Rejected,
    /// No replacement matches the plan/branch/result/replacement ids.
    NotFound,
    /// The replacement was already rejected or applied.
    AlreadyDecided,
}

/// Marks one replacement rejected.
///
/// The replacement must belong to `target.result_id`, which must belong to the plan
/// `target.plan_id` on `target.branch`. Uses `BEGIN IMMEDIATE` so a concurrent
/// writer cannot decide the same replacement between the check and the update.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the lookup or update fails.
pub async fn reject_replacement(
    conn: &Connection,
    target: RejectTarget,
) -> Result<RejectOutcome, tokio_rusqlite::Error> {
    conn.call(move |db| -> rusqlite::Result<RejectOutcome> {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let decided: Option<(Option<i64>, Option<i64>)> = tx
            .query_row(
                "SELECT r.rejected_at, r.applied_at
                   FROM replacements r
                   JOIN results res ON res.id = r.result_id
                   JOIN plans p ON p.id = res.plan_id
                  WHERE r.id = ?1 AND res.id = ?2 AND p.id = ?3 AND p.branch = ?4",
                rusqlite::params![
                    &target.replacement_id,
                    &target.result_id,
                    &target.plan_id,
                    &target.branch
                ],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        let outcome = match decided {
            None => RejectOutcome::NotFound,
            Some((None, None)) => {
                let now = now_secs();
                tx.execute(
                    "UPDATE replacements SET rejected_at = ?1 WHERE id = ?2",
                    rusqlite::params![now, &target.replacement_id],
                )?;
                tx.execute(
                    "UPDATE plans SET updated_at = ?1 WHERE id = ?2",
                    rusqlite::params![now, &target.plan_id],
                )?;
                RejectOutcome::Rejected
            }
            Some(_) => RejectOutcome::AlreadyDecided,
        };
        tx.commit()?;
        Ok(outcome)
    })
    .await
}
