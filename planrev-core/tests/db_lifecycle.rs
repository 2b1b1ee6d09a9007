//! Integration test for the plan store lifecycle.
//!
//! Exercises: open_db, migrate, import_plan, list_plans, load_plan,
//! reject_replacement, and SqliteStore through the ChangeApi trait.

use planrev_core::api::{ApiError, ChangeApi, SqliteStore};
use planrev_core::db::{self, RejectOutcome};
use planrev_core::types::{FileSnapshot, PlanSnapshot, RejectTarget, ReplacementSnapshot};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("plans.db");
    path.to_string_lossy().to_string()
}

fn snapshot() -> PlanSnapshot {
    PlanSnapshot {
        name: "rename config".to_owned(),
        branch: "feature".to_owned(),
        files: vec![
            FileSnapshot {
                path: "src/main.rs".to_owned(),
                original: Some("fn main() {\n    let cfg = load();\n    run(cfg);\n}\n".to_owned()),
                current: None,
                content: None,
                replacements: vec![
                    ReplacementSnapshot { old: "let cfg".to_owned(), new: "let config".to_owned() },
                    ReplacementSnapshot { old: "run(cfg)".to_owned(), new: "run(config)".to_owned() },
                ],
            },
            FileSnapshot {
                path: "src/new.rs".to_owned(),
                original: None,
                current: None,
                content: Some("pub fn fresh() {}\n".to_owned()),
                replacements: Vec::new(),
            },
            // Repeated path: skipped on import.
            FileSnapshot {
                path: "src/main.rs".to_owned(),
                original: None,
                current: None,
                content: None,
                replacements: vec![ReplacementSnapshot { old: "x".to_owned(), new: "y".to_owned() }],
            },
        ],
    }
}

#[tokio::test]
async fn full_plan_lifecycle() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?)
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let plan_id = db::import_plan(&conn, snapshot()).await.unwrap();
    assert!(!plan_id.is_empty(), "plan ID should be a non-empty UUID");

    let summaries = db::list_plans(&conn).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, plan_id);
    assert_eq!(summaries[0].pending, 2, "duplicate path must not add replacements");

    // Wrong branch finds nothing.
    assert!(db::load_plan(&conn, &plan_id, "main").await.unwrap().is_none());

    let plan = db::load_plan(&conn, &plan_id, "feature").await.unwrap().unwrap();
    assert_eq!(plan.result.sorted_paths, vec!["src/main.rs", "src/new.rs"]);
    let main = plan.result.result_for("src/main.rs").unwrap();
    assert_eq!(main.pending, 2);
    assert_eq!(main.replacements[0].new, "let config");
    assert_eq!(
        plan.current_body("src/main.rs"),
        Some("fn main() {\n    let config = load();\n    run(config);\n}\n")
    );
    assert!(plan.original_body("src/new.rs").is_none());
    assert!(plan.result.result_for("src/new.rs").unwrap().is_new_file());

    // Reject the first replacement.
    let target = RejectTarget {
        plan_id: plan_id.clone(),
        branch: "feature".to_owned(),
        result_id: main.id.clone(),
        replacement_id: main.replacements[0].id.clone(),
    };
    let outcome = db::reject_replacement(&conn, target.clone()).await.unwrap();
    assert_eq!(outcome, RejectOutcome::Rejected);
    let again = db::reject_replacement(&conn, target.clone()).await.unwrap();
    assert_eq!(again, RejectOutcome::AlreadyDecided);

    let wrong_branch = RejectTarget { branch: "main".to_owned(), ..target.clone() };
    assert_eq!(
        db::reject_replacement(&conn, wrong_branch).await.unwrap(),
        RejectOutcome::NotFound
    );

    // The rejected replacement drops out of the next snapshot.
    let reloaded = db::load_plan(&conn, &plan_id, "feature").await.unwrap().unwrap();
    let main = reloaded.result.result_for("src/main.rs").unwrap();
    assert_eq!(main.pending, 1);
    assert_eq!(main.replacements[0].old, "run(cfg)");

    // Verify persistence: open a second connection to same DB
    let conn2 = db::open_db(&path).await.unwrap();
    let summaries = db::list_plans(&conn2).await.unwrap();
    assert_eq!(summaries[0].pending, 1, "reject should persist across connections");
}

#[tokio::test]
async fn settled_file_leaves_navigation() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();
    let mut snap = snapshot();
    snap.files[0].replacements.truncate(1);
    let plan_id = db::import_plan(&conn, snap).await.unwrap();

    let plan = db::load_plan(&conn, &plan_id, "feature").await.unwrap().unwrap();
    let main = plan.result.result_for("src/main.rs").unwrap();
    let target = RejectTarget {
        plan_id: plan_id.clone(),
        branch: "feature".to_owned(),
        result_id: main.id.clone(),
        replacement_id: main.replacements[0].id.clone(),
    };
    db::reject_replacement(&conn, target).await.unwrap();

    let plan = db::load_plan(&conn, &plan_id, "feature").await.unwrap().unwrap();
    assert_eq!(plan.result.sorted_paths, vec!["src/new.rs"]);
}

#[tokio::test]
async fn sqlite_store_maps_outcomes_to_errors() {
    let store = SqliteStore::open(&temp_db_path()).await.unwrap();
    let plan_id = db::import_plan(store.connection(), snapshot()).await.unwrap();

    let err = store.load_plan(&plan_id, "main").await.unwrap_err();
    assert!(matches!(err, ApiError::PlanNotFound { .. }));

    let plan = store.load_plan(&plan_id, "feature").await.unwrap();
    let main = plan.result.result_for("src/main.rs").unwrap();
    let target = RejectTarget {
        plan_id: plan.id.clone(),
        branch: plan.branch.clone(),
        result_id: main.id.clone(),
        replacement_id: main.replacements[1].id.clone(),
    };
    store.reject_replacement(&target).await.unwrap();
    let err = store.reject_replacement(&target).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let missing = RejectTarget { replacement_id: "nope".to_owned(), ..target };
    let err = store.reject_replacement(&missing).await.unwrap_err();
    assert!(matches!(err, ApiError::ReplacementNotFound(_)));
}
