/// DDL to create the schema_version tracking table.
///
/// Applied unconditionally on every DB open (before checking the version),
/// using `IF NOT EXISTS` so it is safe to run multiple times.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the full v1 schema.
///
/// Contains five tables:
/// - `plans`: one row per imported change set, keyed by UUID v4 text.
/// - `results`: one row per file touched by a plan.
/// - `replacements`: proposed edits within a result; `rejected_at` / `applied_at`
///   record the decision, both `NULL` while pending.
/// - `plan_files`: the body of each file with the plan applied.
/// - `contexts`: the original body of each pre-existing file.
///
/// All tables use `STRICT` mode for type enforcement.
/// Foreign keys use `ON DELETE CASCADE` so removing a plan cleans up all child rows.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS plans (
        id          TEXT    PRIMARY KEY,
        name        TEXT    NOT NULL,
        branch      TEXT    NOT NULL DEFAULT 'main',
        created_at  INTEGER NOT NULL,
        updated_at  INTEGER NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS results (
        id          TEXT    PRIMARY KEY,
        plan_id     TEXT    NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
        path        TEXT    NOT NULL,
        content     TEXT,
        UNIQUE (plan_id, path)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS replacements (
        id          TEXT    PRIMARY KEY,
        result_id   TEXT    NOT NULL REFERENCES results(id) ON DELETE CASCADE,
        position    INTEGER NOT NULL,
        old_text    TEXT    NOT NULL,
        new_text    TEXT    NOT NULL,
        rejected_at INTEGER,
        applied_at  INTEGER
    ) STRICT;

    CREATE TABLE IF NOT EXISTS plan_files (
        plan_id     TEXT    NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
        path        TEXT    NOT NULL,
        body        TEXT    NOT NULL,
        PRIMARY KEY (plan_id, path)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS contexts (
        plan_id     TEXT    NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
        path        TEXT    NOT NULL,
        body        TEXT    NOT NULL,
        PRIMARY KEY (plan_id, path)
    ) STRICT;

    CREATE INDEX IF NOT EXISTS idx_results_plan ON results(plan_id);
    CREATE INDEX IF NOT EXISTS idx_replacements_result ON replacements(result_id, position);
";

/// Runs forward-only schema migration to migrate the DB to the latest version.
///
/// This function is idempotent: safe to call on every startup regardless of
/// whether the schema has already been applied.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails or the version row cannot be read.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if version < 1 {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let mut db = rusqlite::Connection::open_in_memory().unwrap();
        migrate(&mut db).unwrap();
        migrate(&mut db).unwrap();
        let rows: i64 = db
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1, "second migrate must not record another version");
    }
}
