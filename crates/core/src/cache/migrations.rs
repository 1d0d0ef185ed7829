//! Database schema migrations.
//!
//! Uses a simple version table approach to track applied migrations.
//! The answer table is created with `IF NOT EXISTS`, so an existing cache file
//! written by an earlier deployment is adopted as-is.

use super::Error;
use tokio_rusqlite::{Connection, params, rusqlite};

/// Ordered schema steps, keyed by version.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_answer_cache.sql"))];

const VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)";

fn applied_version(conn: &rusqlite::Connection) -> Result<i64, Error> {
    conn.execute(VERSION_TABLE, [])?;
    let version = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;
    Ok(version)
}

/// Bring the schema up to the latest version.
///
/// Each step and its version row commit together, so a failed step leaves
/// the previous version in place.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let current = applied_version(conn)?;

        for &(version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
            tracing::debug!(version, "applying cache migration");
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
            tx.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
