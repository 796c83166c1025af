pub mod queries;

use anyhow::Context;
use rusqlite::Connection;

/// Open the session-scoped store and apply the schema. The schema is embedded
/// so `:memory:` databases in tests get the same tables.
pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open session store")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS session_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create session_store table")?;

    Ok(conn)
}
