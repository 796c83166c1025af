use rusqlite::{params, Connection};

/// Key under which the membership correlation blob is stored.
pub const CORRELATION_KEY: &str = "membership_correlation";

/// Key under which the chatbot session id is stored.
pub const CHAT_SESSION_KEY: &str = "chat_session";

// ── Session store ──

pub fn get_value(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let result = conn.query_row(
        "SELECT value FROM session_store WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO session_store (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_value(conn: &Connection, key: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM session_store WHERE key = ?1", params![key])?;
    Ok(count > 0)
}

/// Stable chatbot session id, created on first use.
pub fn chat_session_id(conn: &Connection) -> anyhow::Result<String> {
    if let Some(id) = get_value(conn, CHAT_SESSION_KEY)? {
        return Ok(id);
    }
    let id = uuid::Uuid::new_v4().to_string();
    set_value(conn, CHAT_SESSION_KEY, &id)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_get_missing_key() {
        let conn = setup_db();
        assert_eq!(get_value(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let conn = setup_db();
        set_value(&conn, CORRELATION_KEY, r#"{"classBookingId":42}"#).unwrap();
        assert_eq!(
            get_value(&conn, CORRELATION_KEY).unwrap().as_deref(),
            Some(r#"{"classBookingId":42}"#)
        );
    }

    #[test]
    fn test_set_overwrites() {
        let conn = setup_db();
        set_value(&conn, "k", "one").unwrap();
        set_value(&conn, "k", "two").unwrap();
        assert_eq!(get_value(&conn, "k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_delete() {
        let conn = setup_db();
        set_value(&conn, "k", "v").unwrap();
        assert!(delete_value(&conn, "k").unwrap());
        assert!(!delete_value(&conn, "k").unwrap());
        assert_eq!(get_value(&conn, "k").unwrap(), None);
    }

    #[test]
    fn test_chat_session_id_is_stable() {
        let conn = setup_db();
        let first = chat_session_id(&conn).unwrap();
        let second = chat_session_id(&conn).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
