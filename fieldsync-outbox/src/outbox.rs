//! SQLite-backed pending-operation queue.

use crate::error::OutboxResult;
use chrono::{DateTime, Utc};
use fieldsync_types::{OperationId, PendingOperation};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Durable FIFO queue of pending operations backed by a SQLite file.
///
/// Replay order is insertion order: rows carry an `AUTOINCREMENT` sequence
/// and are always loaded ordered by it. The operation's own UUID v7 id is
/// the unique key used for removal after a successful replay.
pub struct Outbox {
    conn: Arc<Mutex<Connection>>,
}

impl Outbox {
    /// Opens (or creates) an outbox at the given path.
    pub fn open(path: impl AsRef<Path>) -> OutboxResult<Self> {
        let conn = Connection::open(path)?;
        let outbox = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        outbox.init_schema()?;
        Ok(outbox)
    }

    /// Opens an in-memory outbox (for testing).
    pub fn open_in_memory() -> OutboxResult<Self> {
        let conn = Connection::open_in_memory()?;
        let outbox = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        outbox.init_schema()?;
        Ok(outbox)
    }

    fn init_schema(&self) -> OutboxResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pending_operations (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                op_id TEXT NOT NULL UNIQUE,
                table_name TEXT NOT NULL,
                payload TEXT NOT NULL,
                enqueued_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Appends an operation to the queue.
    pub fn push(&self, op: &PendingOperation) -> OutboxResult<()> {
        let payload = serde_json::to_string(&op.payload)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO pending_operations (op_id, table_name, payload, enqueued_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                op.id.to_string(),
                op.table,
                payload,
                op.enqueued_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Loads every queued operation, oldest first.
    ///
    /// A row that cannot be decoded is logged and skipped so that one bad
    /// entry never blocks the rest of the queue.
    pub fn load(&self) -> OutboxResult<Vec<PendingOperation>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT op_id, table_name, payload, enqueued_at FROM pending_operations ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let op_id: String = row.get(0)?;
            let table: String = row.get(1)?;
            let payload: String = row.get(2)?;
            let enqueued_at: String = row.get(3)?;
            Ok((op_id, table, payload, enqueued_at))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (op_id, table, payload, enqueued_at) = row?;
            match decode_row(&op_id, table, &payload, &enqueued_at) {
                Ok(op) => result.push(op),
                Err(reason) => {
                    warn!("skipping malformed pending operation {op_id}: {reason}");
                }
            }
        }
        Ok(result)
    }

    /// Removes an operation after a successful replay.
    /// Returns true if a row was deleted.
    pub fn remove(&self, id: &OperationId) -> OutboxResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM pending_operations WHERE op_id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Returns the number of queued operations.
    pub fn len(&self) -> OutboxResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM pending_operations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> OutboxResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn decode_row(
    op_id: &str,
    table: String,
    payload: &str,
    enqueued_at: &str,
) -> Result<PendingOperation, String> {
    let id = OperationId::parse(op_id).map_err(|e| format!("invalid op id: {e}"))?;
    let payload = serde_json::from_str(payload).map_err(|e| format!("invalid payload: {e}"))?;
    let enqueued_at = DateTime::parse_from_rfc3339(enqueued_at)
        .map_err(|e| format!("invalid timestamp: {e}"))?
        .with_timezone(&Utc);
    Ok(PendingOperation {
        id,
        table,
        payload,
        enqueued_at,
    })
}
