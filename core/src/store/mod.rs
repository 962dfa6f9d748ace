//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The contract calls store methods; it never executes SQL directly.

use crate::{
    error::ContractResult,
    event::EventLogEntry,
    types::{Height, SampleKey},
};
mod config;
mod sample;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

pub struct ContractStore {
    conn: Connection,
}

impl ContractStore {
    pub fn open(path: &str) -> ContractResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ContractResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ContractResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> ContractResult<()> {
        append_event_on(&self.conn, entry)
    }

    pub fn events_for_height(&self, height: Height) -> ContractResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, height, event_type, payload
             FROM event_log WHERE height = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![height], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn all_events(&self) -> ContractResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, height, event_type, payload
             FROM event_log ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map([], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

// Shared with the transactional writers in sample.rs.
fn append_event_on(conn: &Connection, entry: &EventLogEntry) -> ContractResult<()> {
    conn.execute(
        "INSERT INTO event_log (height, event_type, payload) VALUES (?1, ?2, ?3)",
        params![entry.height, entry.event_type, entry.payload],
    )?;
    Ok(())
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventLogEntry> {
    Ok(EventLogEntry {
        id:         Some(row.get(0)?),
        height:     row.get(1)?,
        event_type: row.get(2)?,
        payload:    row.get(3)?,
    })
}

/// One committed draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub key:       SampleKey,
    /// Acceptance order. Consumers correlate it with emitted events.
    pub values:    Vec<i32>,
    pub height:    Height,
    pub max_value: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ContractEvent;

    fn store() -> ContractStore {
        let store = ContractStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn migrate_is_idempotent() {
        let store = store();
        store.migrate().unwrap();
    }

    #[test]
    fn event_log_round_trip_by_height() {
        let store = store();
        let event = ContractEvent::RandomNumberGenerated { values: vec![4, 2] };
        store.append_event(&EventLogEntry::from_event(7, &event).unwrap()).unwrap();
        store.append_event(&EventLogEntry::from_event(8, &event).unwrap()).unwrap();

        let at_seven = store.events_for_height(7).unwrap();
        assert_eq!(at_seven.len(), 1);
        assert_eq!(at_seven[0].decode().unwrap(), event);
        assert_eq!(store.all_events().unwrap().len(), 2);
    }

    #[test]
    fn unmigrated_store_has_no_tables() {
        let store = ContractStore::in_memory().unwrap();
        assert!(store.all_events().is_err());
    }
}
