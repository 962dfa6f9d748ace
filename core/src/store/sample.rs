use super::{append_event_on, ContractStore, SampleRecord};
use crate::{error::ContractResult, event::EventLogEntry};
use rusqlite::{params, OptionalExtension};

impl ContractStore {
    // ── Sample records ────────────────────────────────────────────

    pub fn sample_exists(&self, key: &[u8]) -> ContractResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sample_record WHERE sample_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn sample_record(&self, key: &[u8]) -> ContractResult<Option<SampleRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT sample_key, height, max_value, values_json
                 FROM sample_record WHERE sample_key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i32>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((key, height, max_value, values_json)) => Ok(Some(SampleRecord {
                key,
                values: serde_json::from_str(&values_json)?,
                height,
                max_value,
            })),
            None => Ok(None),
        }
    }

    pub fn sample_count(&self) -> ContractResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM sample_record", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Persist a record and its event in one transaction.
    /// Either both land or neither does.
    pub fn commit_sample(&self, record: &SampleRecord, event: &EventLogEntry) -> ContractResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO sample_record (sample_key, height, max_value, values_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.key,
                record.height,
                record.max_value,
                serde_json::to_string(&record.values)?,
            ],
        )?;
        append_event_on(&tx, event)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        event::{ContractEvent, EventLogEntry},
        store::{ContractStore, SampleRecord},
    };

    fn store() -> ContractStore {
        let store = ContractStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    fn record(key: &[u8], values: Vec<i32>) -> (SampleRecord, EventLogEntry) {
        let event = ContractEvent::RandomNumberGenerated { values: values.clone() };
        let entry = EventLogEntry::from_event(3, &event).unwrap();
        (
            SampleRecord {
                key: key.to_vec(),
                values,
                height: 3,
                max_value: 10,
            },
            entry,
        )
    }

    #[test]
    fn commit_then_read_back() {
        let store = store();
        let (rec, entry) = record(b"TestHash", vec![6, 2, 9]);
        assert!(!store.sample_exists(b"TestHash").unwrap());

        store.commit_sample(&rec, &entry).unwrap();

        assert!(store.sample_exists(b"TestHash").unwrap());
        assert_eq!(store.sample_record(b"TestHash").unwrap(), Some(rec));
        assert_eq!(store.events_for_height(3).unwrap().len(), 1);
        assert_eq!(store.sample_count().unwrap(), 1);
    }

    #[test]
    fn keys_are_byte_exact() {
        let store = store();
        let (rec, entry) = record(b"Test", vec![1]);
        store.commit_sample(&rec, &entry).unwrap();
        assert!(!store.sample_exists(b"test").unwrap());
        assert!(!store.sample_exists(b"Test ").unwrap());
        assert_eq!(store.sample_record(b"Tesu").unwrap(), None);
    }

    #[test]
    fn second_commit_for_key_rolls_back_entirely() {
        let store = store();
        let (rec, entry) = record(b"k", vec![1]);
        store.commit_sample(&rec, &entry).unwrap();

        let (again, again_entry) = record(b"k", vec![2]);
        assert!(store.commit_sample(&again, &again_entry).is_err());

        // First record untouched, no second event logged.
        assert_eq!(store.sample_record(b"k").unwrap().unwrap().values, vec![1]);
        assert_eq!(store.all_events().unwrap().len(), 1);
    }

    #[test]
    fn records_cannot_be_updated_or_deleted() {
        let store = store();
        let (rec, entry) = record(b"k", vec![1]);
        store.commit_sample(&rec, &entry).unwrap();

        assert!(store
            .conn
            .execute("UPDATE sample_record SET values_json = '[2]'", [])
            .is_err());
        assert!(store.conn.execute("DELETE FROM sample_record", []).is_err());
        assert_eq!(store.sample_record(b"k").unwrap().unwrap().values, vec![1]);
    }
}
