use super::ContractStore;
use crate::{config::ContractConfig, error::ContractResult, types::Identity};
use rusqlite::{params, OptionalExtension};

impl ContractStore {
    // ── Configuration ─────────────────────────────────────────────

    /// Current configuration, or the uninitialized default.
    pub fn load_config(&self) -> ContractResult<ContractConfig> {
        let row = self
            .conn
            .query_row(
                "SELECT admin, max_value, max_count, initialized FROM contract_config WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i32>(1)?,
                        row.get::<_, i32>(2)?,
                        row.get::<_, i32>(3)? != 0,
                    ))
                },
            )
            .optional()?;

        let Some((admin, max_value, max_count, initialized)) = row else {
            return Ok(ContractConfig::default());
        };
        let admin = Identity::parse(&admin)
            .map_err(|e| anyhow::anyhow!("stored admin is malformed: {e}"))?;
        Ok(ContractConfig {
            admin: Some(admin),
            max_value,
            max_count,
            initialized,
        })
    }

    /// Insert the single config row. Fails if one already exists.
    pub fn insert_config(&self, admin: &Identity, max_value: i32, max_count: i32) -> ContractResult<()> {
        self.conn.execute(
            "INSERT INTO contract_config (id, admin, max_value, max_count, initialized)
             VALUES (1, ?1, ?2, ?3, 1)",
            params![admin.as_str(), max_value, max_count],
        )?;
        Ok(())
    }

    pub fn update_admin(&self, admin: &Identity) -> ContractResult<()> {
        self.conn.execute(
            "UPDATE contract_config SET admin = ?1 WHERE id = 1",
            params![admin.as_str()],
        )?;
        Ok(())
    }

    pub fn update_max_value(&self, max_value: i32) -> ContractResult<()> {
        self.conn.execute(
            "UPDATE contract_config SET max_value = ?1 WHERE id = 1",
            params![max_value],
        )?;
        Ok(())
    }

    pub fn update_max_count(&self, max_count: i32) -> ContractResult<()> {
        self.conn.execute(
            "UPDATE contract_config SET max_count = ?1 WHERE id = 1",
            params![max_count],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{store::ContractStore, types::Identity};

    fn store() -> ContractStore {
        let store = ContractStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn config_defaults_until_inserted() {
        let store = store();
        assert!(!store.load_config().unwrap().initialized);

        let admin = Identity::parse("admin").unwrap();
        store.insert_config(&admin, 10_000, 100).unwrap();
        let config = store.load_config().unwrap();
        assert!(config.initialized);
        assert_eq!(config.admin, Some(admin.clone()));
        assert_eq!((config.max_value, config.max_count), (10_000, 100));

        // Single row only.
        assert!(store.insert_config(&admin, 1, 1).is_err());
    }

    #[test]
    fn updates_touch_one_field() {
        let store = store();
        let admin = Identity::parse("admin").unwrap();
        store.insert_config(&admin, 10, 5).unwrap();

        store.update_max_value(20).unwrap();
        store.update_max_count(7).unwrap();
        let next = Identity::parse("next-admin").unwrap();
        store.update_admin(&next).unwrap();

        let config = store.load_config().unwrap();
        assert_eq!(config.admin, Some(next));
        assert_eq!((config.max_value, config.max_count), (20, 7));
    }

    #[test]
    fn schema_rejects_non_positive_bounds() {
        let store = store();
        let admin = Identity::parse("admin").unwrap();
        assert!(store.insert_config(&admin, 0, 5).is_err());
        store.insert_config(&admin, 10, 5).unwrap();
        assert!(store.update_max_count(0).is_err());
    }
}
