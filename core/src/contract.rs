//! The seeded-sampling contract.
//!
//! CALL SHAPE (every mutating operation, fixed):
//!   1. Load configuration from the store.
//!   2. Run the access-guard checks. Any failure returns here.
//!   3. Consult host collaborators (registry, randomness).
//!   4. Compute the result with pure code.
//!   5. Commit to the store in one transaction.
//!   6. Emit events.
//!
//! RULES:
//!   - Caller and height come from the RequestContext, never ambient state.
//!   - Nothing is written before every check has passed.
//!   - Events are emitted only after the commit succeeds.

use crate::{
    access_guard,
    config::{ContractConfig, ContractSettings},
    context::RequestContext,
    error::{ContractError, ContractResult},
    event::{ContractEvent, EventLogEntry},
    host::{DeploymentRegistry, EventSink, LogSink, RandomnessSource, SimulatedBeacon, StaticRegistry},
    sampler,
    store::{ContractStore, SampleRecord},
    types::{display_key, Height, Identity},
};

pub struct RandomContract {
    address:    Identity,
    store:      ContractStore,
    registry:   Box<dyn DeploymentRegistry>,
    randomness: Box<dyn RandomnessSource>,
    sink:       Box<dyn EventSink>,
}

impl RandomContract {
    pub fn new(
        address: Identity,
        store: ContractStore,
        registry: Box<dyn DeploymentRegistry>,
        randomness: Box<dyn RandomnessSource>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            address,
            store,
            registry,
            randomness,
            sink,
        }
    }

    /// Build a contract wired to the harness collaborators described
    /// by `settings`. The store must already be migrated.
    pub fn build(settings: &ContractSettings, store: ContractStore) -> Self {
        let registry = StaticRegistry::new()
            .with_author(settings.contract_address.clone(), settings.deployer.clone());
        Self::new(
            settings.contract_address.clone(),
            store,
            Box::new(registry),
            Box::new(SimulatedBeacon::new(settings.beacon_seed)),
            Box::new(LogSink),
        )
    }

    pub fn address(&self) -> &Identity {
        &self.address
    }

    pub fn store(&self) -> &ContractStore {
        &self.store
    }

    /// Forward a finality notice from the host to the randomness source.
    pub fn finalize_randomness(&mut self, height: Height) {
        self.randomness.finalize_through(height);
    }

    // ── Configuration & access guard ──────────────────────────────

    pub fn initialize(
        &mut self,
        ctx: &RequestContext,
        max_value: i32,
        max_count: i32,
    ) -> ContractResult<()> {
        let config = self.store.load_config()?;
        let author = self.registry.deploying_authority(&self.address);
        guarded(ctx, "initialize", || {
            access_guard::check_initialize(&config, &ctx.caller, author.as_ref(), max_value, max_count)
        })?;

        self.store.insert_config(&ctx.caller, max_value, max_count)?;
        log::info!(
            "height={} initialized: admin={} max_value={max_value} max_count={max_count}",
            ctx.height,
            ctx.caller
        );
        Ok(())
    }

    pub fn set_admin(&mut self, ctx: &RequestContext, new_admin: &str) -> ContractResult<()> {
        let config = self.store.load_config()?;
        let admin = guarded(ctx, "set_admin", || {
            access_guard::check_admin(&config, &ctx.caller)?;
            access_guard::parse_admin(new_admin)
        })?;
        self.store.update_admin(&admin)?;
        log::info!("height={} admin changed: {} -> {admin}", ctx.height, ctx.caller);
        Ok(())
    }

    pub fn set_max_value(&mut self, ctx: &RequestContext, max_value: i32) -> ContractResult<()> {
        let config = self.store.load_config()?;
        guarded(ctx, "set_max_value", || {
            access_guard::check_admin(&config, &ctx.caller)?;
            access_guard::check_bound("max value limit", max_value)
        })?;
        self.store.update_max_value(max_value)?;
        log::info!("height={} max value limit set to {max_value}", ctx.height);
        Ok(())
    }

    pub fn set_max_count(&mut self, ctx: &RequestContext, max_count: i32) -> ContractResult<()> {
        let config = self.store.load_config()?;
        guarded(ctx, "set_max_count", || {
            access_guard::check_admin(&config, &ctx.caller)?;
            access_guard::check_bound("max random number count", max_count)
        })?;
        self.store.update_max_count(max_count)?;
        log::info!("height={} max random number count set to {max_count}", ctx.height);
        Ok(())
    }

    pub fn admin(&self) -> ContractResult<Option<Identity>> {
        Ok(self.store.load_config()?.admin)
    }

    pub fn max_value(&self) -> ContractResult<i32> {
        Ok(self.store.load_config()?.max_value)
    }

    pub fn max_count(&self) -> ContractResult<i32> {
        Ok(self.store.load_config()?.max_count)
    }

    pub fn is_initialized(&self) -> ContractResult<bool> {
        Ok(self.store.load_config()?.initialized)
    }

    pub fn config(&self) -> ContractResult<ContractConfig> {
        self.store.load_config()
    }

    // ── Sampler ───────────────────────────────────────────────────

    /// Draw `count` distinct integers in [0, max_value) for `key` and
    /// record them. A key can be drawn exactly once.
    pub fn generate(
        &mut self,
        ctx: &RequestContext,
        key: &[u8],
        max_value: i32,
        count: i32,
    ) -> ContractResult<Vec<i32>> {
        if self.store.sample_exists(key)? {
            log::warn!("height={} generate rejected: key '{}' already drawn", ctx.height, display_key(key));
            return Err(ContractError::DuplicateKey { key: display_key(key) });
        }
        let config = self.store.load_config()?;
        guarded(ctx, "generate", || {
            access_guard::check_key(key)?;
            access_guard::check_request(&config, max_value, count)
        })?;

        let digest = self.external_digest(ctx.height)?;
        let values = sampler::sample_distinct(key, &digest, max_value, count).map_err(|e| {
            log::warn!("height={} generate for '{}' failed: {e}", ctx.height, display_key(key));
            ContractError::from(e)
        })?;

        let record = SampleRecord {
            key: key.to_vec(),
            values: values.clone(),
            height: ctx.height,
            max_value,
        };
        let event = ContractEvent::RandomNumberGenerated { values: values.clone() };
        self.store
            .commit_sample(&record, &EventLogEntry::from_event(ctx.height, &event)?)?;
        self.sink.emit(&event);

        log::info!(
            "height={} generated {count} value(s) in [0, {max_value}) for '{}'",
            ctx.height,
            display_key(key)
        );
        Ok(values)
    }

    /// The stored sequence for `key`, if it has been drawn.
    pub fn sample(&self, key: &[u8]) -> ContractResult<Option<Vec<i32>>> {
        Ok(self.store.sample_record(key)?.map(|record| record.values))
    }

    pub fn sample_record(&self, key: &[u8]) -> ContractResult<Option<SampleRecord>> {
        self.store.sample_record(key)
    }

    /// Re-derive the stored draw for `key` from the digest at its height
    /// and report whether it matches.
    pub fn verify_sample(&self, key: &[u8]) -> ContractResult<bool> {
        let record = self
            .store
            .sample_record(key)?
            .ok_or_else(|| ContractError::NotFound { key: display_key(key) })?;
        let digest = self.external_digest(record.height)?;
        let count = i32::try_from(record.values.len())
            .map_err(|_| anyhow::anyhow!("stored record for '{}' is oversized", display_key(key)))?;

        let matches = match sampler::sample_distinct(key, &digest, record.max_value, count) {
            Ok(values) => values == record.values,
            Err(e) => {
                log::debug!("re-derivation for '{}' failed: {e}", display_key(key));
                false
            }
        };
        if !matches {
            log::warn!(
                "stored sample for '{}' at height {} does not re-derive",
                display_key(key),
                record.height
            );
        }
        Ok(matches)
    }

    /// Events logged at `height`.
    /// Used by the determinism test and replay tooling.
    pub fn events_for_height(&self, height: Height) -> ContractResult<Vec<EventLogEntry>> {
        self.store.events_for_height(height)
    }

    fn external_digest(&self, height: Height) -> ContractResult<Vec<u8>> {
        match self.randomness.digest_for_height(height) {
            Some(digest) if !digest.is_empty() => Ok(digest),
            _ => {
                log::debug!("height={height} randomness not final yet");
                Err(ContractError::RandomnessUnavailable { height })
            }
        }
    }
}

/// Run the checks for `op`, logging a rejection.
fn guarded<T>(
    ctx: &RequestContext,
    op: &str,
    checks: impl FnOnce() -> ContractResult<T>,
) -> ContractResult<T> {
    checks().inspect_err(|e| log::warn!("height={} {op} rejected: {e}", ctx.height))
}
