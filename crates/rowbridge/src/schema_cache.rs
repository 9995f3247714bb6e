//! Time-bounded schema descriptor cache.
//!
//! The cached [`Schema`] is only ever replaced whole. Readers clone an
//! `Arc` to the current snapshot under a short read lock, so a refresh never
//! exposes a half-built schema, and no lock is held while loading.

use crate::Result;

use parking_lot::RwLock;
use rowbridge_core::Schema;
use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::info;

#[derive(Debug)]
pub struct SchemaCache {
    refresh: Duration,
    state: RwLock<Option<Snapshot>>,
}

#[derive(Debug, Clone)]
struct Snapshot {
    schema: Arc<Schema>,
    loaded_at: Instant,
}

impl SchemaCache {
    pub fn new(refresh: Duration) -> SchemaCache {
        SchemaCache {
            refresh,
            state: RwLock::new(None),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh
    }

    /// The cached schema, fresh or not.
    pub fn current(&self) -> Option<Arc<Schema>> {
        self.state.read().as_ref().map(|s| s.schema.clone())
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh().is_some()
    }

    /// Returns the cached schema while it is younger than the refresh
    /// interval, otherwise awaits `load` and caches its result.
    ///
    /// Concurrent callers that find the cache stale may each load; the last
    /// one to finish wins. A failed load leaves the previous snapshot in
    /// place.
    pub async fn get_or_refresh<F, Fut>(&self, load: F) -> Result<Arc<Schema>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Schema>>,
    {
        if let Some(schema) = self.fresh() {
            return Ok(schema);
        }

        let schema = load().await?;
        Ok(self.replace(schema))
    }

    /// Installs `schema` as the current snapshot.
    pub fn replace(&self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        info!(tables = schema.tables.len(), "schema cache refreshed");

        *self.state.write() = Some(Snapshot {
            schema: schema.clone(),
            loaded_at: Instant::now(),
        });
        schema
    }

    /// Forces the next `get_or_refresh` to load.
    pub fn invalidate(&self) {
        *self.state.write() = None;
    }

    fn fresh(&self) -> Option<Arc<Schema>> {
        let state = self.state.read();
        let snapshot = state.as_ref()?;
        (snapshot.loaded_at.elapsed() < self.refresh).then(|| snapshot.schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbridge_core::schema::Table;

    fn schema(tables: &[&str]) -> Schema {
        Schema {
            tables: tables.iter().map(|name| Table::new(*name)).collect(),
        }
    }

    #[tokio::test]
    async fn loads_once_within_interval() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        let mut loads = 0;

        for _ in 0..3 {
            cache
                .get_or_refresh(|| {
                    loads += 1;
                    async { Ok(schema(&["Quiz"])) }
                })
                .await
                .unwrap();
        }

        assert_eq!(loads, 1);
        assert!(cache.is_fresh());
    }

    #[tokio::test]
    async fn reloads_after_interval() {
        let cache = SchemaCache::new(Duration::ZERO);
        cache.replace(schema(&["Quiz"]));
        assert!(!cache.is_fresh());

        let loaded = cache
            .get_or_refresh(|| async { Ok(schema(&["Quiz", "Question"])) })
            .await
            .unwrap();
        assert_eq!(loaded.tables.len(), 2);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_snapshot() {
        let cache = SchemaCache::new(Duration::ZERO);
        cache.replace(schema(&["Quiz"]));

        let err = cache
            .get_or_refresh(|| async { Err(rowbridge_core::err!("store unreachable")) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "store unreachable");
        assert_eq!(cache.current().unwrap().tables[0].name, "Quiz");
    }

    #[test]
    fn readers_keep_their_snapshot() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        cache.replace(schema(&["Quiz"]));
        let held = cache.current().unwrap();

        cache.replace(schema(&["Answer"]));
        assert_eq!(held.tables[0].name, "Quiz");
        assert_eq!(cache.current().unwrap().tables[0].name, "Answer");

        cache.invalidate();
        assert!(cache.current().is_none());
    }
}
