//! Server side of the wire contract.
//!
//! Every handler decrypts its statement text, runs it through the
//! [`Executor`] and encodes the result. Row sets go back as plain JSON text;
//! only the schema descriptor is encrypted on the way out.

use crate::{
    client::Transport,
    wire::{self, BulkInput, SqlRequest, ValueResponse},
    Cipher, Config, Executor, Registry, Result, SchemaCache,
};

use rowbridge_core::{async_trait, bail, driver::Sql, Schema};
use rowbridge_sql::Push;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Service {
    executor: Executor,
    cipher: Cipher,
    registry: Registry,
    schema: SchemaCache,
    config: Config,
}

impl Service {
    pub fn new(executor: Executor, registry: Registry, config: Config) -> Result<Service> {
        config.validate()?;
        Ok(Service {
            executor,
            cipher: config.cipher()?,
            registry,
            schema: SchemaCache::new(config.schema_refresh()),
            config,
        })
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Routes one request body to its handler and encodes the reply.
    pub async fn dispatch(&self, route: &str, body: &str) -> Result<String> {
        debug!(route, len = body.len(), "request");
        self.route(route, body)
            .await
            .map_err(|err| err.context(format!("handling {route}")))
    }

    async fn route(&self, route: &str, body: &str) -> Result<String> {
        match route {
            wire::QUERY => encode(&self.query(decode(body)?).await?),
            wire::QUERIES => encode(&self.queries(decode(body)?).await?),
            wire::NON_QUERY => encode(&self.non_query(decode(body)?).await?),
            wire::SCALAR => encode(&self.scalar(decode(body)?).await?),
            wire::TRANSACTION => encode(&self.transaction(decode(body)?).await?),
            wire::BULK_INSERT => encode(&self.bulk_insert(decode(body)?).await?),
            wire::GET_SCHEMA => encode(&self.get_schema().await?),
            _ => bail!("no handler for route `{route}`"),
        }
    }

    pub async fn query(&self, request: SqlRequest) -> Result<ValueResponse> {
        let rows = self.executor.query(self.open(request)?).await?;
        Ok(ValueResponse::new(Some(serde_json::to_string(&rows)?)))
    }

    pub async fn queries(&self, requests: Vec<SqlRequest>) -> Result<ValueResponse> {
        let batch = self.open_all(requests)?;
        let results = self.executor.queries(batch).await?;
        Ok(ValueResponse::new(Some(serde_json::to_string(&results)?)))
    }

    /// `true` when the statement changed at least one row.
    pub async fn non_query(&self, request: SqlRequest) -> Result<bool> {
        Ok(self.executor.non_query(self.open(request)?).await? > 0)
    }

    pub async fn scalar(&self, request: SqlRequest) -> Result<ValueResponse> {
        let value = self.executor.scalar(self.open(request)?).await?;
        Ok(ValueResponse::new(value.and_then(|value| value.to_text())))
    }

    /// All or nothing. Every statement must decrypt before any runs.
    pub async fn transaction(&self, requests: Vec<SqlRequest>) -> Result<bool> {
        let batch = self.open_all(requests)?;
        self.executor.transaction(batch).await
    }

    pub async fn bulk_insert(&self, input: BulkInput) -> Result<bool> {
        let entry = *self.registry.resolve(&input.entity)?;
        if input.jsons.is_empty() {
            return Ok(true);
        }

        let schema = self.schema().await?;
        let columns = schema.table_fields(entry.table);
        let push = Push::new(entry.table, columns).with_mapper(self.config.mapper());

        let mut header = None;
        let mut rows = Vec::with_capacity(input.jsons.len());
        for json in &input.jsons {
            let insert = entry.decode(&push, json)?;
            header.get_or_insert(insert.columns);
            rows.push(insert.values);
        }

        let loaded = self
            .executor
            .bulk_insert(
                entry.table,
                header.unwrap_or_default(),
                rows,
                self.config.bulk_batch_size,
            )
            .await?;

        debug!(entity = entry.name, loaded, "bulk insert complete");
        Ok(true)
    }

    /// The schema descriptor as encrypted JSON.
    pub async fn get_schema(&self) -> Result<ValueResponse> {
        let schema = self.schema().await?;
        let json = serde_json::to_string(&*schema)?;
        Ok(ValueResponse::new(Some(self.cipher.encrypt(&json))))
    }

    /// Catalog snapshot, re-read once the refresh interval has passed.
    pub async fn schema(&self) -> Result<Arc<Schema>> {
        self.schema
            .get_or_refresh(|| self.executor.read_schema())
            .await
    }

    /// Drops the cached catalog, e.g. after a migration.
    pub fn invalidate_schema(&self) {
        self.schema.invalidate();
    }

    fn open(&self, request: SqlRequest) -> Result<Sql> {
        let text = self.cipher.decrypt(&request.sql)?;
        Ok(request.into_sql(text))
    }

    fn open_all(&self, requests: Vec<SqlRequest>) -> Result<Vec<Sql>> {
        requests
            .into_iter()
            .enumerate()
            .map(|(index, request)| {
                self.open(request)
                    .map_err(|err| err.context(format!("statement #{index}")))
            })
            .collect()
    }
}

#[async_trait]
impl Transport for Service {
    async fn post(&self, route: &str, body: String) -> Result<String> {
        self.dispatch(route, &body).await
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

fn encode<T: Serialize>(reply: &T) -> Result<String> {
    Ok(serde_json::to_string(reply)?)
}
