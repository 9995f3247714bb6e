//! Client side of the wire contract.
//!
//! A [`Client`] renders statements, encrypts them and posts them through a
//! [`Transport`]. Entity-typed reads and writes go through an
//! [`Accessor`](crate::Accessor); multi-entity writes through a
//! [`Batch`](crate::Batch).

use crate::{
    wire::{self, BulkInput, SqlRequest, ValueResponse},
    Accessor, Batch, Cipher, Config, Result, SchemaCache,
};

use rowbridge_core::{async_trait, driver::Sql, stmt::Row, Entity, Schema};
use rowbridge_sql::{stmt::Statement, Flavor, Serializer};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt, sync::Arc};
use tracing::debug;

/// Carries one request body to the service and returns the reply body.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn post(&self, route: &str, body: String) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, route: &str, body: String) -> Result<String> {
        (**self).post(route, body).await
    }
}

pub struct Client {
    transport: Arc<dyn Transport>,
    cipher: Cipher,
    config: Config,
    schema: SchemaCache,
    serializer: Serializer,

    /// Bind values as parameters instead of inlining them as literals.
    parameterized: bool,
}

impl Client {
    /// A client rendering the T-SQL dialect with bound parameters.
    ///
    /// The bundled executor runs SQLite; pair it with
    /// `with_flavor(Flavor::Sqlite)`.
    pub fn new(transport: impl Transport, config: Config) -> Result<Client> {
        config.validate()?;
        Ok(Client {
            transport: Arc::new(transport),
            cipher: config.cipher()?,
            schema: SchemaCache::new(config.schema_refresh()),
            serializer: Serializer::mssql(),
            parameterized: true,
            config,
        })
    }

    /// Renders statements in `flavor`'s dialect.
    pub fn with_flavor(mut self, flavor: Flavor) -> Client {
        self.serializer = Serializer::new(flavor);
        self
    }

    /// Inline values as escaped literals instead of binding them.
    pub fn with_parameters(mut self, parameterized: bool) -> Client {
        self.parameterized = parameterized;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn flavor(&self) -> Flavor {
        self.serializer.flavor()
    }

    pub fn accessor<E: Entity>(&self) -> Accessor<'_, E> {
        Accessor::new(self)
    }

    pub fn batch(&self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Renders `stmt` in the client's dialect and parameter mode.
    pub fn render(&self, stmt: &Statement) -> Sql {
        if self.parameterized {
            let mut params = vec![];
            let text = self.serializer.serialize(stmt, &mut params);
            Sql::with_params(text, params)
        } else {
            Sql::new(self.serializer.inline(stmt))
        }
    }

    /// The service's schema descriptor, fetched again once the refresh
    /// interval has passed.
    pub async fn schema(&self) -> Result<Arc<Schema>> {
        self.schema.get_or_refresh(|| self.load_schema()).await
    }

    /// Fetches and decrypts the schema descriptor, bypassing the cache.
    pub async fn load_schema(&self) -> Result<Schema> {
        let response: ValueResponse = self.post(wire::GET_SCHEMA, &()).await?;
        let Some(ciphertext) = response.value else {
            return Ok(Schema::default());
        };
        Ok(serde_json::from_str(&self.cipher.decrypt(&ciphertext)?)?)
    }

    pub fn invalidate_schema(&self) {
        self.schema.invalidate();
    }

    /// Ordered columns of `table`, also matching schema tables stored
    /// without the `fdb.` prefix. Empty when the table is unknown.
    pub async fn table_fields(&self, table: &str) -> Result<Vec<String>> {
        let schema = self.schema().await?;
        let found = schema
            .table(table)
            .or_else(|| table.strip_prefix("fdb.").and_then(|name| schema.table(name)));
        Ok(found.map(|t| t.fields.clone()).unwrap_or_default())
    }

    pub async fn query(&self, sql: impl Into<Sql>) -> Result<Vec<Row>> {
        let response: ValueResponse = self.post(wire::QUERY, &self.seal(sql.into())).await?;
        match response.value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(vec![]),
        }
    }

    pub async fn queries(&self, batch: Vec<Sql>) -> Result<Vec<Vec<Row>>> {
        let requests = batch.into_iter().map(|sql| self.seal(sql)).collect::<Vec<_>>();
        let response: ValueResponse = self.post(wire::QUERIES, &requests).await?;
        match response.value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(vec![]),
        }
    }

    /// Text of the first column of the first row.
    pub async fn scalar(&self, sql: impl Into<Sql>) -> Result<Option<String>> {
        let response: ValueResponse = self.post(wire::SCALAR, &self.seal(sql.into())).await?;
        Ok(response.value)
    }

    /// `true` when the statement changed at least one row.
    pub async fn non_query(&self, sql: impl Into<Sql>) -> Result<bool> {
        self.post(wire::NON_QUERY, &self.seal(sql.into())).await
    }

    /// All or nothing; `false` means the batch was rolled back.
    pub async fn transaction(&self, batch: Vec<Sql>) -> Result<bool> {
        let requests = batch.into_iter().map(|sql| self.seal(sql)).collect::<Vec<_>>();
        self.post(wire::TRANSACTION, &requests).await
    }

    /// Loads serialized records of the entity registered as `entity`.
    pub async fn bulk_insert(&self, entity: &str, jsons: Vec<String>) -> Result<bool> {
        let input = BulkInput {
            entity: entity.to_string(),
            jsons,
        };
        self.post(wire::BULK_INSERT, &input).await
    }

    fn seal(&self, sql: Sql) -> SqlRequest {
        debug!(sql = %sql.text, params = sql.params.len(), "sending");
        SqlRequest::new(self.cipher.encrypt(&sql.text), sql.params)
    }

    async fn post<B, R>(&self, route: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_string(body)?;
        let reply = self.transport.post(route, body).await?;
        Ok(serde_json::from_str(&reply)?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("flavor", &self.serializer.flavor())
            .field("parameterized", &self.parameterized)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
