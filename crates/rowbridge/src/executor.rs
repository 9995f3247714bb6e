//! Server-side execution of decrypted statement text.
//!
//! Every call checks one connection out of the pool and holds it until the
//! call returns. `queries` and `transaction` run their whole batch on that
//! one connection.

use crate::{pool::Pool, Result};

use rowbridge_core::{
    driver::{operation::BulkInsert, Driver, Operation, Response, Sql},
    stmt::{Row, Value},
    Schema,
};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Executor {
    pool: Arc<Pool>,
}

impl Executor {
    pub fn new(driver: impl Driver) -> Result<Executor> {
        Ok(Executor {
            pool: Arc::new(Pool::new(driver)?),
        })
    }

    /// Rows of a row-returning statement; empty when nothing matched.
    pub async fn query(&self, sql: impl Into<Sql>) -> Result<Vec<Row>> {
        self.exec(Operation::Query(sql.into())).await?.into_rows()
    }

    /// Independent row-returning statements on one connection, results
    /// parallel to the input.
    pub async fn queries(&self, batch: Vec<Sql>) -> Result<Vec<Vec<Row>>> {
        let mut connection = self.pool.get().await?;
        let mut results = Vec::with_capacity(batch.len());

        for (index, sql) in batch.into_iter().enumerate() {
            let rows = connection
                .exec(Operation::Query(sql))
                .await
                .and_then(Response::into_rows)
                .map_err(|err| err.context(format!("query #{index}")))?;
            results.push(rows);
        }

        Ok(results)
    }

    /// First column of the first row, or `None` when there is no row.
    pub async fn scalar(&self, sql: impl Into<Sql>) -> Result<Option<Value>> {
        self.exec(Operation::Scalar(sql.into())).await?.into_scalar()
    }

    /// Affected row count of a statement without a result set.
    pub async fn non_query(&self, sql: impl Into<Sql>) -> Result<u64> {
        self.exec(Operation::NonQuery(sql.into())).await?.into_count()
    }

    /// Runs every statement inside one transaction.
    ///
    /// `Ok(false)` means a statement failed and the whole batch was rolled
    /// back. Failing to reach the store at all is still an error.
    pub async fn transaction(&self, batch: Vec<Sql>) -> Result<bool> {
        if batch.is_empty() {
            return Ok(true);
        }

        let len = batch.len();
        debug!(statements = len, "transaction");
        match self.exec(Operation::Transaction(batch)).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_driver() || err.is_statement_timeout() => {
                warn!(error = %err, statements = len, "transaction rolled back");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Loads `rows` into `table` in batches inside one transaction. Returns
    /// the number of rows written.
    pub async fn bulk_insert(
        &self,
        table: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        batch_size: usize,
    ) -> Result<u64> {
        debug!(rows = rows.len(), batch_size, "bulk insert");
        let op = BulkInsert {
            table: table.into(),
            columns,
            rows,
            batch_size,
        };
        self.exec(Operation::BulkInsert(op)).await?.into_count()
    }

    /// Reads the store catalog.
    pub async fn read_schema(&self) -> Result<Schema> {
        self.exec(Operation::ReadSchema).await?.into_schema()
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut connection = self.pool.get().await?;
        connection.exec(op).await
    }
}
