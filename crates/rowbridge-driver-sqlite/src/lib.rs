mod value;
pub(crate) use value::Value;

use rowbridge_core::{
    async_trait,
    driver::{
        operation::{BulkInsert, Operation, Sql},
        Driver, Response,
    },
    stmt::{self, Row},
    Error, Result, Schema,
};
use rowbridge_sql::{stmt::Insert, Serializer};
use rusqlite::{params_from_iter, Connection as RusqliteConnection, ErrorCode};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{debug, warn};
use url::Url;

/// Virtual machine steps between statement deadline checks.
const PROGRESS_STEPS: i32 = 1000;

const READ_SCHEMA: &str = "SELECT m.name, p.name \
    FROM sqlite_master AS m JOIN pragma_table_info(m.name) AS p \
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%' \
    ORDER BY m.rowid, p.cid";

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone)]
pub struct Sqlite {
    location: Location,
    statement_timeout: Option<Duration>,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_config(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::in_memory())
        } else {
            Ok(Self::open(url.path()))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            location: Location::InMemory,
            statement_timeout: None,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            statement_timeout: None,
        }
    }

    /// Interrupt any single statement that runs longer than `ceiling`.
    pub fn with_statement_timeout(mut self, ceiling: Duration) -> Self {
        self.statement_timeout = Some(ceiling);
        self
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match &self.location {
            Location::InMemory => Cow::Borrowed("sqlite::memory:"),
            Location::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    async fn connect(&self) -> Result<Box<dyn rowbridge_core::Connection>> {
        let connection = match &self.location {
            Location::File(path) => Connection::open(path)?,
            Location::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(Connection {
            statement_timeout: self.statement_timeout,
            ..connection
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        matches!(self.location, Location::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
    statement_timeout: Option<Duration>,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self::from_rusqlite(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self::from_rusqlite(connection))
    }

    fn from_rusqlite(connection: RusqliteConnection) -> Self {
        Self {
            connection,
            statement_timeout: None,
        }
    }

    /// Runs `f` with the statement deadline armed.
    fn guarded<T>(&self, f: impl FnOnce(&RusqliteConnection) -> rusqlite::Result<T>) -> Result<T> {
        if let Some(ceiling) = self.statement_timeout {
            let deadline = Instant::now() + ceiling;
            self.connection
                .progress_handler(PROGRESS_STEPS, Some(move || Instant::now() >= deadline));
        }

        let result = f(&self.connection);

        if self.statement_timeout.is_some() {
            self.connection.progress_handler(0, None::<fn() -> bool>);
        }

        result.map_err(|err| {
            let interrupted = matches!(
                &err,
                rusqlite::Error::SqliteFailure(failure, _)
                    if failure.code == ErrorCode::OperationInterrupted
            );

            match self.statement_timeout {
                Some(ceiling) if interrupted => Error::statement_timeout(ceiling),
                _ => Error::driver(err),
            }
        })
    }

    /// Runs one statement, returning its rows (empty when it has no result
    /// set) and the number of rows it changed.
    fn run(&self, sql: &Sql) -> Result<(Vec<Row>, u64)> {
        debug!(sql = %sql.text, params = sql.params.len(), "sqlite exec");

        self.guarded(|connection| {
            let mut stmt = connection.prepare_cached(&sql.text)?;
            let params = params_from_iter(sql.params.iter().map(Value));

            if stmt.column_count() == 0 {
                let count = stmt.execute(params)?;
                return Ok((vec![], count as u64));
            }

            let readonly = stmt.readonly();
            let columns = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>();

            let mut rows = stmt.query(params)?;
            let mut ret = vec![];

            while let Some(row) = rows.next()? {
                let mut record = Row::with_capacity(columns.len());
                for (index, column) in columns.iter().enumerate() {
                    record.insert(column.clone(), Value::from_sql(row, index)?);
                }
                ret.push(record);
            }

            // RETURNING statements change rows too
            let changed = if readonly { 0 } else { connection.changes() as u64 };
            Ok((ret, changed))
        })
    }

    fn scalar(&self, sql: &Sql) -> Result<Option<stmt::Value>> {
        let (rows, _) = self.run(sql)?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .map(|(_, value)| value))
    }

    /// Runs `body` between `BEGIN` and `COMMIT`, rolling back on any error.
    fn atomically<T>(&self, body: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.connection.execute_batch("BEGIN").map_err(Error::driver)?;

        match body(self) {
            Ok(ret) => {
                self.connection
                    .execute_batch("COMMIT")
                    .map_err(Error::driver)?;
                Ok(ret)
            }
            Err(err) => {
                warn!(error = %err, "rolling back transaction");
                self.connection
                    .execute_batch("ROLLBACK")
                    .map_err(Error::driver)?;
                Err(err)
            }
        }
    }

    fn transaction(&self, statements: &[Sql]) -> Result<u64> {
        self.atomically(|connection| {
            let mut count = 0;
            for (index, sql) in statements.iter().enumerate() {
                let (_, changed) = connection
                    .run(sql)
                    .map_err(|err| err.context(format!("transaction statement #{index}")))?;
                count += changed;
            }
            Ok(count)
        })
    }

    fn bulk_insert(&self, op: &BulkInsert) -> Result<u64> {
        let mut insert = Insert::new(&op.table);
        insert.columns = op.columns.clone();
        insert.values = vec![stmt::Value::Null; op.columns.len()];
        insert.returning = None;

        let mut placeholders: Vec<stmt::Value> = vec![];
        let text = Serializer::sqlite().serialize(&insert.into(), &mut placeholders);
        let batch_size = op.batch_size.max(1);

        self.atomically(|connection| {
            let mut count = 0;

            for (batch, rows) in op.rows.chunks(batch_size).enumerate() {
                count += connection.guarded(|connection| {
                    let mut stmt = connection.prepare_cached(&text)?;
                    let mut changed = 0;
                    for row in rows {
                        changed += stmt.execute(params_from_iter(row.iter().map(Value)))? as u64;
                    }
                    Ok(changed)
                })?;

                debug!(table = %op.table, batch, rows = rows.len(), "bulk insert batch loaded");
            }

            Ok(count)
        })
    }

    fn read_schema(&self) -> Result<Schema> {
        self.guarded(|connection| {
            let mut stmt = connection.prepare(READ_SCHEMA)?;
            let pairs = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(Schema::from_catalog(pairs))
        })
    }
}

#[async_trait]
impl rowbridge_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Query(sql) => Ok(Response::Rows(self.run(&sql)?.0)),
            Operation::Scalar(sql) => Ok(Response::Scalar(self.scalar(&sql)?)),
            Operation::NonQuery(sql) => Ok(Response::count(self.run(&sql)?.1)),
            Operation::Transaction(statements) => {
                Ok(Response::count(self.transaction(&statements)?))
            }
            Operation::BulkInsert(op) => Ok(Response::count(self.bulk_insert(&op)?)),
            Operation::ReadSchema => Ok(Response::Schema(self.read_schema()?)),
        }
    }
}
