mod response;
pub use response::Response;

pub mod operation;
pub use operation::{Operation, Sql};

use crate::async_trait;

use std::{borrow::Cow, fmt::Debug};

/// A relational store the generic executor can run statements against.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Connection URL, for diagnostics.
    fn url(&self) -> Cow<'_, str>;

    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Upper bound on simultaneously open connections, if the store has one.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// One open connection to the store.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a single operation.
    ///
    /// A failed [`Operation::Transaction`] or [`Operation::BulkInsert`] must
    /// leave the store exactly as it was before the call.
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;
}
