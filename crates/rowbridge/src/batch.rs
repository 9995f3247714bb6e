use crate::{Client, Result};

use rowbridge_core::{driver::Sql, Entity, Tracked};
use rowbridge_sql::Push;
use tracing::debug;

/// Push statements for many entities, sent as one transaction.
///
/// Entities that were loaded from the store, are tracked and have not
/// changed are shaken out and contribute no statement.
#[derive(Debug)]
pub struct Batch<'a> {
    client: &'a Client,
    statements: Vec<Sql>,
    shaken_out: usize,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(client: &'a Client) -> Batch<'a> {
        Batch {
            client,
            statements: vec![],
            shaken_out: 0,
        }
    }

    pub async fn push<E: Entity>(&mut self, entity: &mut E) -> Result<()> {
        entity.check_dirty();

        if entity.base().is_mapped() && entity.is_pristine() {
            debug!(entity = E::NAME, id = entity.id(), "unchanged; shaken out of batch");
            self.shaken_out += 1;
            return Ok(());
        }

        let columns = self.client.table_fields(E::TABLE).await?;
        let push = Push::new(E::TABLE, &columns).with_mapper(self.client.config().mapper());

        if let Some(stmt) = push.statement(&*entity) {
            self.statements.push(self.client.render(&stmt));
        }

        Ok(())
    }

    pub async fn push_all<E: Entity>(&mut self, entities: &mut [E]) -> Result<()> {
        for entity in entities {
            self.push(entity).await?;
        }
        Ok(())
    }

    /// Statements queued so far.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn shaken_out(&self) -> usize {
        self.shaken_out
    }

    /// Sends every queued statement in one transaction. `false` means the
    /// store rejected one of them and none were applied.
    pub async fn send(self) -> Result<bool> {
        if self.statements.is_empty() {
            return Ok(true);
        }

        debug!(statements = self.statements.len(), shaken_out = self.shaken_out, "sending batch");
        self.client.transaction(self.statements).await
    }
}
