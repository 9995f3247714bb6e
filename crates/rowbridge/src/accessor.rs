use crate::{Client, Result};

use rowbridge_core::{
    stmt::{Arg, Condition, FromValue, Type, Value},
    Entity, Error, Tracked,
};
use rowbridge_sql::{
    stmt::{Filter, Select, ID},
    Push,
};
use std::marker::PhantomData;
use tracing::debug;

/// Typed reads and writes of one entity type.
///
/// Loaded entities come back mapped from the store and tracked, so that a
/// later [`push`](Accessor::push) only writes what changed.
pub struct Accessor<'a, E> {
    client: &'a Client,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> Accessor<'a, E> {
    pub(crate) fn new(client: &'a Client) -> Accessor<'a, E> {
        Accessor {
            client,
            _entity: PhantomData,
        }
    }

    /// A projection over the entity's table.
    pub fn select(&self) -> Select {
        Select::new(E::TABLE)
    }

    /// Runs `select` and maps every row onto an entity.
    pub async fn list(&self, select: Select) -> Result<Vec<E>> {
        self.check_conditions(&select)?;

        let columns = self.client.table_fields(E::TABLE).await?;
        let rows = self.client.query(self.client.render(&select.into())).await?;
        let mapper = self.client.config().mapper();

        rows.iter()
            .map(|row| {
                let mut entity = mapper.load::<E>(row, &columns)?;
                entity.reset_check_dirty();
                Ok(entity)
            })
            .collect()
    }

    /// Rows matching parallel field and value lists.
    ///
    /// Values past the last field are only used when they are conditions.
    /// Pagination applies when `offset >= 0` and `count > 0`.
    pub async fn by_fields<I>(&self, fields: &[&str], values: I, offset: i64, count: i64) -> Result<Vec<E>>
    where
        I: IntoIterator<Item = Arg>,
    {
        let select = Select::from_fields(E::TABLE, fields, values).paginate(offset, count);
        self.list(select).await
    }

    /// First row of `select`, if any.
    pub async fn first(&self, select: Select) -> Result<Option<E>> {
        Ok(self.list(select).await?.into_iter().next())
    }

    pub async fn id(&self, id: i64) -> Result<Option<E>> {
        self.first(self.select().filter(ID, id)).await
    }

    /// Every row that is not soft-deleted.
    pub async fn all(&self) -> Result<Vec<E>> {
        self.list(self.select()).await
    }

    /// Number of rows `select` matches.
    pub async fn count(&self, select: Select) -> Result<u64> {
        self.check_conditions(&select)?;

        let sql = self.client.render(&select.count().into());
        let Some(text) = self.client.scalar(sql).await? else {
            return Ok(0);
        };

        let count = i64::from_value(Value::String(text).coerce(Type::I64)?)?;
        u64::try_from(count).map_err(|_| Error::type_conversion(Value::I64(count), "u64"))
    }

    /// Rows whose `column` is one of `values`. Sends nothing when `values`
    /// is empty.
    pub async fn where_column_in<I, V>(&self, column: &str, values: I) -> Result<Vec<E>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<Value>>();
        if values.is_empty() {
            return Ok(vec![]);
        }

        let max_len = self.client.config().max_condition_len;
        let condition = Condition::is_in_with_max_len(values, max_len)?;
        self.list(self.select().filter(column, condition)).await
    }

    /// Persists one entity.
    ///
    /// A new entity receives the identity the store assigned. Afterwards the
    /// entity counts as stored and, when tracked, pristine. Returns `true`
    /// without a round trip when there is nothing to write.
    pub async fn push(&self, entity: &mut E) -> Result<bool> {
        entity.check_dirty();

        let columns = self.client.table_fields(E::TABLE).await?;
        let push = Push::new(E::TABLE, &columns).with_mapper(self.client.config().mapper());

        let Some(stmt) = push.statement(&*entity) else {
            return Ok(true);
        };

        let returned = self.client.scalar(self.client.render(&stmt)).await?;

        if entity.base().is_new() {
            let id = returned
                .map(|text| Value::String(text).coerce(Type::I64))
                .transpose()?
                .and_then(|value| value.as_i64())
                .ok_or_else(|| rowbridge_core::err!("{} insert returned no identity", E::NAME))?;
            entity.base_mut().set_id(id)?;
            debug!(entity = E::NAME, id, "identity assigned");
        }

        entity.base_mut().set_mapped(true);
        if entity.is_tracking() {
            entity.reset_check_dirty();
        }

        Ok(true)
    }

    /// Loads `entities` through the service's bulk path.
    pub async fn bulk_insert(&self, entities: &[E]) -> Result<bool> {
        if entities.is_empty() {
            return Ok(true);
        }

        let jsons = entities
            .iter()
            .map(|entity| serde_json::to_string(&entity.to_row()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.client.bulk_insert(E::NAME, jsons).await
    }

    fn check_conditions(&self, select: &Select) -> Result<()> {
        let max_len = self.client.config().max_condition_len;

        let conditions = select
            .filters
            .iter()
            .filter_map(|filter| match filter {
                Filter::Condition(_, condition) => Some(condition),
                _ => None,
            })
            .chain(&select.trailing);

        for condition in conditions {
            if condition.as_str().len() > max_len {
                return Err(Error::invalid_condition(format!(
                    "fragment is {} bytes, limit is {max_len}",
                    condition.as_str().len()
                )));
            }
        }

        Ok(())
    }
}
