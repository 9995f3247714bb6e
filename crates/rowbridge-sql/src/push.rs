//! Turns one entity into the statement that persists it.
//!
//! * soft-deleted: `UPDATE .. SET IsDeleted = 1` on its identity
//! * new (`Id == 0`): `INSERT` of every table column except the identity
//! * loaded from the store: `UPDATE` of the columns whose fields are dirty
//! * otherwise: an [`Upsert`] guarded on the identity, since the row may
//!   or may not exist yet
//!
//! Columns are resolved against the entity with the column mapper. Fields the
//! dirty tracker reports as pristine are left out of updates; an untracked
//! entity writes every column.

use crate::stmt::{Assignment, Insert, Statement, Update, Upsert, Value, ID};

use rowbridge_core::{
    entity::{fields, Field},
    Entity, Mapper,
};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Push<'a> {
    table: &'a str,

    /// Table columns from the schema; empty means use the entity's own
    /// field names.
    columns: &'a [String],

    mapper: Mapper,
}

impl<'a> Push<'a> {
    pub fn new(table: &'a str, columns: &'a [String]) -> Push<'a> {
        Push {
            table,
            columns,
            mapper: Mapper::new(),
        }
    }

    pub fn with_mapper(mut self, mapper: Mapper) -> Push<'a> {
        self.mapper = mapper;
        self
    }

    /// The statement persisting `entity`, or `None` when there is nothing
    /// to write: a store-loaded entity with no changed field, or a deleted
    /// entity that was never stored.
    pub fn statement<E: Entity>(&self, entity: &E) -> Option<Statement> {
        let base = entity.base();
        let id = entity.id();

        if base.is_deleted {
            if base.is_new() {
                return None;
            }
            return Some(Update::soft_delete(self.table, id).into());
        }

        let columns = self.writable::<E>();
        let insert = self.build_insert(entity, &columns);

        if base.is_new() {
            return Some(insert.into());
        }

        let update = self.assignments(entity, &columns);

        if base.is_mapped() {
            if update.is_empty() {
                debug!(entity = E::NAME, id, "no dirty fields; nothing to push");
                return None;
            }

            return Some(
                Update {
                    table: self.table.to_string(),
                    assignments: update,
                    id,
                    returning: Some(ID.to_string()),
                }
                .into(),
            );
        }

        Some(Upsert { id, insert, update }.into())
    }

    pub fn table(&self) -> &str {
        self.table
    }

    pub fn columns(&self) -> &[String] {
        self.columns
    }

    pub fn mapper(&self) -> Mapper {
        self.mapper
    }

    /// Plain `INSERT` of `entity` whatever its identity and state.
    pub fn insert<E: Entity>(&self, entity: &E) -> Insert {
        self.build_insert(entity, &self.writable::<E>())
    }

    /// Writable columns paired with the field feeding each.
    fn writable<E: Entity>(&self) -> Vec<(String, Field<E>)> {
        if self.columns.is_empty() {
            return fields::<E>()
                .filter(|field| field.name != ID)
                .map(|field| (field.name.to_string(), field))
                .collect();
        }

        self.columns
            .iter()
            .zip(self.mapper.resolve_columns::<E>(self.columns))
            .filter(|(column, _)| !column.eq_ignore_ascii_case(ID))
            .filter_map(|(column, field)| Some((column.clone(), field?)))
            .collect()
    }

    fn build_insert<E: Entity>(&self, entity: &E, columns: &[(String, Field<E>)]) -> Insert {
        let mut insert = Insert::new(self.table);

        for (column, field) in columns {
            insert.columns.push(column.clone());
            insert.values.push(store_value(field.get(entity)));
        }

        insert
    }

    fn assignments<E: Entity>(&self, entity: &E, columns: &[(String, Field<E>)]) -> Vec<Assignment> {
        let mut shaken_out = vec![];
        let mut assignments = vec![];

        for (column, field) in columns {
            if entity.is_field_dirty(field.name) == Some(false) {
                shaken_out.push(field.name);
                continue;
            }

            assignments.push(Assignment {
                column: column.clone(),
                value: store_value(field.get(entity)),
            });
        }

        if !shaken_out.is_empty() {
            debug!(entity = E::NAME, id = entity.id(), ?shaken_out, "unchanged fields left out of update");
        }

        assignments
    }
}

/// Lists are stored as comma-separated text.
fn store_value(value: Value) -> Value {
    match value {
        Value::List(_) => Value::String(value.to_text().unwrap_or_default()),
        value => value,
    }
}
