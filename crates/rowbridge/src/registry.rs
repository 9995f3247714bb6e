//! Entity types addressable by name.
//!
//! `BulkInsert` requests name their entity as text. The registry maps that
//! name to the entity's table and to a decoder that turns one JSON record
//! into an insert through the column mapper.

use crate::Result;

use indexmap::IndexMap;
use rowbridge_core::{stmt::Row, Entity, Error};
use rowbridge_sql::{stmt::Insert, Push};

type Decode = fn(&Push<'_>, &str) -> Result<Insert>;

#[derive(Clone, Copy)]
pub struct Entry {
    pub name: &'static str,
    pub table: &'static str,
    decode: Decode,
}

impl Entry {
    /// Decodes one serialized record into an insert of the pushed table's
    /// columns.
    pub fn decode(&self, push: &Push<'_>, json: &str) -> Result<Insert> {
        (self.decode)(push, json)
            .map_err(|err| err.context(format!("decoding {} record", self.name)))
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("table", &self.table)
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn register<E: Entity>(&mut self) -> &mut Registry {
        self.entries.insert(
            E::NAME.to_ascii_lowercase(),
            Entry {
                name: E::NAME,
                table: E::TABLE,
                decode: decode::<E>,
            },
        );
        self
    }

    pub fn with<E: Entity>(mut self) -> Registry {
        self.register::<E>();
        self
    }

    /// Looks an entity up by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<&Entry> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::unknown_entity(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|entry| entry.name)
    }
}

fn decode<E: Entity>(push: &Push<'_>, json: &str) -> Result<Insert> {
    let row: Row = serde_json::from_str(json)?;
    let entity = push.mapper().load::<E>(&row, push.columns())?;
    Ok(push.insert(&entity))
}
