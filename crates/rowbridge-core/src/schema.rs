mod table;
pub use table::Table;

use serde::{Deserialize, Serialize};

/// Column layout of every table in the store.
///
/// Read from the store's catalog, shipped to clients encrypted, and consulted
/// when building `INSERT`/`UPDATE` column lists and when reconciling result
/// columns with entity fields.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    /// Builds a schema from `(table, column)` catalog pairs.
    ///
    /// Tables and columns keep first-seen order; repeats are dropped
    /// case-insensitively.
    pub fn from_catalog<I, T, C>(pairs: I) -> Schema
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let mut schema = Schema::default();

        for (table, column) in pairs {
            let table = table.as_ref();
            let index = match schema.position(table) {
                Some(index) => index,
                None => {
                    schema.tables.push(Table::new(table));
                    schema.tables.len() - 1
                }
            };
            schema.tables[index].push_field(column.as_ref());
        }

        schema
    }

    /// Looks a table up by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.position(name).map(|index| &self.tables[index])
    }

    /// Ordered column names of `table`, or an empty slice when it is unknown.
    pub fn table_fields(&self, name: &str) -> &[String] {
        self.table(name).map(|t| &t.fields[..]).unwrap_or(&[])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
    }
}
