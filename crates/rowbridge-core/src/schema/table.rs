use serde::{Deserialize, Serialize};

/// A table name and its ordered column names.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub name: String,
    pub fields: Vec<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            fields: vec![],
        }
    }

    pub fn with_fields<I, S>(name: impl Into<String>, fields: I) -> Table
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Table::new(name);
        for field in fields {
            table.push_field(field.as_ref());
        }
        table
    }

    /// Appends a column unless one with the same name (ignoring case) exists.
    pub fn push_field(&mut self, field: &str) {
        if !self.has_field(field) {
            self.fields.push(field.to_string());
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.eq_ignore_ascii_case(field))
    }
}
