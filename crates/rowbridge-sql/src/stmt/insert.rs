use super::Value;

/// `INSERT` of one row, returning the generated identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,

    pub columns: Vec<String>,

    /// Parallel to `columns`
    pub values: Vec<Value>,

    /// Column handed back to the caller, usually the identity
    pub returning: Option<String>,
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Insert {
        Insert {
            table: table.into(),
            columns: vec![],
            values: vec![],
            returning: Some(super::ID.to_string()),
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Insert {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }
}
