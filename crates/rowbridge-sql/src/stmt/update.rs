use super::Value;

/// `column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

/// `UPDATE` of the row with a given identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,

    pub assignments: Vec<Assignment>,

    pub id: i64,

    pub returning: Option<String>,
}

impl Update {
    pub fn new(table: impl Into<String>, id: i64) -> Update {
        Update {
            table: table.into(),
            assignments: vec![],
            id,
            returning: Some(super::ID.to_string()),
        }
    }

    /// Marks the row deleted without removing it.
    pub fn soft_delete(table: impl Into<String>, id: i64) -> Update {
        Update::new(table, id).set(super::IS_DELETED, true)
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Update {
        self.assignments.push(Assignment {
            column: column.into(),
            value: value.into(),
        });
        self
    }
}
