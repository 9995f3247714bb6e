use super::{Assignment, Insert};

/// Updates the row with `id` when it exists and inserts it otherwise.
///
/// An empty `update` turns the statement into an insert-if-absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    pub id: i64,

    /// Insert without the identity column.
    pub insert: Insert,

    pub update: Vec<Assignment>,
}
