use super::Value;
use indexmap::IndexMap;

/// One result row: column name to value, in select order.
pub type Row = IndexMap<String, Value>;
