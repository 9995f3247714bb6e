use super::{Arg, Condition, Value};

/// One `AND` term of a projection's `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field IS NULL`
    IsNull(String),

    /// `field <condition text>`
    Condition(String, Condition),

    /// `field = value`
    Eq(String, Value),
}

impl Filter {
    pub fn new(field: impl Into<String>, arg: impl Into<Arg>) -> Filter {
        let field = field.into();

        match arg.into() {
            Arg::Condition(condition) => Filter::Condition(field, condition),
            Arg::Value(Value::Null) => Filter::IsNull(field),
            Arg::Value(value) => Filter::Eq(field, value),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Filter::IsNull(field) | Filter::Condition(field, _) | Filter::Eq(field, _) => field,
        }
    }
}
