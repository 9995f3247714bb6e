use super::{Condition, Value};
use chrono::NaiveDateTime;

/// A positional filter argument: either a literal compared for equality or
/// a raw [`Condition`] appended after the field name.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    Condition(Condition),
}

impl Arg {
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Self::Condition(cond) => Some(cond),
            Self::Value(_) => None,
        }
    }
}

impl Default for Arg {
    fn default() -> Self {
        Self::Value(Value::Null)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Condition> for Arg {
    fn from(cond: Condition) -> Self {
        Self::Condition(cond)
    }
}

macro_rules! arg_from_literal {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

arg_from_literal!(bool, i32, i64, f64, &str, String, NaiveDateTime);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        Self::Value(Value::from(value))
    }
}
