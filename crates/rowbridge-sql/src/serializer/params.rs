use super::{Flavor, Formatter, ToSql};

use rowbridge_core::stmt::Value;

/// Decides how values reach the statement.
pub trait Params {
    /// Records `value` and returns its placeholder, or `None` to have the
    /// value rendered inline as an escaped literal.
    fn push(&mut self, value: &Value) -> Option<Placeholder>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// Renders every value as a literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Params for Inline {
    fn push(&mut self, _value: &Value) -> Option<Placeholder> {
        None
    }
}

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Option<Placeholder> {
        self.push(value.clone());
        Some(Placeholder(self.len()))
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        let _ = match f.serializer.flavor {
            Flavor::Mssql => write!(&mut f.dst, "@p{}", self.0),
            Flavor::Sqlite => write!(&mut f.dst, "?{}", self.0),
        };
    }
}
