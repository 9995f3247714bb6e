use super::{Flavor, Formatter, Params, ToSql};

use rowbridge_core::stmt::Value;

/// A value rendered as an escaped literal.
struct Literal<'a>(&'a Value);

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match f.params.push(self) {
            Some(placeholder) => fmt!(f, placeholder),
            None => fmt!(f, Literal(self)),
        }
    }
}

impl ToSql for Literal<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        match self.0 {
            Value::Null => f.dst.push_str("NULL"),
            Value::Bool(v) => f.dst.push(if *v { '1' } else { '0' }),
            Value::I64(v) => {
                let _ = write!(f.dst, "{v}");
            }
            Value::F64(v) if v.is_finite() => {
                let _ = write!(f.dst, "{v}");
            }
            Value::F64(_) => f.dst.push_str("NULL"),
            Value::String(text) => quoted(text, f),
            value @ (Value::List(_) | Value::DateTime(_)) => {
                quoted(&value.to_text().unwrap_or_default(), f)
            }
        }
    }
}

fn quoted<P>(text: &str, f: &mut Formatter<'_, P>) {
    if f.serializer.flavor == Flavor::Mssql {
        f.dst.push('N');
    }

    f.dst.push('\'');
    f.dst.push_str(&text.replace('\'', "''"));
    f.dst.push('\'');
}
