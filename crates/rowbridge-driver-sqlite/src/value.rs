use rowbridge_core::stmt::Value as CoreValue;
use rusqlite::{
    types::{ToSql, ToSqlOutput, Type, Value as SqlValue, ValueRef},
    Row,
};

/// Binds a core value as a statement parameter.
#[derive(Debug)]
pub struct Value<'a>(pub &'a CoreValue);

impl Value<'_> {
    /// Reads column `index` of `row` into a core value.
    ///
    /// SQLite has no boolean or date types; those come back as integers and
    /// text and are coerced later against the entity's field types.
    pub fn from_sql(row: &Row<'_>, index: usize) -> rusqlite::Result<CoreValue> {
        Ok(match row.get_ref(index)? {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
            ValueRef::Blob(_) => {
                let name = row.as_ref().column_name(index)?.to_string();
                return Err(rusqlite::Error::InvalidColumnType(index, name, Type::Blob));
            }
        })
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self.0 {
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            CoreValue::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            value @ (CoreValue::List(_) | CoreValue::DateTime(_)) => Ok(ToSqlOutput::Owned(
                SqlValue::Text(value.to_text().unwrap_or_default()),
            )),
        }
    }
}
