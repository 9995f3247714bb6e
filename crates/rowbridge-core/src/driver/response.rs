use crate::{
    stmt::{Row, Value},
    Schema,
};

#[derive(Debug)]
pub enum Response {
    Rows(Vec<Row>),
    Scalar(Option<Value>),

    /// Number of rows impacted by the operation
    Count(u64),

    Schema(Schema),
}

impl Response {
    pub fn count(count: u64) -> Response {
        Response::Count(count)
    }

    pub fn into_rows(self) -> crate::Result<Vec<Row>> {
        match self {
            Response::Rows(rows) => Ok(rows),
            other => crate::bail!("expected rows, got {}", other.kind_name()),
        }
    }

    pub fn into_scalar(self) -> crate::Result<Option<Value>> {
        match self {
            Response::Scalar(value) => Ok(value),
            other => crate::bail!("expected a scalar, got {}", other.kind_name()),
        }
    }

    pub fn into_count(self) -> crate::Result<u64> {
        match self {
            Response::Count(count) => Ok(count),
            other => crate::bail!("expected a row count, got {}", other.kind_name()),
        }
    }

    pub fn into_schema(self) -> crate::Result<Schema> {
        match self {
            Response::Schema(schema) => Ok(schema),
            other => crate::bail!("expected a schema, got {}", other.kind_name()),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Response::Rows(_) => "rows",
            Response::Scalar(_) => "scalar",
            Response::Count(_) => "count",
            Response::Schema(_) => "schema",
        }
    }
}
