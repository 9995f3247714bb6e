use crate::stmt::Value;

/// Statement text plus bound parameter values.
///
/// Parameters are only ever values. Statements built in inline mode carry
/// none.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sql {
    pub text: String,
    pub params: Vec<Value>,
}

impl Sql {
    pub fn new(text: impl Into<String>) -> Sql {
        Sql {
            text: text.into(),
            params: vec![],
        }
    }

    pub fn with_params(text: impl Into<String>, params: Vec<Value>) -> Sql {
        Sql {
            text: text.into(),
            params,
        }
    }
}

impl From<&str> for Sql {
    fn from(text: &str) -> Sql {
        Sql::new(text)
    }
}

impl From<String> for Sql {
    fn from(text: String) -> Sql {
        Sql::new(text)
    }
}

#[derive(Debug)]
pub enum Operation {
    /// Row-returning statement
    Query(Sql),

    /// First column of the first row
    Scalar(Sql),

    /// Statement without a result set; responds with the affected row count
    NonQuery(Sql),

    /// Every statement in order inside one transaction
    Transaction(Vec<Sql>),

    /// High-throughput load of many rows into one table
    BulkInsert(BulkInsert),

    /// Read the store catalog into a schema descriptor
    ReadSchema,
}

#[derive(Debug, Clone)]
pub struct BulkInsert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,

    /// Rows per prepared-statement batch
    pub batch_size: usize,
}
