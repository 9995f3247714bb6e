//! Routes and JSON bodies shared by the client and the service.

use rowbridge_core::{driver::Sql, stmt::Value};
use serde::{Deserialize, Serialize};

pub const QUERY: &str = "Generic/Query";
pub const QUERIES: &str = "Generic/Queries";
pub const NON_QUERY: &str = "Generic/NonQuery";
pub const SCALAR: &str = "Generic/Scalar";
pub const TRANSACTION: &str = "Generic/Transaction";
pub const BULK_INSERT: &str = "Generic/BulkInsert";
pub const GET_SCHEMA: &str = "Master/GetSchema";

/// Encrypted statement text plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlRequest {
    pub sql: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
}

impl SqlRequest {
    pub fn new(ciphertext: String, params: Vec<Value>) -> SqlRequest {
        SqlRequest {
            sql: ciphertext,
            params,
        }
    }

    /// Pairs decrypted text with the request's parameters.
    pub fn into_sql(self, text: String) -> Sql {
        Sql::with_params(text, self.params)
    }
}

/// A single text result, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueResponse {
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

impl ValueResponse {
    pub fn new(value: Option<String>) -> ValueResponse {
        ValueResponse { value }
    }
}

/// Serialized records of one entity type to load in bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BulkInput {
    pub entity: String,
    pub jsons: Vec<String>,
}
