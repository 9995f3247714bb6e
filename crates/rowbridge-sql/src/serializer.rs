#[macro_use]
mod fmt;
use fmt::{comma, dotted, ToSql};

mod flavor;
pub use flavor::Flavor;

mod ident;
use ident::{Ident, Qualified};

mod params;
pub use params::{Inline, Params, Placeholder};

// Fragment serializers
mod statement;
mod value;

use crate::stmt::Statement;

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn new(flavor: Flavor) -> Serializer {
        Serializer { flavor }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Serializes `stmt`, routing every literal value through `params`.
    ///
    /// With [`Inline`] values are rendered as escaped literals; with a
    /// `Vec<Value>` they become placeholders and are collected in order.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    /// Serializes with every value inlined.
    pub fn inline(&self, stmt: &Statement) -> String {
        self.serialize(stmt, &mut Inline)
    }
}
