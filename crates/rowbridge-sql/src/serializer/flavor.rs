use super::Serializer;

/// SQL dialect a [`Serializer`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// T-SQL: `[ident]`, `N'..'`, `OUTPUT INSERTED`, `OFFSET .. FETCH NEXT`
    Mssql,

    /// SQLite: `"ident"`, `RETURNING`, `LIMIT .. OFFSET`, `ON CONFLICT`
    Sqlite,
}

impl Serializer {
    pub fn mssql() -> Serializer {
        Serializer::new(Flavor::Mssql)
    }

    pub fn sqlite() -> Serializer {
        Serializer::new(Flavor::Sqlite)
    }
}
