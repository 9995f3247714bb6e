use super::{comma, Flavor, Formatter, Ident, Params, Qualified, ToSql};

use crate::stmt::{self, Statement, Value, ID, IS_DELETED};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Upsert(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Condition {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push_str(self.as_str());
    }
}

impl ToSql for &stmt::Filter {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Filter::*;

        match self {
            IsNull(field) => fmt!(f, Qualified(field) " IS NULL"),
            Condition(field, condition) => fmt!(f, Qualified(field) " " condition),
            Eq(field, value) => fmt!(f, Qualified(field) " = " value),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        if self.count {
            fmt!(f, "COUNT(*)");
        } else if self.columns.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, comma(self.columns.iter().map(|column| Qualified(column))));
        }

        fmt!(f, " FROM " Qualified(&self.table) " WHERE 1 = 1");

        for filter in &self.filters {
            fmt!(f, " AND " filter);
        }

        if !self.include_deleted {
            fmt!(f, " AND " Ident(IS_DELETED) " = 0");
        }

        for condition in &self.trailing {
            fmt!(f, " " condition);
        }

        if let Some(page) = self.page {
            if self.order_by().is_none() {
                fmt!(f, " ORDER BY " Ident(ID) " DESC");
            }

            match f.serializer.flavor {
                Flavor::Mssql => {
                    fmt!(f, " OFFSET " page.offset " ROWS FETCH NEXT " page.count " ROWS ONLY")
                }
                Flavor::Sqlite => fmt!(f, " LIMIT " page.count " OFFSET " page.offset),
            }
        }
    }
}

/// The `INSERT INTO .. VALUES (..)` part of an insert, optionally with the
/// identity column in front. T-SQL's `OUTPUT` clause sits inside it.
struct InsertRow<'a> {
    insert: &'a stmt::Insert,
    id: Option<Value>,
}

impl ToSql for InsertRow<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let insert = self.insert;
        let columns = self
            .id
            .iter()
            .map(|_| ID)
            .chain(insert.columns.iter().map(String::as_str))
            .map(Ident);
        let values = self.id.iter().chain(insert.values.iter());

        fmt!(f, "INSERT INTO " Qualified(&insert.table) " (" comma(columns) ")");

        if let (Flavor::Mssql, Some(returning)) = (f.serializer.flavor, &insert.returning) {
            fmt!(f, " OUTPUT INSERTED." Ident(returning));
        }

        fmt!(f, " VALUES (" comma(values) ")");
    }
}

/// `RETURNING col` on dialects that put it at the end of the statement.
struct Returning<'a>(&'a Option<String>);

impl ToSql for Returning<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let (Flavor::Sqlite, Some(returning)) = (f.serializer.flavor, self.0) {
            fmt!(f, " RETURNING " Ident(returning));
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, InsertRow { insert: self, id: None } Returning(&self.returning));
    }
}

impl ToSql for &stmt::Assignment {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let value = &self.value;
        fmt!(f, Ident(&self.column) " = " value);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let id = &Value::I64(self.id);

        fmt!(f, "UPDATE " Qualified(&self.table) " SET " comma(&self.assignments));

        if let (Flavor::Mssql, Some(returning)) = (f.serializer.flavor, &self.returning) {
            fmt!(f, " OUTPUT INSERTED." Ident(returning));
        }

        fmt!(f, " WHERE " Ident(ID) " = " id Returning(&self.returning));
    }
}

/// `col = excluded.col`
struct Excluded<'a>(&'a str);

impl ToSql for Excluded<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0) " = excluded." Ident(self.0));
    }
}

impl ToSql for &stmt::Upsert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let id = Value::I64(self.id);
        let table = Qualified(&self.insert.table);
        let exists = &id;

        match f.serializer.flavor {
            Flavor::Mssql => {
                let insert = InsertRow {
                    insert: &self.insert,
                    id: None,
                };

                if self.update.is_empty() {
                    fmt!(f, "IF NOT EXISTS (SELECT 1 FROM " table " WHERE " Ident(ID) " = " exists ") BEGIN " insert " END");
                } else {
                    let update = stmt::Update {
                        table: self.insert.table.clone(),
                        assignments: self.update.clone(),
                        id: self.id,
                        returning: self.insert.returning.clone(),
                    };

                    let update = &update;
                    fmt!(f, "IF EXISTS (SELECT 1 FROM " table " WHERE " Ident(ID) " = " exists ") " update " ELSE " insert);
                }
            }
            Flavor::Sqlite => {
                let insert = InsertRow {
                    insert: &self.insert,
                    id: Some(Value::I64(self.id)),
                };

                fmt!(f, insert " ON CONFLICT (" Ident(ID) ") DO UPDATE SET ");

                if self.update.is_empty() {
                    fmt!(f, Excluded(ID));
                } else {
                    fmt!(f, comma(self.update.iter().map(|a| Excluded(&a.column))));
                }

                fmt!(f, Returning(&self.insert.returning));
            }
        }
    }
}
