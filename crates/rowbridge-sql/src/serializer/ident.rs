use super::{dotted, Flavor, Formatter, Params, ToSql};

pub(super) struct Ident<S>(pub(super) S);

/// A possibly qualified table or column name (`dbo.Student`,
/// `Student.Age`); each dotted part is quoted on its own.
pub(super) struct Qualified<'a>(pub(super) &'a str);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = self.0.as_ref();

        match f.serializer.flavor {
            Flavor::Mssql => {
                f.dst.push('[');
                f.dst.push_str(&name.replace(']', "]]"));
                f.dst.push(']');
            }
            Flavor::Sqlite => {
                f.dst.push('"');
                f.dst.push_str(&name.replace('"', "\"\""));
                f.dst.push('"');
            }
        }
    }
}

impl ToSql for Qualified<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let parts = dotted(self.0.split('.').map(Ident));
        fmt!(f, parts);
    }
}
