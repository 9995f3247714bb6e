use super::{Formatter, Params};

/// Appends every fragment to the formatter, left to right.
///
/// Fragments are whitespace separated. Bind references to a local first;
/// `"x" &y` would parse as a bitwise and.
macro_rules! fmt {
    ($f:expr, $( $fragment:expr )*) => {{
        $( $fragment.to_sql($f); )*
    }};
}

/// A piece of statement text.
pub(super) trait ToSql {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>);
}

impl ToSql for &str {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push_str(self);
    }
}

impl ToSql for &String {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        self.as_str().to_sql(f);
    }
}

impl ToSql for u64 {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push_str(&self.to_string());
    }
}

/// Items rendered one after another with `sep` between them.
pub(super) struct Joined<L> {
    sep: &'static str,
    items: L,
}

/// `a, b, c`
pub(super) fn comma<L>(items: L) -> Joined<L> {
    Joined { sep: ", ", items }
}

/// `a.b`, for qualified names
pub(super) fn dotted<L>(items: L) -> Joined<L> {
    Joined { sep: ".", items }
}

impl<L> ToSql for Joined<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        for (index, item) in self.items.into_iter().enumerate() {
            if index > 0 {
                f.dst.push_str(self.sep);
            }
            item.to_sql(f);
        }
    }
}
