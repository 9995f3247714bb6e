use super::{Arg, Condition, Filter};

/// Offset/limit window over an ordered projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub count: u64,
}

/// Projection over one table.
///
/// The `WHERE` clause starts from `1 = 1`, appends one `AND` term per
/// [`Filter`], then hides soft-deleted rows unless asked not to. Trailing
/// conditions follow verbatim; they carry ordering or any other free-form
/// tail. Pagination falls back to descending identity order when no
/// trailing condition orders the rows.
///
/// ```
/// use rowbridge_sql::{stmt::Select, Serializer};
///
/// let select = Select::from_fields("Student", &["Age", "Gender"], [20.into(), "male".into()]);
/// assert_eq!(
///     Serializer::mssql().inline(&select.into()),
///     "SELECT * FROM [Student] WHERE 1 = 1 AND [Age] = 20 AND [Gender] = N'male' AND [IsDeleted] = 0;",
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,

    /// Explicit column list; empty selects every column.
    pub columns: Vec<String>,

    pub filters: Vec<Filter>,

    pub trailing: Vec<Condition>,

    pub page: Option<Page>,

    pub include_deleted: bool,

    /// Render `COUNT(*)` instead of the column list.
    pub count: bool,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Select {
        Select {
            table: table.into(),
            columns: vec![],
            filters: vec![],
            trailing: vec![],
            page: None,
            include_deleted: false,
            count: false,
        }
    }

    /// Builds a projection from parallel field and value lists.
    ///
    /// Values past the last field only contribute when they are conditions;
    /// those become trailing clauses. A missing value reads as null.
    pub fn from_fields<I>(table: impl Into<String>, fields: &[&str], values: I) -> Select
    where
        I: IntoIterator<Item = Arg>,
    {
        let mut select = Select::new(table);
        let mut values = values.into_iter();

        for field in fields {
            let arg = values.next().unwrap_or_default();
            select.filters.push(Filter::new(*field, arg));
        }

        for arg in values {
            if let Arg::Condition(condition) = arg {
                select.trailing.push(condition);
            }
        }

        select
    }

    pub fn filter(mut self, field: impl Into<String>, arg: impl Into<Arg>) -> Select {
        self.filters.push(Filter::new(field, arg));
        self
    }

    /// Appends a free-form trailing clause, e.g. `ORDER BY [Name] ASC`.
    pub fn then(mut self, condition: Condition) -> Select {
        self.trailing.push(condition);
        self
    }

    /// Limits the projection to `count` rows starting at `offset`. Ignored
    /// unless `offset >= 0` and `count > 0`.
    pub fn paginate(mut self, offset: i64, count: i64) -> Select {
        self.page = match (u64::try_from(offset), u64::try_from(count)) {
            (Ok(offset), Ok(count)) if count > 0 => Some(Page { offset, count }),
            _ => None,
        };
        self
    }

    pub fn include_deleted(mut self, include: bool) -> Select {
        self.include_deleted = include;
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Select
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn count(mut self) -> Select {
        self.count = true;
        self
    }

    /// The trailing condition that orders the rows, if any.
    pub fn order_by(&self) -> Option<&Condition> {
        self.trailing.iter().find(|c| c.is_order_by())
    }
}
