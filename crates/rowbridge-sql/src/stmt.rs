mod filter;
pub use filter::Filter;

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Page, Select};

mod update;
pub use update::{Assignment, Update};

mod upsert;
pub use upsert::Upsert;

pub use rowbridge_core::stmt::*;

/// Name of the identity column every table carries.
pub const ID: &str = "Id";

/// Name of the soft-delete column every table carries.
pub const IS_DELETED: &str = "IsDeleted";

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(Insert),
    Select(Select),
    Update(Update),
    Upsert(Upsert),
}

impl Statement {
    pub fn is_insert(&self) -> bool {
        matches!(self, Statement::Insert(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Statement::Update(_))
    }

    pub fn is_upsert(&self) -> bool {
        matches!(self, Statement::Upsert(_))
    }

    pub fn table(&self) -> &str {
        match self {
            Statement::Insert(stmt) => &stmt.table,
            Statement::Select(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
            Statement::Upsert(stmt) => &stmt.insert.table,
        }
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Upsert> for Statement {
    fn from(value: Upsert) -> Self {
        Statement::Upsert(value)
    }
}
