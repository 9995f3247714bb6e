/// Declared type of an entity field, used to coerce store values on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Scalar(ScalarTy),

    /// An enumeration stored as its integer discriminant
    Enum,

    /// A list stored as comma-separated text
    List(ScalarTy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarTy {
    Bool,
    I64,
    F64,
    String,
    DateTime,
}

impl Type {
    pub const BOOL: Type = Type::Scalar(ScalarTy::Bool);
    pub const I64: Type = Type::Scalar(ScalarTy::I64);
    pub const F64: Type = Type::Scalar(ScalarTy::F64);
    pub const STRING: Type = Type::Scalar(ScalarTy::String);
    pub const DATE_TIME: Type = Type::Scalar(ScalarTy::DateTime);

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }
}
