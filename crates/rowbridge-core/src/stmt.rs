mod arg;
pub use arg::Arg;

mod condition;
pub use condition::Condition;

mod row;
pub use row::Row;

mod ty;
pub use ty::{ScalarTy, Type};

mod value;
pub use value::Value;

mod value_convert;
pub use value_convert::{FromValue, IntoValue};

mod value_datetime;
