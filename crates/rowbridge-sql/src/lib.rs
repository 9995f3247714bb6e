pub mod push;
pub use push::Push;

pub mod serializer;
pub use serializer::{Flavor, Inline, Params, Placeholder, Serializer};

pub mod stmt;
pub use stmt::Statement;
