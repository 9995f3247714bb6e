mod base;
pub use base::{now_millis, Base};

mod field;
pub use field::{fields, Field};

mod tracker;
pub use tracker::Tracked;

use crate::stmt::{Row, Value};

/// A persisted record type.
///
/// Implementors declare their table, their entity-specific fields and the
/// child entities they own. The baseline columns (`Id`, `CreatedDate`,
/// `ModifiedDate`, `IsDeleted`) live in [`Base`] and are added to the field
/// registry automatically; see [`fields`].
///
/// ```
/// use rowbridge_core::{entity::{Base, Field}, field, stmt::Type, Entity};
///
/// #[derive(Debug, Default)]
/// struct Quiz {
///     base: Base,
///     title: String,
/// }
///
/// impl Entity for Quiz {
///     const NAME: &'static str = "Quiz";
///     const TABLE: &'static str = "Quiz";
///
///     fn base(&self) -> &Base {
///         &self.base
///     }
///
///     fn base_mut(&mut self) -> &mut Base {
///         &mut self.base
///     }
///
///     fn own_fields() -> &'static [Field<Self>] {
///         static FIELDS: &[Field<Quiz>] = &[field!(Quiz, "Title", title, Type::STRING)];
///         FIELDS
///     }
/// }
/// ```
pub trait Entity: Default + Send + Sync + 'static {
    /// Name the entity type is registered under.
    const NAME: &'static str;

    /// Table the entity maps to.
    const TABLE: &'static str;

    fn base(&self) -> &Base;

    fn base_mut(&mut self) -> &mut Base;

    /// Fields beyond the baseline columns.
    fn own_fields() -> &'static [Field<Self>];

    /// Owned child entities, including every item of owned collections.
    fn children(&self) -> Vec<&dyn Tracked> {
        vec![]
    }

    /// Mutable counterpart of [`children`](Entity::children). Must list the
    /// same entities in the same order.
    fn children_mut(&mut self) -> Vec<&mut dyn Tracked> {
        vec![]
    }

    fn id(&self) -> i64 {
        self.base().id()
    }

    /// Looks a registered field up by exact name.
    fn field(name: &str) -> Option<Field<Self>> {
        fields::<Self>().find(|f| f.name == name)
    }

    /// Reads a field by exact name.
    fn get(&self, name: &str) -> Option<Value> {
        Self::field(name).map(|f| f.get(self))
    }

    /// Every registered field keyed by name, in registry order.
    fn to_row(&self) -> Row {
        fields::<Self>()
            .map(|f| (f.name.to_string(), f.get(self)))
            .collect()
    }

    /// `Some(true)` when the field changed since the last reset, `None` when
    /// the entity is not tracked or has no such field.
    fn is_field_dirty(&self, name: &str) -> Option<bool> {
        let index = fields::<Self>().position(|f| f.name == name)?;
        self.base().overlay().map(|overlay| overlay.is_dirty(index))
    }
}
