use super::Entity;
use crate::{
    stmt::{FromValue, Type, Value},
    Result,
};

/// A named, typed accessor pair for one column of an entity.
pub struct Field<E> {
    pub name: &'static str,
    pub ty: Type,
    get: fn(&E) -> Value,
    set: fn(&mut E, Value) -> Result<()>,
}

impl<E> Field<E> {
    pub const fn new(
        name: &'static str,
        ty: Type,
        get: fn(&E) -> Value,
        set: fn(&mut E, Value) -> Result<()>,
    ) -> Field<E> {
        Field { name, ty, get, set }
    }

    pub fn get(&self, entity: &E) -> Value {
        (self.get)(entity)
    }

    /// Coerces `value` to the field's type, then stores it.
    pub fn set(&self, entity: &mut E, value: Value) -> Result<()> {
        let value = value.coerce(self.ty)?;
        (self.set)(entity, value)
    }
}

impl<E> Clone for Field<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Field<E> {}

impl<E> core::fmt::Debug for Field<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish()
    }
}

/// Every field of `E`: the baseline columns first, then [`Entity::own_fields`].
pub fn fields<E: Entity>() -> impl Iterator<Item = Field<E>> + Clone {
    base_fields::<E>()
        .into_iter()
        .chain(E::own_fields().iter().copied())
}

fn base_fields<E: Entity>() -> [Field<E>; 4] {
    [
        Field::new("Id", Type::I64, get_id::<E>, set_id::<E>),
        Field::new("CreatedDate", Type::I64, get_created::<E>, set_created::<E>),
        Field::new("ModifiedDate", Type::I64, get_modified::<E>, set_modified::<E>),
        Field::new("IsDeleted", Type::BOOL, get_deleted::<E>, set_deleted::<E>),
    ]
}

fn get_id<E: Entity>(entity: &E) -> Value {
    Value::I64(entity.base().id())
}

fn set_id<E: Entity>(entity: &mut E, value: Value) -> Result<()> {
    entity.base_mut().set_id(i64::from_value(value)?)
}

fn get_created<E: Entity>(entity: &E) -> Value {
    Value::I64(entity.base().created_date)
}

fn set_created<E: Entity>(entity: &mut E, value: Value) -> Result<()> {
    entity.base_mut().created_date = i64::from_value(value)?;
    Ok(())
}

fn get_modified<E: Entity>(entity: &E) -> Value {
    Value::I64(entity.base().modified_date)
}

fn set_modified<E: Entity>(entity: &mut E, value: Value) -> Result<()> {
    entity.base_mut().modified_date = i64::from_value(value)?;
    Ok(())
}

fn get_deleted<E: Entity>(entity: &E) -> Value {
    Value::Bool(entity.base().is_deleted)
}

fn set_deleted<E: Entity>(entity: &mut E, value: Value) -> Result<()> {
    entity.base_mut().is_deleted = bool::from_value(value)?;
    Ok(())
}
