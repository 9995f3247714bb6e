/// Builds an [`entity::Field`](crate::entity::Field) for a struct member.
///
/// The getter clones the member into a [`Value`](crate::stmt::Value); the
/// setter converts back with [`FromValue`](crate::stmt::FromValue). The
/// expansion is usable in `static` registries.
///
/// ```ignore
/// field!(Question, "QuizId", quiz_id, Type::I64)
/// ```
#[macro_export]
macro_rules! field {
    ($entity:ty, $name:literal, $member:ident, $ty:expr) => {
        $crate::entity::Field::<$entity>::new(
            $name,
            $ty,
            |entity: &$entity| {
                $crate::stmt::IntoValue::into_value(::core::clone::Clone::clone(&entity.$member))
            },
            |entity: &mut $entity, value: $crate::stmt::Value| {
                entity.$member = $crate::stmt::FromValue::from_value(value)?;
                ::core::result::Result::Ok(())
            },
        )
    };
}
