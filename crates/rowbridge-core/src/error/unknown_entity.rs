use super::Error;

/// Error when an entity type name is not present in the registry.
#[derive(Debug)]
pub(super) struct UnknownEntityError {
    name: Box<str>,
}

impl std::error::Error for UnknownEntityError {}

impl core::fmt::Display for UnknownEntityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown entity `{}`", self.name)
    }
}

impl Error {
    pub fn unknown_entity(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownEntity(UnknownEntityError {
            name: name.into().into_boxed_str(),
        }))
    }

    pub fn is_unknown_entity(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnknownEntity(_)))
    }
}
