use super::Error;

/// Error when a raw predicate fragment is rejected before it reaches statement text.
#[derive(Debug)]
pub(super) struct InvalidConditionError {
    reason: Box<str>,
}

impl std::error::Error for InvalidConditionError {}

impl core::fmt::Display for InvalidConditionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid condition: {}", self.reason)
    }
}

impl Error {
    pub fn invalid_condition(reason: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidCondition(InvalidConditionError {
            reason: reason.into().into_boxed_str(),
        }))
    }

    pub fn is_invalid_condition(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidCondition(_)))
    }
}
