use super::Error;
use std::time::Duration;

/// Error when a statement runs past the configured execution ceiling.
///
/// Treated as a failure of the operation, never as a retry trigger.
#[derive(Debug)]
pub(super) struct StatementTimeoutError {
    ceiling: Duration,
}

impl std::error::Error for StatementTimeoutError {}

impl core::fmt::Display for StatementTimeoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "statement exceeded the {}ms execution ceiling",
            self.ceiling.as_millis()
        )
    }
}

impl Error {
    pub fn statement_timeout(ceiling: Duration) -> Error {
        Error::from(super::ErrorKind::StatementTimeout(StatementTimeoutError {
            ceiling,
        }))
    }

    pub fn is_statement_timeout(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::StatementTimeout(_)))
    }
}
