mod adhoc;
mod connection_pool;
mod crypto;
mod driver;
mod invalid_condition;
mod invalid_config;
mod serialization;
mod statement_timeout;
mod type_conversion;
mod unknown_entity;

use adhoc::AdhocError;
use connection_pool::ConnectionPoolError;
use crypto::CryptoError;
use driver::DriverError;
use invalid_condition::InvalidConditionError;
use invalid_config::InvalidConfigError;
use serialization::SerializationError;
use statement_timeout::StatementTimeoutError;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use unknown_entity::UnknownEntityError;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in rowbridge.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns `true` if this error, or any error it wraps, matches `pred`.
    fn any_kind(&self, pred: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| pred(err.kind()))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::ConnectionPool(err) => Some(err),
            ErrorKind::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Driver(DriverError),
    ConnectionPool(ConnectionPoolError),
    TypeConversion(TypeConversionError),
    Crypto(CryptoError),
    InvalidCondition(InvalidConditionError),
    InvalidConfig(InvalidConfigError),
    UnknownEntity(UnknownEntityError),
    Serialization(SerializationError),
    StatementTimeout(StatementTimeoutError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            ConnectionPool(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            Crypto(err) => core::fmt::Display::fmt(err, f),
            InvalidCondition(err) => core::fmt::Display::fmt(err, f),
            InvalidConfig(err) => core::fmt::Display::fmt(err, f),
            UnknownEntity(err) => core::fmt::Display::fmt(err, f),
            Serialization(err) => core::fmt::Display::fmt(err, f),
            StatementTimeout(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown rowbridge error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::serialization(err)
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for &str {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

impl IntoError for String {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("root cause");
        let chained = root.context(err!("middle context")).context("top context");
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn type_conversion_error() {
        let err = Error::type_conversion(crate::stmt::Value::String("abc".into()), "i64");
        assert_eq!(err.to_string(), "cannot convert String to i64");
        assert!(err.is_type_conversion());
    }

    #[test]
    fn predicates_see_through_context() {
        let err = Error::crypto("bad padding").context("Generic/Query");
        assert!(err.is_crypto());
        assert!(!err.is_driver());
        assert_eq!(err.to_string(), "Generic/Query: crypto failure: bad padding");
    }

    #[test]
    fn unknown_entity() {
        let err = Error::unknown_entity("Student");
        assert_eq!(err.to_string(), "unknown entity `Student`");
        assert!(err.is_unknown_entity());
    }

    #[test]
    fn invalid_condition() {
        let err = Error::invalid_condition("contains `;`");
        assert_eq!(err.to_string(), "invalid condition: contains `;`");
    }

    #[test]
    fn statement_timeout() {
        let err = Error::statement_timeout(std::time::Duration::from_millis(1500));
        assert_eq!(err.to_string(), "statement exceeded the 1500ms execution ceiling");
        assert!(err.is_statement_timeout());
    }

    #[test]
    fn serde_bridge() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_serialization());
    }
}
