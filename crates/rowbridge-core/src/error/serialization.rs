use super::Error;

/// Error encoding or decoding JSON payloads (rows, wire bodies, bulk records).
#[derive(Debug)]
pub(super) struct SerializationError {
    inner: serde_json::Error,
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl core::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "serialization failure: {}", self.inner)
    }
}

impl Error {
    pub fn serialization(inner: serde_json::Error) -> Error {
        Error::from(super::ErrorKind::Serialization(SerializationError { inner }))
    }

    pub fn is_serialization(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Serialization(_)))
    }
}
