use super::Error;

/// Error when statement text cannot be decrypted or encrypted.
///
/// Raised for malformed base64, wrong block sizes, bad padding and plaintext
/// that is not UTF-8. The channel carries no authentication tag, so tampered
/// ciphertext surfaces as one of these.
#[derive(Debug)]
pub(super) struct CryptoError {
    message: Box<str>,
}

impl std::error::Error for CryptoError {}

impl core::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "crypto failure: {}", self.message)
    }
}

impl Error {
    pub fn crypto(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Crypto(CryptoError {
            message: message.into().into_boxed_str(),
        }))
    }

    pub fn is_crypto(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Crypto(_)))
    }
}
