//! Symmetric channel for statement text.
//!
//! AES-128 in CBC mode with PKCS#7 padding under a key and IV both sides
//! share ahead of time; ciphertext travels as standard base64. There is no
//! per-message nonce and no authentication tag, so the channel hides
//! statement text but does not detect tampering beyond a padding or UTF-8
//! failure.

use crate::Result;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rowbridge_core::Error;
use std::fmt;
use tracing::warn;

type Encryptor = cbc::Encryptor<aes::Aes128>;
type Decryptor = cbc::Decryptor<aes::Aes128>;

#[derive(Clone)]
pub struct Cipher {
    key: [u8; Cipher::BLOCK_LEN],
    iv: [u8; Cipher::BLOCK_LEN],
}

impl Cipher {
    /// Key and IV length in bytes
    pub const BLOCK_LEN: usize = 16;

    /// Key and IV shipped with both ends when nothing else is configured.
    pub const DEFAULT_SECRET: &'static str = "8080808080808080";

    pub fn new(key: &str, iv: &str) -> Result<Cipher> {
        Ok(Cipher {
            key: block("key", key)?,
            iv: block("iv", iv)?,
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> String {
        let ciphertext = Encryptor::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        BASE64.encode(ciphertext)
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        self.try_decrypt(ciphertext).inspect_err(|err| {
            warn!(error = %err, len = ciphertext.len(), "rejecting undecryptable payload");
        })
    }

    fn try_decrypt(&self, ciphertext: &str) -> Result<String> {
        let bytes = BASE64
            .decode(ciphertext.trim())
            .map_err(|err| Error::crypto(format!("ciphertext is not base64: {err}")))?;

        let plaintext = Decryptor::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
            .map_err(|_| Error::crypto("bad padding"))?;

        String::from_utf8(plaintext).map_err(|_| Error::crypto("plaintext is not UTF-8"))
    }
}

impl Default for Cipher {
    fn default() -> Self {
        let secret = Cipher::DEFAULT_SECRET.as_bytes();
        let mut block = [0; Cipher::BLOCK_LEN];
        block.copy_from_slice(secret);
        Cipher {
            key: block,
            iv: block,
        }
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}

fn block(name: &str, text: &str) -> Result<[u8; Cipher::BLOCK_LEN]> {
    text.as_bytes().try_into().map_err(|_| {
        Error::invalid_config(format!(
            "`{name}` must be {} bytes, got {}",
            Cipher::BLOCK_LEN,
            text.len()
        ))
    })
}
