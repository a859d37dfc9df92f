//! Reversible encryption of short secrets, such as stored auth tokens.
//!
//! Uses AES-256-GCM. The key is the SHA-256 digest of a passphrase, every
//! call draws a fresh 96-bit nonce, and the output is
//! `base64(nonce || ciphertext || tag)` so it can be stored as text.
//!
//! Empty input maps to empty output in both directions.
//!
//! # Examples
//!
//! ```
//! use ebay_xml_client::crypt;
//!
//! let stored = crypt::encrypt("AgAAAA**user-token", "passphrase")?;
//! assert_ne!(stored, "AgAAAA**user-token");
//! assert_eq!(crypt::decrypt(&stored, "passphrase")?, "AgAAAA**user-token");
//! # Ok::<(), ebay_xml_client::EbayError>(())
//! ```

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{EbayError, Result};

const NONCE_LEN: usize = 12;

fn cipher(passphrase: &str) -> Result<Aes256Gcm> {
    let key: Zeroizing<[u8; 32]> = Zeroizing::new(Sha256::digest(passphrase.as_bytes()).into());
    Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| EbayError::CryptoError(format!("invalid key length: {e}")))
}

/// Encrypts `plaintext` under `passphrase`.
///
/// # Errors
///
/// Returns [`EbayError::CryptoError`] if encryption fails.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }

    let cipher = cipher(passphrase)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| EbayError::CryptoError(format!("encryption failed: {e}")))?;

    let mut packed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    packed.extend_from_slice(&nonce);
    packed.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(packed))
}

/// Decrypts text produced by [`encrypt`] with the same `passphrase`.
///
/// # Errors
///
/// Returns [`EbayError::CryptoError`] if the input is not valid base64, is
/// truncated, was tampered with, or was encrypted under another passphrase.
pub fn decrypt(encoded: &str, passphrase: &str) -> Result<String> {
    if encoded.is_empty() {
        return Ok(String::new());
    }

    let packed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| EbayError::CryptoError(format!("invalid base64: {e}")))?;
    if packed.len() <= NONCE_LEN {
        return Err(EbayError::CryptoError("ciphertext too short".to_owned()));
    }

    let (nonce, ciphertext) = packed.split_at(NONCE_LEN);
    let plaintext = Zeroizing::new(
        cipher(passphrase)?
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| EbayError::CryptoError("authentication failed".to_owned()))?,
    );

    String::from_utf8(plaintext.to_vec())
        .map_err(|e| EbayError::CryptoError(format!("plaintext is not UTF-8: {e}")))
}
