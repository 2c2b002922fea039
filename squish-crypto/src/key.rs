//! Password to AES key derivation.

use squish_core::error::{Result, SquishError};

/// AES-256 key size in bytes; also the maximum password length.
pub const KEY_LEN: usize = 32;

/// Byte used to pad short passwords up to the key size.
const PAD_BYTE: u8 = b'0';

/// Derive the 32-byte AES key from a password.
///
/// The password is taken as raw bytes and right-padded with `'0'` to
/// exactly 32 bytes. Passwords longer than 32 bytes are rejected with
/// [`SquishError::PasswordTooLong`] — this check runs before any I/O.
pub fn derive_key(password: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = password.as_bytes();
    if bytes.len() > KEY_LEN {
        return Err(SquishError::password_too_long(bytes.len()));
    }
    let mut key = [PAD_BYTE; KEY_LEN];
    key[..bytes.len()].copy_from_slice(bytes);
    Ok(key)
}
