//! The authenticated envelope: sentinel byte plus chunked AES-256-GCM.
//!
//! On-disk layout:
//!
//! ```text
//! [u8 mode]                  // PLAINTEXT = 43, ENCRYPTED = 57
//! if ENCRYPTED:
//!     [12-byte nonce]
//!     repeat: [ciphertext chunk || 16-byte tag]   // 1024 plaintext bytes
//!                                                 // per chunk, final
//!                                                 // chunk shorter
//! else:
//!     [container bytes verbatim]
//! ```
//!
//! Each chunk is sealed with the same key and the same per-archive nonce;
//! the chunk's position in the stream disambiguates it. The nonce is
//! drawn fresh from the OS RNG for every archive and never derived from
//! the password — reusing a `(key, nonce)` pair across archives would
//! void the AES-GCM guarantees.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use squish_core::error::{Result, SquishError};
use std::io::{self, Read, Write};

use crate::key::derive_key;

/// Sentinel marking an unencrypted archive.
pub const PLAINTEXT: u8 = 43;

/// Sentinel marking an AES-256-GCM encrypted archive.
pub const ENCRYPTED: u8 = 57;

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag size appended to every chunk.
pub const TAG_LEN: usize = 16;

/// Plaintext bytes sealed per chunk.
pub const CHUNK_LEN: usize = 1024;

/// Wrap a container stream into the on-disk envelope.
///
/// An empty password writes the plaintext sentinel and copies the
/// container verbatim. Otherwise the container is sealed in
/// [`CHUNK_LEN`]-byte chunks under a fresh random nonce. Returns the
/// number of bytes written, sentinel included.
pub fn seal<R: Read, W: Write>(input: &mut R, output: &mut W, password: &str) -> Result<u64> {
    if password.is_empty() {
        output.write_all(&[PLAINTEXT])?;
        let copied = io::copy(input, output)?;
        return Ok(1 + copied);
    }

    let key = derive_key(password)?;
    let cipher = Aes256Gcm::new((&key).into());

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    output.write_all(&[ENCRYPTED])?;
    output.write_all(&nonce)?;
    let mut written = 1 + NONCE_LEN as u64;

    let mut chunk = [0u8; CHUNK_LEN];
    loop {
        let n = read_fill(input, &mut chunk)?;
        if n == 0 {
            break;
        }
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), &chunk[..n])
            .map_err(|_| SquishError::Io(io::Error::other("AES-GCM seal failed")))?;
        output.write_all(&sealed)?;
        written += sealed.len() as u64;
    }

    output.flush()?;
    Ok(written)
}

/// Unwrap the on-disk envelope back into the container stream.
///
/// The sentinel decides the path: plaintext archives copy through with
/// any password state, encrypted archives require a non-empty password.
/// A tag mismatch on any chunk aborts with
/// [`SquishError::AuthenticationFailed`] before emitting that chunk.
/// Returns the number of container bytes produced.
pub fn open<R: Read, W: Write>(input: &mut R, output: &mut W, password: &str) -> Result<u64> {
    let mut sentinel = [0u8; 1];
    input
        .read_exact(&mut sentinel)
        .map_err(|e| map_eof(e, 1))?;

    match sentinel[0] {
        PLAINTEXT => Ok(io::copy(input, output)?),
        ENCRYPTED => {
            if password.is_empty() {
                return Err(SquishError::PasswordRequired);
            }
            let key = derive_key(password)?;
            let cipher = Aes256Gcm::new((&key).into());

            let mut nonce = [0u8; NONCE_LEN];
            input
                .read_exact(&mut nonce)
                .map_err(|e| map_eof(e, NONCE_LEN as u64))?;

            let mut produced = 0u64;
            let mut chunk = [0u8; CHUNK_LEN + TAG_LEN];
            loop {
                let n = read_fill(input, &mut chunk)?;
                if n == 0 {
                    break;
                }
                let plain = cipher
                    .decrypt(Nonce::from_slice(&nonce), &chunk[..n])
                    .map_err(|_| SquishError::AuthenticationFailed)?;
                output.write_all(&plain)?;
                produced += plain.len() as u64;
            }

            output.flush()?;
            Ok(produced)
        }
        other => Err(SquishError::corrupt_envelope(other)),
    }
}

/// Read until `buf` is full or the stream ends; returns the bytes read.
fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn map_eof(e: io::Error, needed: u64) -> SquishError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        SquishError::truncated(needed)
    } else {
        e.into()
    }
}
