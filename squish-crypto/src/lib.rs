//! # Squish Crypto
//!
//! Password-keyed authenticated envelope for squish archives.
//!
//! The envelope is the outermost layer of an archive file: a one-byte
//! mode sentinel, and — when a password is set — a random nonce followed
//! by the container sealed in fixed-size AES-256-GCM chunks. Decrypting
//! without a password succeeds exactly when the file was written without
//! one; the sentinel makes the choice self-describing.
//!
//! ```rust
//! use std::io::Cursor;
//!
//! let container = b"container bytes".to_vec();
//! let mut sealed = Vec::new();
//! squish_crypto::seal(&mut Cursor::new(&container), &mut sealed, "hunter2").unwrap();
//!
//! let mut opened = Vec::new();
//! squish_crypto::open(&mut Cursor::new(&sealed), &mut opened, "hunter2").unwrap();
//! assert_eq!(opened, container);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod key;

pub use envelope::{open, seal, ENCRYPTED, PLAINTEXT};
pub use key::derive_key;
