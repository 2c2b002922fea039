//! Error types for squish operations.
//!
//! A single error enum covers every failure mode across the stack, from
//! bit-level framing up to the encrypted envelope. No error is recovered
//! internally; every fault aborts the current compress or decompress call.

use std::io;
use thiserror::Error;

/// The main error type for squish operations.
#[derive(Debug, Error)]
pub enum SquishError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Compression was requested with no input files.
    #[error("no files or folders to compress")]
    EmptyInput,

    /// The frequency pass saw zero distinct bytes.
    #[error("cannot build a code table from empty input")]
    EmptyCodeTable,

    /// A byte was encoded that the frequency pass never covered.
    #[error("no code for byte {byte:#04x}")]
    UnknownSymbol {
        /// The byte with no code table entry.
        byte: u8,
    },

    /// The serialized code table violates the prefix property or
    /// truncates mid-entry.
    #[error("corrupt code table: {message}")]
    CorruptCodeTable {
        /// Description of the violation.
        message: String,
    },

    /// A framed length exceeds the remaining bytes of the stream.
    #[error("truncated stream: {needed} more bytes expected")]
    TruncatedStream {
        /// Number of bytes that were expected but not available.
        needed: u64,
    },

    /// The decoder consumed every bit of a field but stopped mid-descent.
    #[error("dangling bits at end of field (bit position {bit_position})")]
    ExtraBits {
        /// Bit offset within the field where the descent was left hanging.
        bit_position: u64,
    },

    /// A field trailer claims more than 7 significant bits in its
    /// final byte.
    #[error("invalid field trailer: {valid_bits} significant bits in final byte")]
    InvalidTrailer {
        /// The out-of-range bit count.
        valid_bits: u8,
    },

    /// Bytes remain after the last record's payload.
    #[error("unexpected data after the last record")]
    UnexpectedTrailingData,

    /// The archive declares zero files.
    #[error("archive contains no files")]
    EmptyArchive,

    /// The envelope sentinel is neither the plaintext nor the
    /// encrypted marker.
    #[error("unrecognized envelope sentinel {sentinel:#04x}")]
    CorruptEnvelope {
        /// The sentinel byte that was read.
        sentinel: u8,
    },

    /// An AES-GCM tag failed to verify.
    #[error("authentication failed: wrong password or corrupted archive")]
    AuthenticationFailed,

    /// The archive is encrypted and no password was supplied.
    #[error("archive is encrypted: a password is required")]
    PasswordRequired,

    /// The password exceeds the 32-byte key size.
    #[error("password is {length} bytes, maximum is 32")]
    PasswordTooLong {
        /// Length of the rejected password in bytes.
        length: usize,
    },

    /// A compressed file name does not fit the u16 length field.
    #[error("compressed file name is {length} bytes, exceeding the 16-bit length field")]
    NameTooLong {
        /// Length of the oversized name field in bytes.
        length: usize,
    },
}

/// Result type alias for squish operations.
pub type Result<T> = std::result::Result<T, SquishError>;

impl SquishError {
    /// Create an unknown-symbol error.
    pub fn unknown_symbol(byte: u8) -> Self {
        Self::UnknownSymbol { byte }
    }

    /// Create a corrupt code table error.
    pub fn corrupt_table(message: impl Into<String>) -> Self {
        Self::CorruptCodeTable {
            message: message.into(),
        }
    }

    /// Create a truncated stream error.
    pub fn truncated(needed: u64) -> Self {
        Self::TruncatedStream { needed }
    }

    /// Create an extra-bits error.
    pub fn extra_bits(bit_position: u64) -> Self {
        Self::ExtraBits { bit_position }
    }

    /// Create an invalid-trailer error.
    pub fn invalid_trailer(valid_bits: u8) -> Self {
        Self::InvalidTrailer { valid_bits }
    }

    /// Create a corrupt envelope error.
    pub fn corrupt_envelope(sentinel: u8) -> Self {
        Self::CorruptEnvelope { sentinel }
    }

    /// Create a password-too-long error.
    pub fn password_too_long(length: usize) -> Self {
        Self::PasswordTooLong { length }
    }

    /// Create a name-too-long error.
    pub fn name_too_long(length: usize) -> Self {
        Self::NameTooLong { length }
    }
}
