//! # Squish Core
//!
//! Core components for the squish archive library.
//!
//! This crate provides the fundamental building blocks shared by the
//! higher layers:
//!
//! - [`bitstream`]: bit-level I/O for variable-length Huffman codes,
//!   including the two-byte field trailer that records the significant
//!   bit count of the final byte
//! - [`wire`]: little-endian integer reads for the container structures
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! Squish is designed as a layered stack:
//!
//! ```text
//! L4: squish-cli      flag parsing, directory walking, output naming
//! L3: squish-archive  container framing (code table, file records)
//! L2: squish-huffman  prefix code construction, encode/decode
//!     squish-crypto   password-keyed authenticated envelope
//! L1: squish-core     BitReader/BitWriter, errors (this crate)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use squish_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! // Write a 13-bit field: 8 full bits, then a 5-bit tail.
//! let mut output = Vec::new();
//! let mut writer = BitWriter::new(&mut output);
//! writer.write_bits(0b10110101, 8).unwrap();
//! writer.write_bits(0b11001, 5).unwrap();
//! let field_len = writer.finish().unwrap();
//! assert_eq!(field_len, 3); // one payload byte + two trailer bytes
//!
//! // Read it back against the field's byte budget.
//! let mut reader = BitReader::new(Cursor::new(&output), field_len).unwrap();
//! let mut bits = Vec::new();
//! while let Some(bit) = reader.read_bit().unwrap() {
//!     bits.push(bit as u8);
//! }
//! assert_eq!(bits.len(), 13);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod error;
pub mod wire;

pub use bitstream::{BitReader, BitWriter};
pub use error::{Result, SquishError};
