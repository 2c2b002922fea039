//! The prefix-code table and its container-head serialization.
//!
//! Wire layout (all integers little-endian):
//!
//! ```text
//! [u64  codeCount]
//! repeat codeCount times, ascending byte value:
//!     [u32 byteValue]            // only the low 8 bits are meaningful
//!     [u8  bitLength]            // 1..=255
//!     [ceil(bitLength/8) bytes]  // MSB-first, zero-padded on the right
//! ```

use crate::decode::DecodeTree;
use squish_core::error::{Result, SquishError};
use squish_core::wire::{read_u32_le, read_u64_le, read_u8};
use std::io::{Read, Write};

/// One prefix code: a bit string of length 1..=255, packed MSB-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    bits: Vec<u8>,
    len: u8,
}

impl Code {
    /// Pack a bit path into a code. The path length must be 1..=255.
    pub(crate) fn from_bits(path: &[bool]) -> Self {
        debug_assert!(!path.is_empty() && path.len() <= 255);
        let mut bits = vec![0u8; path.len().div_ceil(8)];
        for (i, &bit) in path.iter().enumerate() {
            if bit {
                bits[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        Self {
            bits,
            len: path.len() as u8,
        }
    }

    /// Reassemble a code from its wire form.
    fn from_packed(bits: Vec<u8>, len: u8) -> Self {
        Self { bits, len }
    }

    /// Length of the code in bits.
    pub fn bit_len(&self) -> u8 {
        self.len
    }

    /// The packed bytes exactly as they appear on the wire.
    pub fn packed_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Iterate the code's bits, most significant first.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bits[(i / 8) as usize] & (1 << (7 - (i % 8))) != 0)
    }
}

/// The prefix code for a whole archive: one optional [`Code`] per byte
/// value. Immutable once built.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Create a table with no entries.
    pub(crate) fn empty() -> Self {
        Self {
            codes: vec![None; 256],
        }
    }

    /// Assign a code to a byte value.
    pub(crate) fn insert(&mut self, byte: u8, code: Code) {
        self.codes[byte as usize] = Some(code);
    }

    /// Look up the code for a byte value.
    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes[byte as usize].as_ref()
    }

    /// Number of byte values that have a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(|c| c.is_none())
    }

    /// Coded byte values with their codes, ascending by byte value.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(b, c)| c.as_ref().map(|code| (b as u8, code)))
    }

    /// Serialize the table to the container head.
    ///
    /// Entries are written in ascending byte order so that identical
    /// inputs produce byte-identical tables. Returns the number of bytes
    /// written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64> {
        let mut written = 0u64;
        writer.write_all(&(self.len() as u64).to_le_bytes())?;
        written += 8;

        for (byte, code) in self.entries() {
            writer.write_all(&(byte as u32).to_le_bytes())?;
            writer.write_all(&[code.bit_len()])?;
            writer.write_all(code.packed_bytes())?;
            written += 4 + 1 + code.packed_bytes().len() as u64;
        }
        Ok(written)
    }

    /// Parse a table from the container head.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let count = read_u64_le(reader).map_err(read_error)?;
        if count == 0 {
            return Err(SquishError::corrupt_table("table declares zero codes"));
        }
        if count > 256 {
            return Err(SquishError::corrupt_table(format!(
                "table declares {count} codes, more than 256 byte values"
            )));
        }

        let mut table = Self::empty();
        for _ in 0..count {
            let value = read_u32_le(reader).map_err(read_error)?;
            if value > 0xFF {
                return Err(SquishError::corrupt_table(format!(
                    "byte value {value:#x} out of range"
                )));
            }
            let byte = value as u8;
            if table.get(byte).is_some() {
                return Err(SquishError::corrupt_table(format!(
                    "duplicate entry for byte {byte:#04x}"
                )));
            }

            let len = read_u8(reader).map_err(read_error)?;
            if len == 0 {
                return Err(SquishError::corrupt_table(format!(
                    "zero-length code for byte {byte:#04x}"
                )));
            }

            let mut bits = vec![0u8; (len as usize).div_ceil(8)];
            reader.read_exact(&mut bits).map_err(read_error)?;
            table.insert(byte, Code::from_packed(bits, len));
        }
        Ok(table)
    }

    /// Rebuild the descent tree for decoding, validating the prefix
    /// property in the process.
    pub fn decoder(&self) -> Result<DecodeTree> {
        DecodeTree::from_table(self)
    }
}

/// A table that cuts off mid-entry is a corrupt table, not a plain
/// I/O failure.
fn read_error(e: std::io::Error) -> SquishError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        SquishError::corrupt_table("table truncated mid-entry")
    } else {
        e.into()
    }
}
