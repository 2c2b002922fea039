//! Byte stream to bit stream encoding against a [`CodeTable`].

use crate::table::CodeTable;
use squish_core::bitstream::BitWriter;
use squish_core::error::{Result, SquishError};
use std::io::Write;

/// Append the codes for every byte of `input` to an open bit stream.
///
/// Fails with [`SquishError::UnknownSymbol`] for a byte the table does
/// not cover; a codec used correctly never hits this, because the
/// frequency pass saw every byte first.
pub fn encode_bits<W: Write>(
    input: &[u8],
    table: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<()> {
    for &byte in input {
        let code = table
            .get(byte)
            .ok_or_else(|| SquishError::unknown_symbol(byte))?;

        let packed = code.packed_bytes();
        let len = code.bit_len();
        let full = (len / 8) as usize;
        let rem = len % 8;

        for &b in &packed[..full] {
            writer.write_bits(b as u64, 8)?;
        }
        if rem > 0 {
            writer.write_bits((packed[full] >> (8 - rem)) as u64, rem)?;
        }
    }
    Ok(())
}

/// Encode `input` as one complete field (bits plus trailer) into `sink`.
///
/// Returns the field length in bytes, trailer included.
pub fn encode_field<W: Write>(input: &[u8], table: &CodeTable, sink: W) -> Result<u64> {
    let mut writer = BitWriter::new(sink);
    encode_bits(input, table, &mut writer)?;
    writer.finish()
}

/// Encode `input` as one complete field into a fresh buffer.
pub fn encode_field_to_vec(input: &[u8], table: &CodeTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_field(input, table, &mut buf)?;
    Ok(buf)
}
