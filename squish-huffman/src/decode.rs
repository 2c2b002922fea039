//! Bit stream to byte stream decoding.
//!
//! The decoder walks a descent tree rebuilt from the serialized code
//! table: left on `0`, right on `1`, emit at each leaf and restart at
//! the root. Rebuilding doubles as validation — any prefix violation in
//! the table surfaces before a single payload bit is read.

use crate::table::CodeTable;
use squish_core::bitstream::BitReader;
use squish_core::error::{Result, SquishError};
use std::io::{Cursor, Read, Write};

#[derive(Debug, Clone)]
struct DecodeNode {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

impl DecodeNode {
    fn new() -> Self {
        Self {
            children: [None, None],
            symbol: None,
        }
    }
}

/// The bit-directed descent tree for one code table.
///
/// Nodes live in an arena indexed by `usize`; index 0 is the root.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    /// Rebuild the tree from a code table, verifying that every code
    /// reaches a distinct leaf.
    pub(crate) fn from_table(table: &CodeTable) -> Result<Self> {
        if table.is_empty() {
            return Err(SquishError::corrupt_table("table has no codes"));
        }

        let mut nodes = vec![DecodeNode::new()];
        for (byte, code) in table.entries() {
            let mut index = 0usize;
            for bit in code.bits() {
                if nodes[index].symbol.is_some() {
                    return Err(SquishError::corrupt_table(format!(
                        "the code for byte {byte:#04x} passes through a leaf"
                    )));
                }
                index = match nodes[index].children[bit as usize] {
                    Some(child) => child,
                    None => {
                        let child = nodes.len();
                        nodes.push(DecodeNode::new());
                        nodes[index].children[bit as usize] = Some(child);
                        child
                    }
                };
            }
            if nodes[index].symbol.is_some() || nodes[index].children.iter().any(|c| c.is_some()) {
                return Err(SquishError::corrupt_table(format!(
                    "the code for byte {byte:#04x} is a prefix of another code"
                )));
            }
            nodes[index].symbol = Some(byte);
        }
        Ok(Self { nodes })
    }

    /// Decode one length-framed field into `out`.
    ///
    /// Consumes every bit the field holds; returns the number of bytes
    /// emitted. A field whose final bits strand the descent mid-tree is
    /// rejected with [`SquishError::ExtraBits`].
    pub fn decode_field<R: Read, W: Write>(
        &self,
        reader: &mut BitReader<R>,
        out: &mut W,
    ) -> Result<u64> {
        let mut emitted = 0u64;
        let mut index = 0usize;

        while let Some(bit) = reader.read_bit()? {
            index = self.nodes[index].children[bit as usize].ok_or_else(|| {
                SquishError::corrupt_table("bit sequence leads outside the code tree".to_string())
            })?;

            if let Some(symbol) = self.nodes[index].symbol {
                out.write_all(&[symbol])?;
                emitted += 1;
                index = 0;
            }
        }

        if index != 0 {
            return Err(SquishError::extra_bits(reader.bit_position()));
        }
        Ok(emitted)
    }

    /// Decode a complete in-memory field into a fresh buffer.
    pub fn decode_field_to_vec(&self, field: &[u8]) -> Result<Vec<u8>> {
        let mut reader = BitReader::new(Cursor::new(field), field.len() as u64)?;
        let mut out = Vec::new();
        self.decode_field(&mut reader, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_field_to_vec;
    use crate::freq::FrequencyTable;
    use crate::tree::build_codes;

    fn table_of(data: &[u8]) -> CodeTable {
        let mut freq = FrequencyTable::new();
        freq.add_bytes(data);
        build_codes(&freq).unwrap()
    }

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let table = table_of(data);
        let field = encode_field_to_vec(data, &table).unwrap();
        table.decoder().unwrap().decode_field_to_vec(&field).unwrap()
    }

    #[test]
    fn test_roundtrip_text() {
        let data = b"Hello, World!";
        assert_eq!(roundtrip(data), data);
    }

    #[test]
    fn test_roundtrip_binary() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn test_roundtrip_single_symbol() {
        let data = [b'X'; 100];
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn test_roundtrip_empty_field() {
        let table = table_of(b"abc");
        let field = encode_field_to_vec(&[], &table).unwrap();
        let out = table.decoder().unwrap().decode_field_to_vec(&field).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_extra_bits_rejected() {
        // A field ending mid-code: with codes of length >= 2, a single
        // dangling bit cannot complete a descent.
        let table = table_of(b"aabbccdd");
        assert!(table.get(b'a').unwrap().bit_len() >= 2);

        let mut field = Vec::new();
        let mut writer = squish_core::BitWriter::new(&mut field);
        // One full code, then one stray bit.
        for bit in table.get(b'a').unwrap().bits() {
            writer.write_bit(bit).unwrap();
        }
        writer.write_bit(false).unwrap();
        let len = writer.finish().unwrap();

        let tree = table.decoder().unwrap();
        let mut reader = BitReader::new(Cursor::new(&field), len).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            tree.decode_field(&mut reader, &mut out),
            Err(SquishError::ExtraBits { .. })
        ));
    }

    #[test]
    fn test_prefix_violation_rejected() {
        // Hand-craft a table where one code is a strict prefix of
        // another: 'a' -> 0, 'b' -> 00.
        let mut wire = Vec::new();
        wire.extend_from_slice(&2u64.to_le_bytes());
        wire.extend_from_slice(&(b'a' as u32).to_le_bytes());
        wire.push(1);
        wire.push(0b0000_0000);
        wire.extend_from_slice(&(b'b' as u32).to_le_bytes());
        wire.push(2);
        wire.push(0b0000_0000);

        let table = CodeTable::read_from(&mut Cursor::new(&wire)).unwrap();
        assert!(matches!(
            table.decoder(),
            Err(SquishError::CorruptCodeTable { .. })
        ));
    }

    #[test]
    fn test_longer_code_inserted_before_shorter_prefix() {
        // Same violation, other insertion order: 'a' -> 00, then 'b' -> 0.
        let mut wire = Vec::new();
        wire.extend_from_slice(&2u64.to_le_bytes());
        wire.extend_from_slice(&(b'a' as u32).to_le_bytes());
        wire.push(2);
        wire.push(0b0000_0000);
        wire.extend_from_slice(&(b'b' as u32).to_le_bytes());
        wire.push(1);
        wire.push(0b0000_0000);

        let table = CodeTable::read_from(&mut Cursor::new(&wire)).unwrap();
        assert!(matches!(
            table.decoder(),
            Err(SquishError::CorruptCodeTable { .. })
        ));
    }

    #[test]
    fn test_walk_off_incomplete_tree() {
        // A lone two-bit code leaves branches missing; bits that take a
        // missing branch are a corrupt table, not a panic.
        let mut wire = Vec::new();
        wire.extend_from_slice(&1u64.to_le_bytes());
        wire.extend_from_slice(&(b'a' as u32).to_le_bytes());
        wire.push(2);
        wire.push(0b0000_0000); // code 00

        let table = CodeTable::read_from(&mut Cursor::new(&wire)).unwrap();
        let tree = table.decoder().unwrap();

        let mut field = Vec::new();
        let mut writer = squish_core::BitWriter::new(&mut field);
        writer.write_bits(0b01, 2).unwrap(); // descends 0 then missing 1
        let len = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(&field), len).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            tree.decode_field(&mut reader, &mut out),
            Err(SquishError::CorruptCodeTable { .. })
        ));
    }
}
