//! Little-endian integer reads for the container structures.
//!
//! All structural integers of the container (`codeCount`, `fileCount`,
//! the per-code lengths, the per-record length prefixes) are
//! little-endian. Writers use `to_le_bytes` inline; the read side is
//! shared here because both the code table and the record framing parse
//! the same primitives.
//!
//! Errors are plain `io::Error` so each caller can map an unexpected EOF
//! to the failure kind appropriate for the structure being parsed.

use std::io::{self, Read};

/// Read a single byte.
pub fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian `u16`.
pub fn read_u16_le<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Read a little-endian `u32`.
pub fn read_u32_le<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian `u64`.
pub fn read_u64_le<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_advance_in_order() {
        let mut data = Vec::new();
        data.push(0x7F);
        data.extend_from_slice(&0x1234u16.to_le_bytes());
        data.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
        data.extend_from_slice(&0x0102030405060708u64.to_le_bytes());

        let mut cursor = Cursor::new(&data);
        assert_eq!(read_u8(&mut cursor).unwrap(), 0x7F);
        assert_eq!(read_u16_le(&mut cursor).unwrap(), 0x1234);
        assert_eq!(read_u32_le(&mut cursor).unwrap(), 0xDEADBEEF);
        assert_eq!(read_u64_le(&mut cursor).unwrap(), 0x0102030405060708);
    }

    #[test]
    fn test_eof_is_reported() {
        let mut cursor = Cursor::new(&[0x01u8][..]);
        assert!(read_u16_le(&mut cursor).is_err());
    }
}
