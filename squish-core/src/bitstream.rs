//! Bit-level I/O for variable-length Huffman codes.
//!
//! This module provides [`BitWriter`] and [`BitReader`] for the bit-packed
//! fields of the container. Bits are packed MSB-first within each byte:
//! the first bit written lands in bit 7 of the first byte.
//!
//! # Field framing
//!
//! Every encoded field ends with a two-byte trailer
//! `[finalByte, validBits]`. When the bit stream does not end on a byte
//! boundary, `finalByte` carries the 1..=7 leftover bits left-aligned and
//! `validBits` counts them; when it does, the trailer is `(0, 0)` and the
//! final byte is ignored on read. A field of `n` bytes therefore holds
//! exactly `(n - 2) * 8 + validBits` meaningful bits, and an empty field
//! is the bare trailer `(0, 0)`.
//!
//! The trailer is emitted only by [`BitWriter::finish`], never inline, so
//! a caller that frames fields by length can account for it precisely.

use crate::error::{Result, SquishError};
use std::io::{Read, Write};

/// Size of the `(finalByte, validBits)` field trailer.
pub const TRAILER_LEN: u64 = 2;

/// A bit-level writer that packs MSB-first into an underlying `Write`.
///
/// Full bytes are flushed downstream as soon as they are complete; at most
/// seven bits are ever buffered. Call [`finish`](Self::finish) to emit the
/// field trailer and learn the total field length.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Pending bits, right-aligned; the first pending bit is the most
    /// significant of the low `bits_in_buffer` bits.
    buffer: u64,
    /// Number of pending bits (always < 8 between calls).
    bits_in_buffer: u8,
    /// Bytes flushed downstream so far, trailer excluded.
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            bytes_written: 0,
        }
    }

    /// Append the low `count` bits of `value`, most significant first.
    ///
    /// `count` may be 0..=64. Complete bytes are flushed downstream
    /// immediately.
    pub fn write_bits(&mut self, value: u64, mut count: u8) -> Result<()> {
        debug_assert!(count <= 64, "cannot write more than 64 bits at once");

        while count > 0 {
            let take = count.min(32);
            count -= take;
            let chunk = (value >> count) & ((1u64 << take) - 1);
            self.buffer = (self.buffer << take) | chunk;
            self.bits_in_buffer += take;
            self.flush_full_bytes()?;
        }
        Ok(())
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.buffer = (self.buffer << 1) | (bit as u64);
        self.bits_in_buffer += 1;
        if self.bits_in_buffer == 8 {
            self.flush_full_bytes()?;
        }
        Ok(())
    }

    /// Total bits appended so far.
    pub fn bits_written(&self) -> u64 {
        self.bytes_written * 8 + self.bits_in_buffer as u64
    }

    /// Flush complete bytes from the buffer downstream.
    fn flush_full_bytes(&mut self) -> Result<()> {
        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.writer.write_all(&[byte])?;
            self.bits_in_buffer -= 8;
            self.bytes_written += 1;
        }
        Ok(())
    }

    /// Emit the field trailer and flush the underlying writer.
    ///
    /// Returns the total number of bytes this field occupies, trailer
    /// included.
    pub fn finish(mut self) -> Result<u64> {
        let trailer = if self.bits_in_buffer > 0 {
            let valid = self.bits_in_buffer;
            let tail = (self.buffer & ((1u64 << valid) - 1)) as u8;
            [tail << (8 - valid), valid]
        } else {
            [0, 0]
        };
        self.writer.write_all(&trailer)?;
        self.writer.flush()?;
        Ok(self.bytes_written + TRAILER_LEN)
    }
}

/// A bit-level reader over one length-framed field.
///
/// The reader is handed the exact byte budget of the field and serves
/// `(budget - 2) * 8 + validBits` bits, consuming precisely `budget`
/// bytes from the underlying reader so that sequential fields can be
/// decoded back to back.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Full payload bytes not yet read.
    full_bytes_left: u64,
    /// Byte currently being served, left-aligned.
    current: u8,
    /// Bits remaining in `current`.
    bits_in_current: u8,
    /// Set once the trailer has been consumed and its tail bits staged.
    trailer_read: bool,
    /// Total bits served (for error reporting).
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a reader over a field of exactly `field_len` bytes.
    ///
    /// A field can never be smaller than its own trailer.
    pub fn new(reader: R, field_len: u64) -> Result<Self> {
        if field_len < TRAILER_LEN {
            return Err(SquishError::truncated(TRAILER_LEN - field_len));
        }
        Ok(Self {
            reader,
            full_bytes_left: field_len - TRAILER_LEN,
            current: 0,
            bits_in_current: 0,
            trailer_read: false,
            bits_read: 0,
        })
    }

    /// Bit offset within the field (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.bits_read
    }

    /// Consume this `BitReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the next bit, or `None` once the field is exhausted.
    ///
    /// The trailer is consumed from the underlying reader the first time
    /// the payload bytes run out, so a fully drained `BitReader` leaves
    /// the reader positioned exactly past the field.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_in_current == 0 && !self.refill()? {
            return Ok(None);
        }

        let bit = self.current & 0x80 != 0;
        self.current <<= 1;
        self.bits_in_current -= 1;
        self.bits_read += 1;
        Ok(Some(bit))
    }

    /// Stage the next byte (or the trailer tail) into `current`.
    /// Returns false when the field has no bits left.
    fn refill(&mut self) -> Result<bool> {
        if self.full_bytes_left > 0 {
            let mut byte = [0u8; 1];
            self.read_exact(&mut byte)?;
            self.full_bytes_left -= 1;
            self.current = byte[0];
            self.bits_in_current = 8;
            return Ok(true);
        }

        if self.trailer_read {
            return Ok(false);
        }

        let mut trailer = [0u8; 2];
        self.read_exact(&mut trailer)?;
        self.trailer_read = true;

        let valid = trailer[1];
        if valid > 7 {
            return Err(SquishError::invalid_trailer(valid));
        }
        if valid == 0 {
            return Ok(false);
        }
        self.current = trailer[0];
        self.bits_in_current = valid;
        Ok(true)
    }

    /// `read_exact` with EOF mapped to [`SquishError::TruncatedStream`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                SquishError::truncated(buf.len() as u64 + self.full_bytes_left)
            } else {
                e.into()
            }
        })
    }
}
