//! Archive reading: code table parse, sequential record decode,
//! trailing-data rejection.

use crate::record::FileRecord;
use squish_core::bitstream::BitReader;
use squish_core::error::{Result, SquishError};
use squish_core::wire::{read_u16_le, read_u64_le};
use std::io::{self, Read, Write};

/// Streams records out of a container in archive order.
///
/// Construction parses the code table and the file count. Records are
/// then decoded strictly sequentially — the format has no index, so
/// there is no random access. For each record, [`next_name`] decodes the
/// name and [`extract_payload`] streams the contents; the split lets a
/// caller open its destination before the payload flows. Call
/// [`finish`](Self::finish) after the last record to enforce that
/// nothing trails it.
///
/// [`next_name`]: Self::next_name
/// [`extract_payload`]: Self::extract_payload
pub struct ArchiveReader<R: Read> {
    reader: R,
    tree: squish_huffman::DecodeTree,
    file_count: u64,
    records_read: u64,
    awaiting_payload: bool,
}

impl<R: Read> ArchiveReader<R> {
    /// Parse the container head.
    ///
    /// Fails with [`SquishError::EmptyArchive`] when the container
    /// declares zero files.
    pub fn new(mut reader: R) -> Result<Self> {
        let table = squish_huffman::CodeTable::read_from(&mut reader)?;
        let tree = table.decoder()?;

        let file_count = read_u64_le(&mut reader).map_err(map_eof)?;
        if file_count == 0 {
            return Err(SquishError::EmptyArchive);
        }

        Ok(Self {
            reader,
            tree,
            file_count,
            records_read: 0,
            awaiting_payload: false,
        })
    }

    /// Number of records the container declares.
    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    /// Records not yet fully read.
    pub fn remaining(&self) -> u64 {
        self.file_count - self.records_read
    }

    /// Decode the next record's name.
    ///
    /// Must be followed by [`extract_payload`](Self::extract_payload)
    /// before any further name; must not be called past the last record.
    pub fn next_name(&mut self) -> Result<String> {
        debug_assert!(!self.awaiting_payload, "payload not yet extracted");
        debug_assert!(self.records_read < self.file_count, "archive exhausted");

        let name_len = read_u16_le(&mut self.reader).map_err(map_eof)?;
        let mut name_reader = BitReader::new(&mut self.reader, name_len as u64)?;
        let mut name_bytes = Vec::new();
        self.tree.decode_field(&mut name_reader, &mut name_bytes)?;

        self.awaiting_payload = true;
        Ok(String::from_utf8_lossy(&name_bytes).into_owned())
    }

    /// Stream the current record's payload into `sink`.
    ///
    /// Returns the number of decompressed bytes written.
    pub fn extract_payload<W: Write>(&mut self, sink: &mut W) -> Result<u64> {
        debug_assert!(self.awaiting_payload, "no name has been read");

        let payload_len = read_u64_le(&mut self.reader).map_err(map_eof)?;
        let mut payload_reader = BitReader::new(&mut self.reader, payload_len)?;
        let emitted = self.tree.decode_field(&mut payload_reader, sink)?;

        self.awaiting_payload = false;
        self.records_read += 1;
        Ok(emitted)
    }

    /// Verify that the stream ends exactly after the last record.
    pub fn finish(mut self) -> Result<()> {
        debug_assert!(self.records_read == self.file_count, "records remain");

        let mut probe = [0u8; 1];
        match self.reader.read(&mut probe) {
            Ok(0) => Ok(()),
            Ok(_) => Err(SquishError::UnexpectedTrailingData),
            Err(e) => Err(e.into()),
        }
    }

    /// Decode every record into memory and verify the terminator.
    pub fn read_all(mut self) -> Result<Vec<FileRecord>> {
        let mut records = Vec::with_capacity(self.file_count.min(1024) as usize);
        for _ in 0..self.file_count {
            let name = self.next_name()?;
            let mut content = Vec::new();
            self.extract_payload(&mut content)?;
            records.push(FileRecord::new(name, content));
        }
        self.finish()?;
        Ok(records)
    }
}

/// A container that cuts off inside its structural integers is truncated.
fn map_eof(e: io::Error) -> SquishError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        SquishError::truncated(1)
    } else {
        e.into()
    }
}
