//! Archive writing: frequency pre-pass, code table emission, per-record
//! framing with seek-back length fixups.

use crate::record::FileRecord;
use rayon::prelude::*;
use squish_core::error::{Result, SquishError};
use squish_huffman::{build_codes, encode, CodeTable, FrequencyTable};
use std::io::{Seek, SeekFrom, Write};

/// Builds an archive from a set of records.
///
/// All records must be collected before writing: the global code table
/// covers every byte of every name and payload, so the frequency pass
/// has to see the whole input first. The encoding pass itself is
/// strictly serial — it owns the single output position.
#[derive(Debug, Default)]
pub struct ArchiveWriter {
    records: Vec<FileRecord>,
}

impl ArchiveWriter {
    /// Create a writer with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a record. Records are emitted in the order they are added.
    pub fn add_record(&mut self, record: FileRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total uncompressed bytes across all queued records.
    pub fn input_size(&self) -> u64 {
        self.records.iter().map(FileRecord::size).sum()
    }

    /// Write the container to a seekable sink.
    ///
    /// Payload lengths are fixed up in place: eight zero bytes are
    /// reserved, the encoded payload streams directly to the sink, and a
    /// seek-back writes the true field length. Returns the total bytes
    /// written.
    pub fn write_to<W: Write + Seek>(&self, sink: &mut W) -> Result<u64> {
        let table = self.prepare()?;
        let mut written = self.write_head(sink, &table)?;

        for record in &self.records {
            written += write_name(sink, record, &table)?;

            let fixup_pos = sink.stream_position()?;
            sink.write_all(&0u64.to_le_bytes())?;

            let payload_len = encode::encode_field(&record.content, &table, &mut *sink)?;

            let end = sink.stream_position()?;
            sink.seek(SeekFrom::Start(fixup_pos))?;
            sink.write_all(&payload_len.to_le_bytes())?;
            sink.seek(SeekFrom::Start(end))?;

            written += 8 + payload_len;
        }

        sink.flush()?;
        Ok(written)
    }

    /// Write the container to a non-seekable sink.
    ///
    /// Each payload is encoded into memory first so its length can be
    /// emitted up front; the byte output is identical to
    /// [`write_to`](Self::write_to).
    pub fn write_to_buffered<W: Write>(&self, sink: &mut W) -> Result<u64> {
        let table = self.prepare()?;
        let mut written = self.write_head(sink, &table)?;

        for record in &self.records {
            written += write_name(sink, record, &table)?;

            let payload = encode::encode_field_to_vec(&record.content, &table)?;
            sink.write_all(&(payload.len() as u64).to_le_bytes())?;
            sink.write_all(&payload)?;
            written += 8 + payload.len() as u64;
        }

        sink.flush()?;
        Ok(written)
    }

    /// Run the frequency pre-pass and build the code table.
    ///
    /// Per-record tallies run on the rayon pool and merge at the end;
    /// the tally is commutative so the merge order does not matter.
    fn prepare(&self) -> Result<CodeTable> {
        if self.records.is_empty() {
            return Err(SquishError::EmptyInput);
        }

        let freq = self
            .records
            .par_iter()
            .map(|record| {
                let mut freq = FrequencyTable::new();
                freq.add_bytes(record.name.as_bytes());
                freq.add_bytes(&record.content);
                freq
            })
            .reduce(FrequencyTable::new, |mut acc, other| {
                acc.merge(&other);
                acc
            });

        build_codes(&freq)
    }

    /// Emit the code table and the file count.
    fn write_head<W: Write>(&self, sink: &mut W, table: &CodeTable) -> Result<u64> {
        let table_len = table.write_to(sink)?;
        sink.write_all(&(self.records.len() as u64).to_le_bytes())?;
        Ok(table_len + 8)
    }
}

/// Emit one record's name field: `u16` length, then the encoded bytes.
fn write_name<W: Write>(sink: &mut W, record: &FileRecord, table: &CodeTable) -> Result<u64> {
    let name_field = encode::encode_field_to_vec(record.name.as_bytes(), table)?;
    if name_field.len() > u16::MAX as usize {
        return Err(SquishError::name_too_long(name_field.len()));
    }
    sink.write_all(&(name_field.len() as u16).to_le_bytes())?;
    sink.write_all(&name_field)?;
    Ok(2 + name_field.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_input_rejected() {
        let writer = ArchiveWriter::new();
        let mut sink = Cursor::new(Vec::new());
        assert!(matches!(
            writer.write_to(&mut sink),
            Err(SquishError::EmptyInput)
        ));
    }

    #[test]
    fn test_no_bytes_at_all_rejected() {
        // A record with an empty name and empty content gives the
        // frequency pass nothing to count.
        let mut writer = ArchiveWriter::new();
        writer.add_record(FileRecord::new("", Vec::new()));
        let mut sink = Cursor::new(Vec::new());
        assert!(matches!(
            writer.write_to(&mut sink),
            Err(SquishError::EmptyCodeTable)
        ));
    }

    #[test]
    fn test_returned_length_matches_sink() {
        let mut writer = ArchiveWriter::new();
        writer.add_record(FileRecord::new("a.txt", b"some file content".to_vec()));
        writer.add_record(FileRecord::new("b.txt", b"other content".to_vec()));

        let mut sink = Cursor::new(Vec::new());
        let written = writer.write_to(&mut sink).unwrap();
        assert_eq!(written, sink.get_ref().len() as u64);
    }

    #[test]
    fn test_buffered_output_is_identical() {
        let mut writer = ArchiveWriter::new();
        writer.add_record(FileRecord::new("x/y.bin", vec![7; 3000]));
        writer.add_record(FileRecord::new("z.txt", b"hello".to_vec()));

        let mut seekable = Cursor::new(Vec::new());
        writer.write_to(&mut seekable).unwrap();

        let mut buffered = Vec::new();
        writer.write_to_buffered(&mut buffered).unwrap();

        assert_eq!(seekable.into_inner(), buffered);
    }

    #[test]
    fn test_deterministic_head() {
        // Two independent writes of the same records must agree byte for
        // byte over the code table region (and here, the whole stream).
        let mut writer = ArchiveWriter::new();
        writer.add_record(FileRecord::new("f", b"deterministic".to_vec()));

        let mut first = Cursor::new(Vec::new());
        writer.write_to(&mut first).unwrap();
        let mut second = Cursor::new(Vec::new());
        writer.write_to(&mut second).unwrap();

        assert_eq!(first.into_inner(), second.into_inner());
    }

    #[test]
    fn test_input_size() {
        let mut writer = ArchiveWriter::new();
        writer.add_record(FileRecord::new("a", vec![0; 10]));
        writer.add_record(FileRecord::new("b", vec![0; 32]));
        assert_eq!(writer.input_size(), 42);
        assert_eq!(writer.len(), 2);
    }
}
