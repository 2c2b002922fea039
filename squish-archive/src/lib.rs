//! # Squish Archive
//!
//! Container framing for squish archives.
//!
//! A container packs any number of member files behind a single global
//! Huffman code table (all structural integers little-endian):
//!
//! ```text
//! [code table]                     // see squish-huffman::table
//! [u64 fileCount]
//! repeat fileCount times:
//!     [u16 compressedNameLen] [name field]
//!     [u64 compressedPayloadLen] [payload field]
//! ```
//!
//! Payload lengths are known only after encoding, so [`ArchiveWriter`]
//! reserves eight zero bytes, streams the encoded payload, and seeks back
//! to fix the length up — which is why the primary sink bound is
//! `Write + Seek`. A buffered variant covers non-seekable sinks with
//! identical output.
//!
//! Records appear in caller order; the name always precedes the payload;
//! the code table precedes everything.
//!
//! ```rust
//! use squish_archive::{ArchiveReader, ArchiveWriter, FileRecord};
//! use std::io::Cursor;
//!
//! let mut writer = ArchiveWriter::new();
//! writer.add_record(FileRecord::new("hello.txt", b"Hello, World!".to_vec()));
//!
//! let mut container = Cursor::new(Vec::new());
//! writer.write_to(&mut container).unwrap();
//!
//! container.set_position(0);
//! let records = ArchiveReader::new(container).unwrap().read_all().unwrap();
//! assert_eq!(records[0].name, "hello.txt");
//! assert_eq!(records[0].content, b"Hello, World!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod reader;
pub mod record;
pub mod writer;

pub use reader::ArchiveReader;
pub use record::FileRecord;
pub use writer::ArchiveWriter;
