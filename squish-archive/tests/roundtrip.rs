//! End-to-end container and envelope scenarios.

use squish_archive::{ArchiveReader, ArchiveWriter, FileRecord};
use squish_core::error::SquishError;
use std::io::Cursor;

fn build_container(records: &[FileRecord]) -> Vec<u8> {
    let mut writer = ArchiveWriter::new();
    for record in records {
        writer.add_record(record.clone());
    }
    let mut sink = Cursor::new(Vec::new());
    writer.write_to(&mut sink).unwrap();
    sink.into_inner()
}

fn seal(container: &[u8], password: &str) -> Vec<u8> {
    let mut sealed = Vec::new();
    squish_crypto::seal(&mut Cursor::new(container), &mut sealed, password).unwrap();
    sealed
}

fn open_and_read(sealed: &[u8], password: &str) -> Result<Vec<FileRecord>, SquishError> {
    let mut container = Vec::new();
    squish_crypto::open(&mut Cursor::new(sealed), &mut container, password)?;
    ArchiveReader::new(Cursor::new(&container))?.read_all()
}

#[test]
fn single_text_file_without_password() {
    let records = vec![FileRecord::new("hello.txt", b"Hello, World!".to_vec())];
    let sealed = seal(&build_container(&records), "");

    assert_eq!(sealed[0], squish_crypto::PLAINTEXT);
    assert_eq!(open_and_read(&sealed, "").unwrap(), records);
}

#[test]
fn two_files_with_password() {
    // Names drawn from the same four-symbol alphabet as the payloads, so
    // the balanced frequencies yield four two-bit codes.
    let records = vec![
        FileRecord::new("aa", b"aaaabbbbccccdddd".to_vec()),
        FileRecord::new("bb", b"aaaabbbbccccdddd".to_vec()),
    ];
    let container = build_container(&records);

    let table =
        squish_huffman::CodeTable::read_from(&mut Cursor::new(&container)).unwrap();
    assert_eq!(table.len(), 4);
    for byte in [b'a', b'b', b'c', b'd'] {
        assert_eq!(table.get(byte).unwrap().bit_len(), 2);
    }

    let sealed = seal(&container, "hello");
    assert_eq!(sealed[0], squish_crypto::ENCRYPTED);
    assert_eq!(open_and_read(&sealed, "hello").unwrap(), records);
    assert!(matches!(
        open_and_read(&sealed, "wrong"),
        Err(SquishError::AuthenticationFailed)
    ));
}

#[test]
fn single_distinct_byte_payload_field_layout() {
    // 100 copies of 'X' under a one-bit code: the payload field is 12
    // full bytes plus the trailer, with four significant tail bits.
    let records = vec![FileRecord::new("X", vec![b'X'; 100])];
    let container = build_container(&records);

    // Head: 8 (codeCount) + 6 (single entry) + 8 (fileCount).
    let mut offset = 22;
    // Name field: one bit -> bare-trailer-plus-tail form, 2 bytes.
    let name_len = u16::from_le_bytes([container[offset], container[offset + 1]]);
    offset += 2;
    assert_eq!(name_len, 2);
    offset += name_len as usize;

    let payload_len = u64::from_le_bytes(container[offset..offset + 8].try_into().unwrap());
    offset += 8;
    assert_eq!(payload_len, 14);

    let payload_field = &container[offset..offset + 14];
    let valid_bits = payload_field[13];
    assert_eq!(valid_bits, 100 % 8);
    assert_eq!(offset + 14, container.len());

    assert_eq!(open_and_read(&seal(&container, ""), "").unwrap(), records);
}

#[test]
fn trailing_data_is_rejected_through_the_envelope() {
    let records = vec![FileRecord::new("f.txt", b"payload bytes".to_vec())];
    let mut sealed = seal(&build_container(&records), "");
    sealed.push(0xEE);

    assert!(matches!(
        open_and_read(&sealed, ""),
        Err(SquishError::UnexpectedTrailingData)
    ));
}

#[test]
fn tampered_ciphertext_is_detected() {
    let records = vec![FileRecord::new("secret.txt", vec![0x42; 4000])];
    let mut sealed = seal(&build_container(&records), "pw");

    let mid = sealed.len() / 2;
    sealed[mid] ^= 0x04;
    assert!(matches!(
        open_and_read(&sealed, "pw"),
        Err(SquishError::AuthenticationFailed)
    ));
}

#[test]
fn code_table_region_is_deterministic() {
    let records = vec![
        FileRecord::new("first.txt", b"shared alphabet one".to_vec()),
        FileRecord::new("second.txt", b"shared alphabet two".to_vec()),
    ];
    let a = build_container(&records);
    let b = build_container(&records);
    assert_eq!(a, b);
}

#[test]
fn empty_file_roundtrips_with_its_name() {
    let records = vec![
        FileRecord::new("empty.dat", Vec::new()),
        FileRecord::new("full.dat", b"not empty".to_vec()),
    ];
    let out = open_and_read(&seal(&build_container(&records), ""), "").unwrap();
    assert_eq!(out, records);
}

#[test]
fn binary_data_roundtrips_under_password() {
    let noise: Vec<u8> = (0..100_000u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect();
    let records = vec![
        FileRecord::new("noise.bin", noise),
        FileRecord::new("dir/nested/file.txt", b"deeply nested".to_vec()),
    ];
    let sealed = seal(&build_container(&records), "0123456789abcdef0123456789abcdef");
    let out = open_and_read(&sealed, "0123456789abcdef0123456789abcdef").unwrap();
    assert_eq!(out, records);
}
