// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use rstest::rstest;

use super::{
    consume_header, read_digest, read_int, read_string, read_uint, write_digest, write_header,
    write_int, write_string, write_uint,
};
use crate::Error;
use crate::encoding::{DIGEST_SIZE, Digest};

#[rstest]
fn test_write_read_header() {
    let header = b"CASK";
    let mut stream = Cursor::new(Vec::<u8>::new());
    write_header(&mut stream, header).expect("failed to write header");
    stream.seek(SeekFrom::Start(0)).unwrap();
    consume_header(&mut stream, header).expect("failed to consume header");
    let mut remaining = String::new();
    stream.read_to_string(&mut remaining).unwrap();
    assert_eq!(remaining, "");
}

#[rstest]
fn test_consume_header_mismatch() {
    let mut stream = Cursor::new(Vec::from(&b"JUNK\n"[..]));
    assert!(matches!(
        consume_header(&mut stream, b"CASK"),
        Err(Error::InvalidHeader { .. })
    ));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(45)]
#[case(600)]
#[case(-1)]
fn test_read_write_int(#[case] value: i64) {
    let mut stream = Cursor::new(Vec::<u8>::new());
    write_int(&mut stream, value).unwrap();
    stream.write_all(b"postfix").unwrap();
    stream.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(read_int(&mut stream).unwrap(), value);
    let mut remaining = String::new();
    stream.read_to_string(&mut remaining).unwrap();
    assert_eq!(remaining, "postfix");
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(u64::MAX)]
fn test_read_write_uint(#[case] value: u64) {
    let mut stream = Cursor::new(Vec::<u8>::new());
    write_uint(&mut stream, value).unwrap();
    stream.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(read_uint(&mut stream).unwrap(), value);
}

#[rstest]
fn test_digest_round_trip_leaves_stream_intact() {
    let digest = Digest::hash_of_bytes(b"record");
    let mut stream = Cursor::new(Vec::<u8>::new());
    write_digest(&mut stream, &digest).unwrap();
    stream.write_all(b"postfix").unwrap();
    stream.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(read_digest(&mut stream).unwrap(), digest);
    let mut remaining = String::new();
    stream.read_to_string(&mut remaining).unwrap();
    assert_eq!(remaining, "postfix");
}

#[rstest]
fn test_read_digest_short_stream() {
    let mut stream = Cursor::new(vec![0_u8; DIGEST_SIZE - 1]);
    assert!(matches!(
        read_digest(&mut stream),
        Err(Error::UnexpectedEof)
    ));
}

#[rstest]
#[case("")]
#[case("hello")]
#[case("with spaces and punctuation!")]
fn test_read_write_string(#[case] value: &str) {
    let mut stream = Cursor::new(Vec::<u8>::new());
    write_string(&mut stream, value).unwrap();
    stream.write_all(b"postfix").unwrap();
    stream.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(read_string(&mut stream).unwrap(), value);
    let mut remaining = String::new();
    stream.read_to_string(&mut remaining).unwrap();
    assert_eq!(remaining, "postfix");
}

#[rstest]
fn test_write_string_rejects_embedded_null() {
    let mut stream = Cursor::new(Vec::<u8>::new());
    assert!(matches!(
        write_string(&mut stream, "bad\x00string"),
        Err(Error::StringHasNull)
    ));
}

#[rstest]
fn test_read_string_missing_terminator() {
    let mut stream = Cursor::new(Vec::from(&b"unterminated"[..]));
    assert!(matches!(
        read_string(&mut stream),
        Err(Error::UnexpectedEof)
    ));
}
