// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Write};

use super::hash::{Digest, NULL_DIGEST};
use crate::{Error, Result};

pub const INT_SIZE: usize = std::mem::size_of::<u64>();

#[cfg(test)]
#[path = "./binary_test.rs"]
mod binary_test;

/// A stream running out of bytes mid-record is its own condition,
/// distinct from any other read failure.
fn read_error(err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEof
    } else {
        Error::FailedRead(err)
    }
}

/// Write an identifiable header to the given binary stream.
pub fn write_header(mut writer: impl Write, header: &[u8]) -> Result<()> {
    writer.write_all(header).map_err(Error::FailedWrite)?;
    writer.write_all(b"\n").map_err(Error::FailedWrite)?;
    Ok(())
}

/// Read and validate the given header from a binary stream.
pub fn consume_header(mut reader: impl Read, header: &[u8]) -> Result<()> {
    let mut buf = vec![0_u8; header.len() + 1];
    reader.read_exact(buf.as_mut_slice()).map_err(read_error)?;
    if buf[0..header.len()] != *header || buf.last() != Some(&b'\n') {
        return Err(Error::InvalidHeader {
            wanted: header.to_vec(),
            got: buf,
        });
    }
    Ok(())
}

/// Write an integer to the given binary stream.
pub fn write_int(mut writer: impl Write, value: i64) -> Result<()> {
    writer
        .write_all(&value.to_be_bytes())
        .map_err(Error::FailedWrite)?;
    Ok(())
}

/// Read an integer from the given binary stream.
pub fn read_int(mut reader: impl Read) -> Result<i64> {
    let mut buf = [0_u8; INT_SIZE];
    reader.read_exact(&mut buf).map_err(read_error)?;
    Ok(i64::from_be_bytes(buf))
}

/// Write an unsigned integer to the given binary stream.
pub fn write_uint(mut writer: impl Write, value: u64) -> Result<()> {
    writer
        .write_all(&value.to_be_bytes())
        .map_err(Error::FailedWrite)?;
    Ok(())
}

/// Read an unsigned integer from the given binary stream.
pub fn read_uint(mut reader: impl Read) -> Result<u64> {
    let mut buf = [0_u8; INT_SIZE];
    reader.read_exact(&mut buf).map_err(read_error)?;
    Ok(u64::from_be_bytes(buf))
}

/// Write a digest to the given binary stream.
///
/// The binary form of a digest is exactly its [`DIGEST_SIZE`](super::DIGEST_SIZE)
/// raw bytes, with no length prefix or other framing.
pub fn write_digest(mut writer: impl Write, digest: &Digest) -> Result<()> {
    writer
        .write_all(digest.as_bytes())
        .map_err(Error::FailedWrite)?;
    Ok(())
}

/// Read a digest from the given binary stream.
///
/// Consumes exactly [`DIGEST_SIZE`](super::DIGEST_SIZE) bytes, failing
/// with [`Error::UnexpectedEof`] if fewer are available.
pub fn read_digest(mut reader: impl Read) -> Result<Digest> {
    let mut buf = NULL_DIGEST;
    reader.read_exact(buf.as_mut()).map_err(read_error)?;
    Digest::from_bytes(&buf)
}

/// Write a string to the given binary stream, terminated
/// by a null byte.
pub fn write_string(mut writer: impl Write, string: &str) -> Result<()> {
    if string.contains('\x00') {
        return Err(Error::StringHasNull);
    }
    writer
        .write_all(string.as_bytes())
        .map_err(Error::FailedWrite)?;
    writer.write_all(b"\x00").map_err(Error::FailedWrite)?;
    Ok(())
}

/// Read a null-terminated string from the given binary stream.
///
/// Bytes are consumed one at a time so that this works over any
/// reader defined purely in terms of byte consumption, with no
/// lookahead beyond the terminator.
pub fn read_string(mut reader: impl Read) -> Result<String> {
    let mut raw = Vec::with_capacity(32);
    let mut byte = [0_u8; 1];
    loop {
        reader.read_exact(&mut byte).map_err(read_error)?;
        if byte[0] == 0 {
            break;
        }
        raw.push(byte[0]);
    }
    Ok(std::str::from_utf8(&raw)?.to_string())
}
