// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

//! Content digests and the binary file primitives used to persist them.
//!
//! The [`Digest`] type is a 160-bit content identifier produced by the
//! streaming [`Hasher`]. Digests and other fixed-layout records are written
//! to and read back from disk through [`BinaryFile`], whose reads and writes
//! are all-or-nothing so callers can treat records as atomic.

pub mod encoding;
mod error;
pub mod io;
pub mod prelude;

pub use encoding::{
    DIGEST_SIZE, Decodable, Digest, Encodable, Hasher, INT_SIZE, NULL_DIGEST, consume_header,
    read_digest, read_int, read_string, read_uint, write_digest, write_header, write_int,
    write_string, write_uint,
};
pub use error::{Error, Result};
pub use io::{BinaryFile, FileReadStream, OpenMode};
