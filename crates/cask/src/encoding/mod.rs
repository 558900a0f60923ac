// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

mod binary;
pub use binary::{
    INT_SIZE, consume_header, read_digest, read_int, read_string, read_uint, write_digest,
    write_header, write_int, write_string, write_uint,
};

mod hash;
pub use hash::{DIGEST_SIZE, Decodable, Digest, Encodable, Hasher, NULL_DIGEST};
