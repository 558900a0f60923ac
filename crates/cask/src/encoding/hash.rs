// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::io::{Read, Write};

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use ring::digest::{Context, SHA256};
use serde::{Deserialize, Serialize};

use super::binary;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./hash_test.rs"]
mod hash_test;

/// The number of bytes that make up a digest
pub const DIGEST_SIZE: usize = 20;

/// The bytes of an entirely null digest.
///
/// This is not the result of hashing an empty input, which has a
/// well-defined non-zero value. It is the explicit "no content" marker
/// and the default value of [`Digest`].
pub const NULL_DIGEST: [u8; DIGEST_SIZE] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// The Hasher calculates a [`Digest`] from the bytes written to it.
///
/// Bytes may be fed in any chunking; only the concatenation of all
/// chunks determines the final digest. A running hash computation is
/// not meaningfully duplicable, so this type is deliberately not
/// `Clone`.
pub struct Hasher {
    ctx: Context,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(&SHA256),
        }
    }

    /// Feed a chunk of bytes into the running hash.
    ///
    /// Never fails, for any input length including zero.
    pub fn update(&mut self, bytes: &[u8]) {
        self.ctx.update(bytes)
    }

    /// Discard all accumulated input, returning to the
    /// just-constructed state.
    pub fn reset(&mut self) {
        self.ctx = Context::new(&SHA256);
    }

    /// Finalize the accumulated input and return its digest.
    ///
    /// The hasher automatically resets: after this call it behaves as
    /// a freshly constructed one and may be reused without an explicit
    /// call to [`Hasher::reset`].
    pub fn digest(&mut self) -> Digest {
        let ctx = std::mem::replace(&mut self.ctx, Context::new(&SHA256));
        Digest::from_ring_digest(ctx.finish())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.ctx.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Encodable is a type that can be binary-encoded to a byte stream
pub trait Encodable
where
    Self: Sized,
{
    /// Compute the digest for this instance, by
    /// encoding it into binary form and hashing the result
    fn digest(&self) -> Result<Digest> {
        let mut hasher = Hasher::new();
        self.encode(&mut hasher)?;
        Ok(hasher.digest())
    }

    /// Write this object in binary format.
    fn encode(&self, writer: &mut impl Write) -> Result<()>;

    /// Encode this object into it's binary form in memory.
    fn encode_to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// Decodable is a type that can be rebuilt from a previously encoded binary stream
pub trait Decodable
where
    Self: Encodable,
{
    /// Read a previously encoded object from the given binary stream.
    fn decode(reader: &mut impl Read) -> Result<Self>;
}

impl Encodable for String {
    fn encode(&self, writer: &mut impl Write) -> Result<()> {
        binary::write_string(writer, self)
    }
}
impl Decodable for String {
    fn decode(reader: &mut impl Read) -> Result<Self> {
        binary::read_string(reader)
    }
}

/// Digest is the result of a hashing operation over binary data.
///
/// Digests are plain 20-byte values: comparison, XOR and shifting are
/// all defined over the raw big-endian byte representation, and every
/// operation produces a new value rather than mutating its operands.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Ord, PartialOrd)]
pub struct Digest([u8; DIGEST_SIZE]);

impl std::ops::Deref for Digest {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl Default for Digest {
    fn default() -> Self {
        NULL_DIGEST.into()
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_string().as_ref())
    }
}

impl std::str::FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Digest::from_hex(s)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl AsRef<Digest> for Digest {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<'a> Digest {
    /// Yields a view of the underlying bytes for this digest
    pub fn as_bytes(&'a self) -> &'a [u8] {
        self.0.as_ref()
    }

    /// Extract the raw bytes of this digest
    pub fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// Create a digest from the provided bytes.
    ///
    /// The exact [`DIGEST_SIZE`] number of bytes must be given.
    pub fn from_bytes(digest_bytes: &[u8]) -> Result<Self> {
        match digest_bytes.try_into() {
            Err(_err) => Err(Error::DigestLength(digest_bytes.len())),
            Ok(bytes) => Ok(Self(bytes)),
        }
    }

    /// Create a digest from up to [`DIGEST_SIZE`] bytes.
    ///
    /// Fewer bytes zero-fill the remainder, more are truncated and an
    /// empty slice yields the null digest. This leniency exists for
    /// reading back digests from interchange forms that may carry a
    /// shortened value; writing always emits all twenty bytes.
    pub fn from_bytes_lenient(digest_bytes: &[u8]) -> Self {
        let mut bytes = NULL_DIGEST;
        let count = digest_bytes.len().min(DIGEST_SIZE);
        bytes[..count].copy_from_slice(&digest_bytes[..count]);
        Self(bytes)
    }

    /// Parse a digest from its hexadecimal string form.
    ///
    /// Decoding is case-insensitive. A string that decodes to fewer
    /// than [`DIGEST_SIZE`] bytes zero-fills the trailing bytes, while
    /// invalid hex input fails with [`Error::MalformedHex`].
    pub fn from_hex(hex: &str) -> Result<Self> {
        let decoded = HEXLOWER_PERMISSIVE
            .decode(hex.as_bytes())
            .map_err(Error::MalformedHex)?;
        Ok(Self::from_bytes_lenient(&decoded))
    }

    /// The lowercase hexadecimal form of this digest, always
    /// exactly 40 characters.
    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(self.as_bytes())
    }

    /// Compute the digest of the given bytes in one call.
    ///
    /// Equivalent to feeding `bytes` to a fresh [`Hasher`]
    /// and finalizing it.
    pub fn hash_of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(bytes);
        hasher.digest()
    }

    /// Compute the digest of any encodable value over its
    /// binary-encoded form.
    pub fn hash_of(value: &impl Encodable) -> Result<Self> {
        value.digest()
    }

    fn from_ring_digest(ring_digest: ring::digest::Digest) -> Self {
        // a fixed 160-bit identifier: the leading DIGEST_SIZE bytes
        // of the underlying sha256 output
        let mut bytes = NULL_DIGEST;
        bytes.copy_from_slice(&ring_digest.as_ref()[..DIGEST_SIZE]);
        Self(bytes)
    }
}

impl std::ops::BitXor for Digest {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut out = NULL_DIGEST;
        for (slot, (lhs, rhs)) in out.iter_mut().zip(self.0.iter().zip(rhs.0.iter())) {
            *slot = lhs ^ rhs;
        }
        Self(out)
    }
}

impl std::ops::Shl<u32> for Digest {
    type Output = Self;

    /// Logical left shift of the whole digest treated as one
    /// big-endian integer.
    ///
    /// Bits shifted out of the top are discarded and vacated low bits
    /// are zero-filled; shifting by 160 or more yields the null digest.
    fn shl(self, bits: u32) -> Self::Output {
        let mut out = NULL_DIGEST;
        if bits as usize >= DIGEST_SIZE * 8 {
            return Self(out);
        }
        let byte_shift = (bits / 8) as usize;
        let bit_shift = bits % 8;
        for (index, slot) in out.iter_mut().take(DIGEST_SIZE - byte_shift).enumerate() {
            let src = index + byte_shift;
            *slot = self.0[src] << bit_shift;
            if bit_shift > 0 && src + 1 < DIGEST_SIZE {
                *slot |= self.0[src + 1] >> (8 - bit_shift);
            }
        }
        Self(out)
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        /// Visits a serialized byte sequence, decoding it as a digest.
        ///
        /// A sequence shorter than [`DIGEST_SIZE`] is zero-extended and
        /// an empty or absent one decodes as the null digest, preserving
        /// compatibility with values written before they were assigned
        /// any content.
        struct BytesVisitor;
        impl<'de> serde::de::Visitor<'de> for BytesVisitor {
            type Value = Digest;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a digest as an opaque byte sequence")
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Digest, E>
            where
                E: serde::de::Error,
            {
                Ok(Digest::from_bytes_lenient(value))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Digest, E>
            where
                E: serde::de::Error,
            {
                Ok(Digest::from_bytes_lenient(&value))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Digest, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut buf = Vec::with_capacity(DIGEST_SIZE);
                while let Some(byte) = seq.next_element::<u8>()? {
                    buf.push(byte);
                }
                Ok(Digest::from_bytes_lenient(&buf))
            }

            fn visit_none<E>(self) -> std::result::Result<Digest, E>
            where
                E: serde::de::Error,
            {
                Ok(Digest::default())
            }

            fn visit_unit<E>(self) -> std::result::Result<Digest, E>
            where
                E: serde::de::Error,
            {
                Ok(Digest::default())
            }
        }
        deserializer.deserialize_bytes(BytesVisitor)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl TryFrom<&str> for Digest {
    type Error = Error;

    fn try_from(hex: &str) -> Result<Digest> {
        Digest::from_hex(hex)
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_hex().as_ref())
    }
}

impl Encodable for Digest {
    fn encode(&self, mut writer: &mut impl Write) -> Result<()> {
        binary::write_digest(&mut writer, self)
    }

    fn digest(&self) -> Result<Digest> {
        Ok(*self)
    }
}

impl Decodable for Digest {
    fn decode(reader: &mut impl Read) -> Result<Self> {
        binary::read_digest(reader)
    }
}

impl Encodable for &Digest {
    fn encode(&self, mut writer: &mut impl Write) -> Result<()> {
        binary::write_digest(&mut writer, self)
    }

    fn digest(&self) -> Result<Digest> {
        Ok(*self.to_owned())
    }
}
