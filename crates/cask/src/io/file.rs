// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./file_test.rs"]
mod file_test;

/// Open disposition for a [`BinaryFile`].
///
/// All three modes open the file for both reading and writing; they
/// differ only in how existing content is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the file if absent, otherwise keep its content
    CreateOrUpdate,
    /// Keep existing content, failing if the file does not exist
    Update,
    /// Always start from an empty file, creating it if absent
    Truncate,
}

impl OpenMode {
    fn apply(&self, opts: &mut OpenOptions) {
        opts.read(true).write(true);
        match self {
            Self::CreateOrUpdate => {
                opts.create(true);
            }
            Self::Update => {}
            Self::Truncate => {
                opts.create(true).truncate(true);
            }
        }
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::CreateOrUpdate => "create-or-update",
            Self::Update => "update",
            Self::Truncate => "truncate",
        })
    }
}

/// An owned handle to a file of fixed-layout binary records.
///
/// Every read and write is all-or-nothing: a request that cannot be
/// satisfied in full fails with a typed error rather than reporting a
/// partial transfer, so callers can assume records are moved atomically
/// or not at all. The handle is exclusively owned and released on drop,
/// whichever way the owning scope exits.
///
/// All operations other than [`BinaryFile::set_path`],
/// [`BinaryFile::path`] and [`BinaryFile::is_open`] require the file to
/// be open and fail with [`Error::FileNotOpen`] otherwise.
#[derive(Debug, Default)]
pub struct BinaryFile {
    path: PathBuf,
    file: Option<File>,
}

impl BinaryFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path used by a later call to [`BinaryFile::open_path`].
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Open the file at `path`, releasing any previously held
    /// handle first.
    ///
    /// A failed open leaves this value closed.
    pub fn open(&mut self, path: impl Into<PathBuf>, mode: OpenMode) -> Result<()> {
        self.file = None;
        self.path = path.into();
        let mut opts = OpenOptions::new();
        mode.apply(&mut opts);
        let file = opts.open(&self.path).map_err(|source| Error::FileOpen {
            path: self.path.clone(),
            mode,
            source,
        })?;
        tracing::debug!(path = ?self.path, %mode, "opened binary file");
        self.file = Some(file);
        Ok(())
    }

    /// Open the previously configured path, as set by
    /// [`BinaryFile::set_path`] or a prior open.
    pub fn open_path(&mut self, mode: OpenMode) -> Result<()> {
        let path = std::mem::take(&mut self.path);
        self.open(path, mode)
    }

    /// Release the underlying handle, if any.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            tracing::debug!(path = ?self.path, "closed binary file");
        }
    }

    fn parts(&mut self) -> Result<(&mut File, &Path)> {
        match self.file.as_mut() {
            Some(file) => Ok((file, &self.path)),
            None => Err(Error::FileNotOpen(self.path.clone())),
        }
    }

    /// The current byte offset into the file.
    pub fn tell(&mut self) -> Result<u64> {
        let (file, path) = self.parts()?;
        file.stream_position().map_err(|source| Error::FileIo {
            path: path.to_owned(),
            context: "unable to report position",
            source,
        })
    }

    /// Reposition to an absolute byte offset.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        let (file, path) = self.parts()?;
        tracing::trace!(offset, "seek");
        file.seek(SeekFrom::Start(offset))
            .map_err(|source| Error::FileSeek {
                path: path.to_owned(),
                whence: "absolute",
                offset: offset as i64,
                source,
            })?;
        Ok(())
    }

    /// Reposition relative to the end of the file.
    pub fn seek_from_end(&mut self, offset: i64) -> Result<()> {
        let (file, path) = self.parts()?;
        tracing::trace!(offset, "seek from end");
        file.seek(SeekFrom::End(offset))
            .map_err(|source| Error::FileSeek {
                path: path.to_owned(),
                whence: "end-relative",
                offset,
                source,
            })?;
        Ok(())
    }

    /// Reposition relative to the current offset.
    pub fn skip(&mut self, delta: i64) -> Result<()> {
        let (file, path) = self.parts()?;
        tracing::trace!(delta, "skip");
        file.seek(SeekFrom::Current(delta))
            .map_err(|source| Error::FileSeek {
                path: path.to_owned(),
                whence: "current-relative",
                offset: delta,
                source,
            })?;
        Ok(())
    }

    /// Fill `buf` completely from the current position.
    ///
    /// Partial reads are never silently accepted: if fewer bytes are
    /// available than requested the call fails with [`Error::ShortRead`]
    /// carrying the number of bytes actually consumed.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        let (file, path) = self.parts()?;
        let requested = buf.len();
        let mut actual = 0;
        while actual < requested {
            match file.read(&mut buf[actual..]) {
                Ok(0) => break,
                Ok(count) => actual += count,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(Error::FileIo {
                        path: path.to_owned(),
                        context: "read failed",
                        source,
                    });
                }
            }
        }
        if actual != requested {
            return Err(Error::ShortRead {
                path: path.to_owned(),
                requested,
                actual,
            });
        }
        Ok(())
    }

    /// Write all of `bytes` at the current position.
    ///
    /// A short write is a hard failure with [`Error::ShortWrite`],
    /// mirroring the all-or-nothing read policy.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let (file, path) = self.parts()?;
        let requested = bytes.len();
        let mut actual = 0;
        while actual < requested {
            match file.write(&bytes[actual..]) {
                Ok(0) => break,
                Ok(count) => actual += count,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(Error::FileIo {
                        path: path.to_owned(),
                        context: "write failed",
                        source,
                    });
                }
            }
        }
        if actual != requested {
            return Err(Error::ShortWrite {
                path: path.to_owned(),
                requested,
                actual,
            });
        }
        Ok(())
    }

    /// Push any user-space buffers down to the operating system.
    ///
    /// Not a durability guarantee; see [`BinaryFile::sync`].
    pub fn flush(&mut self) -> Result<()> {
        let (file, path) = self.parts()?;
        file.flush().map_err(|source| Error::FileIo {
            path: path.to_owned(),
            context: "unable to flush",
            source,
        })
    }

    /// Force written data onto stable storage.
    ///
    /// This is the durability barrier: once it returns, the data
    /// survives a crash. Callers relying on crash-safety must call it
    /// explicitly, flushing alone is not enough.
    pub fn sync(&mut self) -> Result<()> {
        let (file, path) = self.parts()?;
        tracing::debug!(path = ?path, "sync to stable storage");
        file.sync_all().map_err(|source| Error::FileIo {
            path: path.to_owned(),
            context: "unable to sync",
            source,
        })
    }

    /// Read exactly one byte, failing with [`Error::EndOfFile`] at
    /// the end of the file.
    pub fn read_byte(&mut self) -> Result<u8> {
        let (file, path) = self.parts()?;
        let mut byte = [0_u8; 1];
        loop {
            match file.read(&mut byte) {
                Ok(0) => return Err(Error::EndOfFile(path.to_owned())),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(Error::FileIo {
                        path: path.to_owned(),
                        context: "read failed",
                        source,
                    });
                }
            }
        }
    }

    /// Report whether a subsequent [`BinaryFile::read_byte`]
    /// would fail.
    ///
    /// Probes by reading one byte and seeking back over it; the probe
    /// is never observable to later reads.
    pub fn at_eof(&mut self) -> Result<bool> {
        let (file, path) = self.parts()?;
        let mut byte = [0_u8; 1];
        loop {
            match file.read(&mut byte) {
                Ok(0) => return Ok(true),
                Ok(_) => {
                    file.seek(SeekFrom::Current(-1))
                        .map_err(|source| Error::FileSeek {
                            path: path.to_owned(),
                            whence: "current-relative",
                            offset: -1,
                            source,
                        })?;
                    return Ok(false);
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(Error::FileIo {
                        path: path.to_owned(),
                        context: "read failed",
                        source,
                    });
                }
            }
        }
    }

    /// Create a read-only stream over this file for use
    /// with decoders.
    pub fn read_stream(&mut self) -> FileReadStream<'_> {
        FileReadStream::new(self)
    }
}

/// A read-only cursor over an open [`BinaryFile`].
///
/// This adapter exposes the narrow byte-consumption interface expected
/// by decoders and adds no buffering of its own. It holds an exclusive
/// borrow of the file, so direct file operations cannot interleave with
/// streamed reads. There is no write path.
pub struct FileReadStream<'a> {
    file: &'a mut BinaryFile,
}

impl<'a> FileReadStream<'a> {
    pub fn new(file: &'a mut BinaryFile) -> Self {
        Self { file }
    }

    /// Fill `buf` completely, exactly as [`BinaryFile::read`] would.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.file.read(buf)
    }

    /// Read exactly one byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.file.read_byte()
    }

    /// Discard the next `count` bytes.
    ///
    /// Skipped bytes are consumed by reading, not by seeking, so that
    /// consumption stays well-defined for decoders that count bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let mut discard = vec![0_u8; count];
        self.read(&mut discard)
    }
}

impl std::io::Read for FileReadStream<'_> {
    /// All-or-nothing, like the underlying file read.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf).map_err(|err| match err {
            err @ (Error::ShortRead { .. } | Error::EndOfFile(_)) => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err)
            }
            err => std::io::Error::other(err),
        })?;
        Ok(buf.len())
    }
}
