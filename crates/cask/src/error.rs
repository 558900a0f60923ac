// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use miette::Diagnostic;
use thiserror::Error;

use crate::io::OpenMode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("file is not open: {0}")]
    FileNotOpen(PathBuf),
    #[error("unable to open file {path} in mode {mode}")]
    FileOpen {
        path: PathBuf,
        mode: OpenMode,
        #[source]
        source: io::Error,
    },
    #[error("file {path}: {context}")]
    FileIo {
        path: PathBuf,
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("unable to seek file {path} to {whence} offset {offset}")]
    FileSeek {
        path: PathBuf,
        whence: &'static str,
        offset: i64,
        #[source]
        source: io::Error,
    },
    #[error("unable to read {requested} bytes from {path}; only read {actual}")]
    ShortRead {
        path: PathBuf,
        requested: usize,
        actual: usize,
    },
    #[error("unable to write {requested} bytes to {path}; only wrote {actual}")]
    ShortWrite {
        path: PathBuf,
        requested: usize,
        actual: usize,
    },
    #[error("unexpected end of file: {0}")]
    EndOfFile(PathBuf),
    #[error("invalid hex digest")]
    MalformedHex(#[source] data_encoding::DecodeError),
    #[error("invalid number of bytes for digest: {0}")]
    DigestLength(usize),
    #[error("unexpected end of input while decoding")]
    UnexpectedEof,
    #[error("encoding read error")]
    FailedRead(#[source] io::Error),
    #[error("encoding write error")]
    FailedWrite(#[source] io::Error),
    #[error("cannot encode string with embedded null byte")]
    StringHasNull,
    #[error("invalid header: wanted {wanted:?}, got {got:?}")]
    InvalidHeader { wanted: Vec<u8>, got: Vec<u8> },
    #[error(transparent)]
    InvalidStringEncoding(#[from] Utf8Error),
}
