// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

mod file;
pub use file::{BinaryFile, FileReadStream, OpenMode};
