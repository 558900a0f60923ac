// Copyright (c) Contributors to the cask project.
// SPDX-License-Identifier: Apache-2.0

pub use crate::encoding::{Decodable, Encodable};
