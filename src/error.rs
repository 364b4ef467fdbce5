// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Construction-time error type

use core::fmt;

/// Errors rejected when setting up an [`Engine`][crate::engine::Engine]
///
/// Ingestion and decoding never fail. Only invalid construction parameters are
/// reported through this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A buffer capacity of zero bytes was requested
    ZeroCapacity,
    /// The architecture tag is not known to us
    UnknownArchitecture,
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "Trace buffer capacity must be non-zero"),
            Self::UnknownArchitecture => write!(f, "Unknown trace architecture"),
        }
    }
}
