// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Configuration and utilities

#[cfg(feature = "serde")]
mod serde_utils;

use core::num::NonZeroUsize;

use crate::decoder::Architecture;

/// Default capacity of the trace buffer: 64 KiB
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(64 * 1024).unwrap();

/// Engine parameters
///
/// Parameters select the trace [`Architecture`] and the capacity of the
/// [ring buffer][crate::buffer::RingBuffer]. They are fixed once an
/// [`Engine`][crate::engine::Engine] is built from them. Validation happens at
/// that point, e.g. a zero capacity is only rejected by
/// [`Builder::build`][crate::engine::Builder::build].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Parameters {
    pub architecture: Architecture,
    pub capacity: usize,
}

/// See [PARAMETERS] for default values of individual fields
impl Default for Parameters {
    fn default() -> Self {
        PARAMETERS
    }
}

/// Default [Parameters]
pub const PARAMETERS: Parameters = Parameters {
    architecture: Architecture::IntelPt,
    capacity: DEFAULT_CAPACITY.get(),
};
