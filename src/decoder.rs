// Copyright (C) 2024, 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Architecture selection and packet decoders
//!
//! This module provides the [`Architecture`] selector and the [`Decoder`],
//! which turns raw trace bytes into [`Event`]s using the state machine of the
//! selected architecture. Supported are:
//!
//! * an Intel PT-like format ([`Architecture::IntelPt`]), see [`pt`], and
//! * an ARM CoreSight ETM-like format ([`Architecture::CoreSight`]), see
//!   [`coresight`].
//!
//! Decoders never fail. Unknown bytes are skipped one at a time and decoding
//! stops at a packet which is cut short by the end of the input. In the latter
//! case, the [`Decoder`] reports the position of the incomplete packet so that
//! decoding may be resumed once more data is available.

pub mod coresight;
pub mod pt;

#[cfg(test)]
mod tests;

use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;
use core::str::FromStr;

use crate::error::Error;
use crate::event::Event;

/// Trace architecture, determining the wire format of the trace data
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// x86 family, Intel Processor Trace-like packets
    IntelPt,
    /// ARM family, CoreSight ETM-like packets
    CoreSight,
}

impl Architecture {
    /// All supported architectures
    pub const ALL: [Self; 2] = [Self::IntelPt, Self::CoreSight];

    /// Retrieve the canonical tag of this architecture
    pub fn tag(self) -> &'static str {
        match self {
            Self::IntelPt => "INTEL_PT",
            Self::CoreSight => "CORESIGHT_ETM",
        }
    }

    /// Create a [`Decoder`] for the given data
    pub fn decoder(self, data: &[u8]) -> Decoder<'_> {
        Decoder::new(self, data)
    }

    /// Decode the given data in one go
    ///
    /// # Example
    ///
    /// ```
    /// use hwtrace::decoder::Architecture;
    /// use hwtrace::event::Event;
    ///
    /// let decoded = Architecture::CoreSight.decode(b"\x80\x01\x80");
    /// assert_eq!(
    ///     decoded.events,
    ///     [Event::Branch { taken: true }, Event::Overflow, Event::Branch { taken: true }],
    /// );
    /// assert_eq!(decoded.consumed, 3);
    /// ```
    pub fn decode(self, data: &[u8]) -> Decoded {
        let mut decoder = self.decoder(data);
        let events = decoder.by_ref().collect();
        Decoded {
            events,
            consumed: decoder.byte_pos(),
            needed: decoder.bytes_needed(),
        }
    }

    fn step(self, data: &[u8]) -> Step {
        match self {
            Self::IntelPt => pt::step(data),
            Self::CoreSight => coresight::step(data),
        }
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Self::IntelPt
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const TAGS: [(&str, Architecture); 8] = [
            ("INTEL_PT", Architecture::IntelPt),
            ("PT", Architecture::IntelPt),
            ("X86", Architecture::IntelPt),
            ("X86_64", Architecture::IntelPt),
            ("CORESIGHT_ETM", Architecture::CoreSight),
            ("CORESIGHT", Architecture::CoreSight),
            ("ETM", Architecture::CoreSight),
            ("ARM", Architecture::CoreSight),
        ];

        let s = s.trim();
        TAGS.iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(s))
            .map(|(_, a)| *a)
            .ok_or(Error::UnknownArchitecture)
    }
}

/// Decode Intel PT-like data in one go
pub fn decode_pt(data: &[u8]) -> Vec<Event> {
    Architecture::IntelPt.decoder(data).collect()
}

/// Decode CoreSight-like data in one go
pub fn decode_coresight(data: &[u8]) -> Vec<Event> {
    Architecture::CoreSight.decoder(data).collect()
}

/// Result of decoding a slice of data in one go
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded events, in order
    pub events: Vec<Event>,
    /// Number of bytes consumed from the start of the input
    pub consumed: usize,
    /// Additional bytes required for completing a truncated trailing packet
    pub needed: Option<NonZeroUsize>,
}

/// Byte-wise decoder for a single [`Architecture`]
///
/// A decoder scans its data from left to right and yields [`Event`]s through
/// its [`Iterator`] implementation. Iteration ends either at the end of the
/// data or at a packet that is not complete. In the latter case,
/// [`is_truncated`][Self::is_truncated] returns `true` and
/// [`byte_pos`][Self::byte_pos] points at the start of that packet.
///
/// # Example
///
/// ```
/// use hwtrace::decoder::Architecture;
/// use hwtrace::event::Event;
///
/// let mut decoder = Architecture::IntelPt.decoder(b"\x02\x0d\x00\x05");
/// assert_eq!(decoder.next(), Some(Event::Branch { taken: true }));
/// assert_eq!(decoder.next(), None);
/// assert!(decoder.is_truncated());
/// assert_eq!(decoder.byte_pos(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Decoder<'d> {
    architecture: Architecture,
    data: &'d [u8],
    byte_pos: usize,
    needed: Option<NonZeroUsize>,
}

impl<'d> Decoder<'d> {
    /// Create a new decoder
    pub fn new(architecture: Architecture, data: &'d [u8]) -> Self {
        Self {
            architecture,
            data,
            byte_pos: 0,
            needed: None,
        }
    }

    /// Retrieve the [`Architecture`] this decoder decodes
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Retrieve the number of bytes consumed so far
    pub fn byte_pos(&self) -> usize {
        self.byte_pos
    }

    /// Retrieve the number of bytes not consumed yet
    pub fn bytes_left(&self) -> usize {
        self.data.len().saturating_sub(self.byte_pos)
    }

    /// Check whether decoding stopped at an incomplete packet
    pub fn is_truncated(&self) -> bool {
        self.needed.is_some()
    }

    /// Retrieve the number of bytes missing from an incomplete packet
    ///
    /// Returns [`None`] if decoding did not stop at an incomplete packet.
    pub fn bytes_needed(&self) -> Option<NonZeroUsize> {
        self.needed
    }

    /// Reset the inner data to the given byte slice
    pub fn reset(&mut self, data: &'d [u8]) {
        self.data = data;
        self.byte_pos = 0;
        self.needed = None;
    }

    /// Retrieve the remaining data, starting at the current byte
    fn remaining_data(&self) -> &'d [u8] {
        self.data
            .split_at_checked(self.byte_pos)
            .unwrap_or_default()
            .1
    }
}

impl Iterator for Decoder<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.needed.is_some() {
            return None;
        }

        loop {
            let data = self.remaining_data();
            if data.is_empty() {
                return None;
            }

            match self.architecture.step(data) {
                Step::Emit(event, len) => {
                    self.byte_pos += len.get();
                    return Some(event);
                }
                Step::Skip => self.byte_pos += 1,
                Step::Incomplete(need) => {
                    log::trace!(
                        "Incomplete packet at byte {}, {need} more bytes required",
                        self.byte_pos,
                    );
                    self.needed = Some(need);
                    return None;
                }
            }
        }
    }
}

/// Outcome of inspecting the data at the current position
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// A complete packet of the given length yielding an event
    Emit(Event, NonZeroUsize),
    /// A single byte without event: padding or noise
    Skip,
    /// The packet starting at the current position needs more bytes
    Incomplete(NonZeroUsize),
}

impl Step {
    /// Create a [`Step::Emit`] for a single byte packet
    pub(crate) fn single(event: Event) -> Self {
        Self::Emit(event, NonZeroUsize::MIN)
    }
}
