// Copyright (C) 2024, 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trace engine
//!
//! This module provides the [`Engine`], which owns a [`RingBuffer`] and the
//! sequence of [`Event`]s decoded from it. Ingestion and decoding are
//! decoupled: [`Engine::ingest`] only stores data while [`Engine::process`]
//! decodes whatever was ingested since the last call.


use alloc::vec::Vec;
use core::mem;
use core::num::NonZeroUsize;

use crate::buffer::RingBuffer;
use crate::config;
use crate::decoder::Architecture;
use crate::error::Error;
use crate::event::Event;

/// Create a new [`Builder`] for [`Engine`]s
pub fn builder() -> Builder {
    Default::default()
}

/// Builder for [`Engine`]s
#[derive(Copy, Clone, Debug, Default)]
pub struct Builder {
    params: config::Parameters,
}

impl Builder {
    /// Create a new builder
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the [`config::Parameters`]
    pub fn with_params(self, params: &config::Parameters) -> Self {
        Self { params: *params }
    }

    /// Set the trace [`Architecture`]
    pub fn with_architecture(self, architecture: Architecture) -> Self {
        Self {
            params: config::Parameters {
                architecture,
                ..self.params
            },
        }
    }

    /// Set the capacity of the trace buffer in bytes
    ///
    /// # Note
    ///
    /// Packets longer than the capacity can never be decoded. For
    /// [`Architecture::IntelPt`], a capacity below
    /// [`TIP_LEN`][crate::decoder::pt::TIP_LEN] (9 bytes) means target
    /// addresses are never reported. Only a capacity of zero is rejected.
    pub fn with_capacity(self, capacity: usize) -> Self {
        Self {
            params: config::Parameters {
                capacity,
                ..self.params
            },
        }
    }

    /// Build an [`Engine`]
    ///
    /// Fails with [`Error::ZeroCapacity`] if the configured capacity is zero.
    pub fn build(self) -> Result<Engine, Error> {
        let capacity = NonZeroUsize::new(self.params.capacity).ok_or(Error::ZeroCapacity)?;
        Ok(Engine {
            architecture: self.params.architecture,
            buffer: RingBuffer::new(capacity),
            events: Vec::new(),
            pending: 0,
            lost_bytes: 0,
            overflows: 0,
            gap: false,
        })
    }
}

/// Trace engine for a single trace stream
///
/// Raw trace data is fed via [`ingest`][Self::ingest] and decoded on demand
/// via [`process`][Self::process]. The engine keeps track of which bytes were
/// decoded already: every byte is decoded at most once, regardless of how
/// ingestion and processing are interleaved. A packet which is cut short at
/// the end of the ingested data is kept and decoded by a later call to
/// [`process`][Self::process], after the remainder was ingested.
///
/// Data which is overwritten in the ring buffer before it was decoded is lost.
/// Such losses are reported via [`lost_bytes`][Self::lost_bytes], logged, and
/// marked in the event sequence by an [`Event::Overflow`] preceding the events
/// decoded from the surviving data. Events following such a marker may stem
/// from the remains of a partially overwritten packet.
///
/// Decoded events are only ever appended by [`process`][Self::process]. A
/// consumer may drain them via [`take_events`][Self::take_events] or discard
/// them via [`clear_events`][Self::clear_events] to bound memory usage.
///
/// # Example
///
/// ```
/// use hwtrace::decoder::Architecture;
/// use hwtrace::engine::Engine;
/// use hwtrace::event::Event;
///
/// let mut engine = Engine::new(Architecture::IntelPt);
/// engine.ingest(b"\x00\x02\x0d\x00\x05\x40");
/// assert_eq!(engine.process(), 1);
/// engine.ingest(b"\x00\x00\x00\x00\x00");
/// assert_eq!(engine.process(), 1);
/// assert_eq!(
///     engine.decoded_events(),
///     [Event::Branch { taken: true }, Event::TargetAddress(0x400500)],
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    architecture: Architecture,
    buffer: RingBuffer,
    events: Vec<Event>,
    pending: usize,
    lost_bytes: u64,
    overflows: u64,
    gap: bool,
}

impl Engine {
    /// Create a new engine with the default buffer capacity
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            buffer: RingBuffer::with_default_capacity(),
            events: Vec::new(),
            pending: 0,
            lost_bytes: 0,
            overflows: 0,
            gap: false,
        }
    }

    /// Retrieve the [`Architecture`] this engine decodes
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Retrieve the capacity of the trace buffer in bytes
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Retrieve the trace buffer
    pub fn buffer(&self) -> &RingBuffer {
        &self.buffer
    }

    /// Retrieve the number of ingested bytes not decoded yet
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Retrieve the number of bytes overwritten before they were decoded
    pub fn lost_bytes(&self) -> u64 {
        self.lost_bytes
    }

    /// Retrieve the number of [`Event::Overflow`]s appended so far
    ///
    /// This includes both overflow markers decoded from the trace data and
    /// markers for data overwritten before it was decoded.
    pub fn overflow_count(&self) -> u64 {
        self.overflows
    }

    /// Ingest raw trace data
    ///
    /// The data is only stored. It will be decoded by the next call to
    /// [`process`][Self::process].
    pub fn ingest(&mut self, raw: &[u8]) {
        self.buffer.write(raw);

        let pending = self.pending.saturating_add(raw.len());
        let capacity = self.buffer.capacity();
        if let Some(lost) = pending.checked_sub(capacity).filter(|l| *l > 0) {
            log::warn!("{lost} bytes of trace data were overwritten before being decoded");
            self.lost_bytes = self
                .lost_bytes
                .saturating_add(lost.try_into().unwrap_or(u64::MAX));
            self.pending = capacity;
            self.gap = true;
        } else {
            self.pending = pending;
        }
    }

    /// Decode all pending data
    ///
    /// Decodes the data ingested since the last call, prefixed by any
    /// incomplete packet left over from that call. The events are appended to
    /// the [decoded events][Self::decoded_events]. If pending data was
    /// overwritten since the last call, an [`Event::Overflow`] is appended
    /// first. Returns the number of events appended.
    pub fn process(&mut self) -> usize {
        let data = self.buffer.recent(self.pending);
        let mut decoder = self.architecture.decoder(&data);

        let before = self.events.len();
        if mem::take(&mut self.gap) {
            self.events.push(Event::Overflow);
        }
        self.events.extend(decoder.by_ref());
        let count = self.events.len() - before;

        let overflows = self.events[before..]
            .iter()
            .filter(|e| e.is_overflow())
            .count();
        self.overflows = self
            .overflows
            .saturating_add(overflows.try_into().unwrap_or(u64::MAX));

        self.pending -= decoder.byte_pos();
        log::debug!(
            "Decoded {count} events from {} bytes, {} bytes pending",
            decoder.byte_pos(),
            self.pending,
        );
        count
    }

    /// Retrieve all events decoded so far, in decode order
    pub fn decoded_events(&self) -> &[Event] {
        &self.events
    }

    /// Remove and return all events decoded so far
    ///
    /// Subsequent calls to [`process`][Self::process] append to an empty
    /// sequence. Counters such as [`overflow_count`][Self::overflow_count] are
    /// not affected.
    pub fn take_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.events)
    }

    /// Discard all events decoded so far
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}
