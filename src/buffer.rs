// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Circular trace buffer
//!
//! This module provides the [`RingBuffer`], a fixed-size byte store absorbing
//! raw trace data. Writes never fail and never grow the store: once the buffer
//! is full, the oldest bytes are overwritten.

#[cfg(test)]
mod tests;

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::config::DEFAULT_CAPACITY;

/// Lossy, bounded byte store with overwrite-on-overflow semantics
///
/// The store is allocated once on construction. Data is appended via
/// [`write`][Self::write] and read back in chronological order via
/// [`snapshot`][Self::snapshot] or [`recent`][Self::recent]. Reads never
/// consume data.
///
/// # Example
///
/// ```
/// use core::num::NonZeroUsize;
/// use hwtrace::buffer::RingBuffer;
///
/// let mut buffer = RingBuffer::new(NonZeroUsize::new(4).unwrap());
/// buffer.write(b"abc");
/// buffer.write(b"de");
/// assert_eq!(buffer.snapshot(), b"bcde");
/// ```
#[derive(Clone, Debug)]
pub struct RingBuffer {
    store: Box<[u8]>,
    write_cursor: usize,
    full: bool,
    total_written: u64,
}

impl RingBuffer {
    /// Create a new, empty buffer holding `capacity` bytes
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            store: vec![0; capacity.get()].into_boxed_slice(),
            write_cursor: 0,
            full: false,
            total_written: 0,
        }
    }

    /// Create a new, empty buffer with the [default capacity][DEFAULT_CAPACITY]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Retrieve the capacity in bytes
    pub fn capacity(&self) -> usize {
        self.store.len()
    }

    /// Retrieve the number of valid bytes currently held
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else {
            self.write_cursor
        }
    }

    /// Check whether no data was written yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether the store was completely overwritten at least once
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Retrieve the offset the next write will start at
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Retrieve the total number of bytes ever passed to [`write`][Self::write]
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Append data, overwriting the oldest bytes if necessary
    ///
    /// If `data` is longer than the buffer's capacity, only its last
    /// [`capacity`][Self::capacity] bytes are retained and all prior contents
    /// are discarded.
    pub fn write(&mut self, data: &[u8]) {
        let capacity = self.capacity();
        self.total_written = self
            .total_written
            .saturating_add(data.len().try_into().unwrap_or(u64::MAX));

        if data.len() > capacity {
            log::warn!(
                "Chunk of {} bytes exceeds trace buffer of {capacity} bytes, overwriting everything",
                data.len(),
            );
            self.store.copy_from_slice(&data[data.len() - capacity..]);
            self.write_cursor = 0;
            self.full = true;
            return;
        }

        let end = self.write_cursor + data.len();
        if end < capacity {
            self.store[self.write_cursor..end].copy_from_slice(data);
            self.write_cursor = end;
        } else {
            let (head, tail) = data.split_at(capacity - self.write_cursor);
            self.store[self.write_cursor..].copy_from_slice(head);
            self.store[..tail.len()].copy_from_slice(tail);
            self.write_cursor = tail.len();
            self.full = true;
        }
    }

    /// Retrieve the current contents, oldest byte first
    ///
    /// Repeated calls without an intervening [`write`][Self::write] yield
    /// identical results.
    pub fn snapshot(&self) -> Vec<u8> {
        self.recent(self.len())
    }

    /// Retrieve the newest `count` bytes, oldest byte first
    ///
    /// If fewer than `count` bytes are held, all of them are returned. The
    /// result is always a suffix of [`snapshot`][Self::snapshot].
    pub fn recent(&self, count: usize) -> Vec<u8> {
        let count = count.min(self.len());
        let mut res = Vec::with_capacity(count);
        if let Some(start) = self.write_cursor.checked_sub(count) {
            res.extend_from_slice(&self.store[start..self.write_cursor]);
        } else {
            let start = self.capacity() + self.write_cursor - count;
            res.extend_from_slice(&self.store[start..]);
            res.extend_from_slice(&self.store[..self.write_cursor]);
        }
        res
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
