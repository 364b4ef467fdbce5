// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! CoreSight ETM-like packets
//!
//! All packets are a single byte long. An [`ATOM`] yields a taken
//! [`Event::Branch`], an [`OVERFLOW`] marker yields an [`Event::Overflow`].
//! Any other byte is skipped.

use super::Step;
use crate::event::Event;

/// Signature of an atom (branch) packet
pub const ATOM: u8 = 0x80;

/// Signature of an overflow marker
pub const OVERFLOW: u8 = 0x01;

/// Inspect the packet at the start of `data`
///
/// `data` must not be empty.
pub(super) fn step(data: &[u8]) -> Step {
    match data[0] {
        ATOM => Step::single(Event::Branch { taken: true }),
        OVERFLOW => {
            log::error!("CoreSight overflow marker detected, trace data was lost");
            Step::single(Event::Overflow)
        }
        _ => Step::Skip,
    }
}
