// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Intel PT-like packets
//!
//! | Signature                   | Packet         | Length |
//! |-----------------------------|----------------|--------|
//! | [`TIP`]                     | target address | 9      |
//! | [`PAD`]                     | padding        | 1      |
//! | bit 0 cleared, not [`PAD`]  | short TNT      | 1      |
//!
//! A target address packet carries the address as little-endian 64 bit value
//! following the signature byte. All other bytes are skipped.
//!
//! # Note
//!
//! A short TNT packet carries up to six branch decisions. They are normalized
//! to a single taken [`Event::Branch`] per packet.

use core::num::NonZeroUsize;

use super::Step;
use crate::event::Event;

/// Signature of a target address (TIP) packet
pub const TIP: u8 = 0x0D;

/// Padding
pub const PAD: u8 = 0x00;

/// Total length of a [`TIP`] packet including the signature byte
pub const TIP_LEN: NonZeroUsize = NonZeroUsize::new(1 + size_of::<u64>()).unwrap();

/// Inspect the packet at the start of `data`
///
/// `data` must not be empty.
pub(super) fn step(data: &[u8]) -> Step {
    match data[0] {
        TIP => target_address(data),
        PAD => Step::Skip,
        b if b & 1 == 0 => Step::single(Event::Branch { taken: true }),
        _ => Step::Skip,
    }
}

fn target_address(data: &[u8]) -> Step {
    let Some(payload) = data.get(1..TIP_LEN.get()) else {
        let need = NonZeroUsize::new(TIP_LEN.get() - data.len()).unwrap_or(NonZeroUsize::MIN);
        return Step::Incomplete(need);
    };
    let mut bytes = [0u8; size_of::<u64>()];
    bytes.copy_from_slice(payload);
    Step::Emit(Event::TargetAddress(u64::from_le_bytes(bytes)), TIP_LEN)
}
