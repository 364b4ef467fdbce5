// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Normalized trace events
//!
//! Every [decoder][crate::decoder] translates its architecture's packets into
//! [`Event`]s. Consumers only ever see this representation, regardless of the
//! trace unit the data originated from.

use core::fmt;

/// A single decoded trace event
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A conditional branch was resolved
    Branch { taken: bool },
    /// Control flow continued at the given target address
    TargetAddress(u64),
    /// The execution context (e.g. process) changed to the given identifier
    ContextId(u64),
    /// Trace data was lost at the hardware level
    Overflow,
}

impl Event {
    /// Retrieve the [`Kind`] of this event
    pub fn kind(&self) -> Kind {
        match self {
            Self::Branch { .. } => Kind::BranchDecision,
            Self::TargetAddress(_) => Kind::TargetAddress,
            Self::ContextId(_) => Kind::ContextId,
            Self::Overflow => Kind::Overflow,
        }
    }

    /// Retrieve the branch decision, if this is a branch event
    pub fn taken(&self) -> Option<bool> {
        match self {
            Self::Branch { taken } => Some(*taken),
            _ => None,
        }
    }

    /// Retrieve the target address, if this is a target address event
    pub fn address(&self) -> Option<u64> {
        match self {
            Self::TargetAddress(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Check whether this event signals lost trace data
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch { taken: true } => write!(f, "{} taken", self.kind()),
            Self::Branch { taken: false } => write!(f, "{} not taken", self.kind()),
            Self::TargetAddress(addr) => write!(f, "{} {addr:#x}", self.kind()),
            Self::ContextId(id) => write!(f, "{} {id}", self.kind()),
            Self::Overflow => write!(f, "{}", self.kind()),
        }
    }
}

/// Kind of an [`Event`], without payload
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    BranchDecision,
    TargetAddress,
    ContextId,
    Overflow,
}

impl Kind {
    /// Short mnemonic, e.g. `TNT` for branch decisions
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::BranchDecision => "TNT",
            Self::TargetAddress => "TIP",
            Self::ContextId => "CID",
            Self::Overflow => "OVF",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
