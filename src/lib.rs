// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

//! # Ingestion and decoding of hardware branch trace streams
//!
//! This crate absorbs the raw byte stream emitted by a hardware trace unit in
//! a fixed-size [ring buffer][buffer::RingBuffer] and decodes it into a
//! normalized sequence of trace [`Event`]s: branch decisions, target
//! addresses, context switches and overflow markers.
//!
//! See [`engine`] for the [`Engine`] tying both together and [`decoder`] for
//! the supported trace formats.
//!
//! # Supported formats
//! - Intel PT-like: short TNT, TIP and padding packets
//! - ARM CoreSight ETM-like: atoms and overflow markers
//!
//! # Data loss
//! Neither ingestion nor decoding ever fail. Data is lost, rather than the
//! producer being stalled, if it is ingested faster than it is processed.
//! Such losses are reported via [`Engine::lost_bytes`], via
//! [`Event::Overflow`]s for losses signalled by the trace unit itself, and via
//! the [`log`] facade.
//!
//! # no_std
//! This crate only depends on the Core Library and `alloc`. The `std` feature
//! enables the [`shared`] module for using an [`Engine`] from multiple threads.
//!
//! # Example
//!
//! ```
//! use hwtrace::decoder::Architecture;
//! use hwtrace::engine;
//! use hwtrace::event::Event;
//!
//! let mut engine = engine::builder()
//!     .with_architecture(Architecture::IntelPt)
//!     .with_capacity(64 * 1024)
//!     .build()
//!     .unwrap();
//!
//! engine.ingest(b"\x00\x02\x0d\x00\x05\x40\x00\x00\x00\x00\x00");
//! assert_eq!(engine.process(), 2);
//! for event in engine.decoded_events() {
//!     println!("{event}");
//! }
//! assert_eq!(engine.decoded_events()[1], Event::TargetAddress(0x400500));
//! ```
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod event;
#[cfg(feature = "std")]
pub mod shared;

pub use engine::Engine;
pub use error::Error;
pub use event::Event;
