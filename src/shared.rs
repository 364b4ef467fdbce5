// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Engine shared between threads
//!
//! An [`Engine`] requires exclusive access for ingesting and processing. This
//! module provides the [`SharedEngine`], a cloneable handle serializing all
//! accesses through a mutex. It allows a producer thread to
//! [`ingest`][SharedEngine::ingest] while a consumer thread
//! [`process`][SharedEngine::process]es, or several producers to feed a single
//! engine.


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use crate::engine::Engine;
use crate::event::Event;

/// Cloneable, thread-safe handle to an [`Engine`]
///
/// # Example
///
/// ```
/// use hwtrace::decoder::Architecture;
/// use hwtrace::engine::Engine;
/// use hwtrace::shared::SharedEngine;
///
/// let engine = SharedEngine::new(Engine::new(Architecture::CoreSight));
/// let producer = engine.clone();
/// std::thread::spawn(move || producer.ingest(b"\x80\x80"))
///     .join()
///     .unwrap();
/// assert_eq!(engine.process(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    /// Wrap the given engine
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Ingest raw trace data, see [`Engine::ingest`]
    pub fn ingest(&self, raw: &[u8]) {
        self.lock().ingest(raw)
    }

    /// Decode all pending data, see [`Engine::process`]
    pub fn process(&self) -> usize {
        self.lock().process()
    }

    /// Retrieve a copy of all events decoded so far
    pub fn decoded_events(&self) -> Vec<Event> {
        self.lock().decoded_events().to_vec()
    }

    /// Remove and return all events decoded so far, see [`Engine::take_events`]
    pub fn take_events(&self) -> Vec<Event> {
        self.lock().take_events()
    }

    /// Run `f` with shared access to the wrapped engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&self.lock())
    }

    /// Lock the engine
    ///
    /// The engine is updated atomically with respect to user code, so a
    /// poisoned lock still guards a consistent engine.
    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Engine> for SharedEngine {
    fn from(engine: Engine) -> Self {
        Self::new(engine)
    }
}
