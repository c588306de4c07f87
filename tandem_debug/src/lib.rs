// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for tandem
//! update-loop diagnostics.
//!
//! This crate provides [`TraceSink`](tandem_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`Tee`]: forwards every event to two sinks.

pub mod chrome;
pub mod pretty;
pub mod recorder;

use tandem_core::trace::{FrameEvent, RegistrationEvent, TickEvent, TraceSink};

/// A [`TraceSink`] that forwards every event to two inner sinks, in order.
#[derive(Debug, Default)]
pub struct Tee<A, B> {
    /// Receives each event first.
    pub first: A,
    /// Receives each event second.
    pub second: B,
}

impl<A: TraceSink, B: TraceSink> Tee<A, B> {
    /// Combines two sinks.
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the tee back into its sinks.
    #[must_use]
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_tick(&mut self, e: &TickEvent) {
        self.first.on_tick(e);
        self.second.on_tick(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.first.on_frame(e);
        self.second.on_frame(e);
    }

    fn on_registration(&mut self, e: &RegistrationEvent) {
        self.first.on_registration(e);
        self.second.on_registration(e);
    }
}
