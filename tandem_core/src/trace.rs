// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the update loop.
//!
//! This module provides a [`TraceSink`] trait with one method per event kind.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events are built from the reports the coordinator and driver return:
//! [`TickEvent::new`] from a [`TickReport`], [`FrameEvent::new`] from a
//! [`FrameReport`], and [`RegistrationEvent`] from registry changes.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::registry::{Registration, RegistrationId};
use crate::timing::{FrameReport, TickKind, TickReport};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every fixed or variable tick the coordinator processes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickEvent {
    /// Coordinator tick counter.
    pub tick_index: u64,
    /// Driver frame this tick belongs to, if it was issued by a driver.
    pub frame_index: Option<u64>,
    /// Which clock the tick came from.
    pub kind: TickKind,
    /// Time reported for the tick, in seconds.
    pub elapsed: f64,
    /// Delta handed to receivers, or `None` for a skipped variable tick.
    pub hybrid_delta: Option<f64>,
    /// Receivers invoked.
    pub invoked: u32,
    /// Stolen time after the tick.
    pub stolen_time: f64,
}

impl TickEvent {
    /// Creates a `TickEvent` from a [`TickReport`] plus the driver frame that
    /// issued it (which the report itself does not carry).
    #[must_use]
    pub fn new(report: &TickReport, frame_index: Option<u64>) -> Self {
        Self {
            tick_index: report.tick_index,
            frame_index,
            kind: report.kind,
            elapsed: report.elapsed,
            hybrid_delta: report.hybrid_delta,
            invoked: report.invoked,
            stolen_time: report.stolen_time,
        }
    }
}

impl From<&TickReport> for TickEvent {
    fn from(report: &TickReport) -> Self {
        Self::new(report, None)
    }
}

/// Emitted once per driver frame, after its ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEvent {
    /// Driver frame counter.
    pub frame_index: u64,
    /// Frame delta as measured by the host.
    pub frame_delta: f64,
    /// Frame delta after clamping.
    pub clamped_delta: f64,
    /// Fixed ticks issued.
    pub fixed_ticks: u32,
    /// Fixed intervals dropped by the per-frame cap.
    pub dropped_fixed_ticks: u32,
    /// Whether the variable tick ran a pass.
    pub variable_pass: bool,
    /// Hybrid time delivered this frame.
    pub delivered: f64,
    /// Accumulator left over for the next frame.
    pub accumulator: f64,
}

impl FrameEvent {
    /// Creates a `FrameEvent` from a [`FrameReport`] plus the driver's
    /// leftover accumulator.
    #[must_use]
    pub fn new(report: &FrameReport, accumulator: f64) -> Self {
        Self {
            frame_index: report.frame_index,
            frame_delta: report.frame_delta,
            clamped_delta: report.clamped_delta,
            fixed_ticks: report.fixed_ticks,
            dropped_fixed_ticks: report.dropped_fixed_ticks,
            variable_pass: report.variable_pass,
            delivered: report.delivered,
            accumulator,
        }
    }
}

/// What happened to a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistrationChange {
    /// A receiver was registered.
    Registered {
        /// Its priority.
        priority: i32,
    },
    /// An unregister call was made.
    Unregistered {
        /// Whether a live registration was actually removed.
        removed: bool,
    },
}

/// Emitted when a registration is added or an unregister call is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationEvent {
    /// Registration handle.
    pub id: RegistrationId,
    /// Owner tag, or `""` when unknown.
    pub owner: &'static str,
    /// What changed.
    pub change: RegistrationChange,
}

impl RegistrationEvent {
    /// Describes a freshly added registration.
    #[must_use]
    pub fn registered(registration: &Registration) -> Self {
        Self {
            id: registration.id(),
            owner: registration.owner(),
            change: RegistrationChange::Registered {
                priority: registration.priority(),
            },
        }
    }

    /// Describes an unregister call.
    #[must_use]
    pub fn unregistered(id: RegistrationId, owner: &'static str, removed: bool) -> Self {
        Self {
            id,
            owner,
            change: RegistrationChange::Unregistered { removed },
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the update loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after each processed tick.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called after each driver frame.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when a registration changes.
    fn on_registration(&mut self, e: &RegistrationEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RegistrationEvent`].
    #[inline]
    pub fn registration(&mut self, e: &RegistrationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_registration(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
