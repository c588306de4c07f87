// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reports produced by the coordinator and the host driver.
//!
//! - [`TickKind`]: which clock a tick came from
//! - [`TickReport`]: what one `report_*_tick` call did
//! - [`FrameReport`]: what one [`FixedStepDriver::advance`] call did
//!
//! # Data flow
//!
//! 1. The host measures a frame delta and hands it to
//!    [`FixedStepDriver::advance`].
//! 2. The driver issues zero or more fixed ticks and one variable tick to
//!    the [`HybridCoordinator`], each returning a [`TickReport`].
//! 3. The driver folds those into a [`FrameReport`].
//! 4. Both report types convert into trace events
//!    ([`TickEvent`](crate::trace::TickEvent),
//!    [`FrameEvent`](crate::trace::FrameEvent)) for diagnostics.
//!
//! [`FixedStepDriver::advance`]: crate::driver::FixedStepDriver::advance
//! [`HybridCoordinator`]: crate::coordinator::HybridCoordinator

/// Which clock a tick came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Fixed-rate simulation step.
    Fixed,
    /// Variable-rate render frame.
    Variable,
}

/// The outcome of a single tick report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Zero-based count of ticks the coordinator has processed before this
    /// one, fixed and variable alike.
    pub tick_index: u64,
    /// Which clock this tick came from.
    pub kind: TickKind,
    /// Time the host reported for this tick. Fixed ticks report the fixed
    /// interval.
    pub elapsed: f64,
    /// Delta handed to receivers, or `None` if the pass was skipped because
    /// the previous tick was fixed.
    pub hybrid_delta: Option<f64>,
    /// Number of receivers invoked.
    pub invoked: u32,
    /// Accumulated stolen time after this tick.
    pub stolen_time: f64,
}

impl TickReport {
    /// Whether this tick ran a pass over the receivers.
    #[inline]
    #[must_use]
    pub fn ran_pass(&self) -> bool {
        self.hybrid_delta.is_some()
    }
}

/// The outcome of one driver frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame counter.
    pub frame_index: u64,
    /// Frame delta as measured by the host.
    pub frame_delta: f64,
    /// Frame delta after clamping to
    /// [`DriverConfig::max_frame_delta`](crate::config::DriverConfig::max_frame_delta).
    pub clamped_delta: f64,
    /// Fixed ticks issued this frame.
    pub fixed_ticks: u32,
    /// Whole fixed intervals discarded because of the per-frame cap.
    pub dropped_fixed_ticks: u32,
    /// Whether the trailing variable tick ran a pass.
    pub variable_pass: bool,
    /// Total hybrid time delivered to receivers this frame.
    pub delivered: f64,
}
