// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hybrid fixed/variable update coordination.
//!
//! `tandem_core` merges two independently driven clocks (a fixed-rate
//! simulation tick and a variable-rate render tick) into one stream of
//! receiver passes, in priority order, each carrying a single "hybrid delta
//! time". Time already consumed by render frames inside the current fixed
//! interval is tracked as *stolen* time so receivers never integrate the same
//! interval twice. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Host loop (frame deltas)
//!       │
//!       ▼
//!   FixedStepDriver::advance()
//!       │   0..N × report_fixed_tick()
//!       │   1    × report_variable_tick(elapsed)
//!       ▼
//!   HybridCoordinator ──► receivers (ascending priority, hybrid delta)
//!       │
//!       ▼
//!   TickReport / FrameReport ──► Tracer ──► TraceSink
//! ```
//!
//! **[`coordinator`]** The [`HybridCoordinator`](coordinator::HybridCoordinator)
//! and its stolen-time accounting.
//!
//! **[`registry`]** Priority-ordered registrations with opaque
//! [`RegistrationId`](registry::RegistrationId) handles.
//!
//! **[`receiver`]** The [`TimeStepReceiver`](receiver::TimeStepReceiver)
//! capability, implemented for every `FnMut(f64)`.
//!
//! **[`driver`]** Fixed-timestep accumulator that turns measured frame
//! deltas into tick reports, with catch-up limits for long frames.
//!
//! **[`timing`]** Report types returned by ticks and frames.
//!
//! **[`config`]** Coordinator and driver configuration with presets.
//!
//! **[`error`]** Error types.
//!
//! **[`trace`]** [`TraceSink`](trace::TraceSink) trait and event types for
//! update-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod receiver;
pub mod registry;
pub mod timing;
pub mod trace;
