// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-timestep host driver.
//!
//! Engines that own their loop issue fixed ticks and render frames
//! themselves. Hosts that only measure frame times can use
//! [`FixedStepDriver`] instead: it accumulates measured time and, per frame,
//! issues as many fixed ticks as whole fixed intervals have accumulated,
//! followed by exactly one variable tick.
//!
//! # Long frames
//!
//! A single frame may span several fixed intervals. The driver first clamps
//! the frame delta to [`DriverConfig::max_frame_delta`], then issues at most
//! [`DriverConfig::max_fixed_ticks_per_frame`] fixed ticks. Whole intervals
//! beyond that cap are dropped (reported in
//! [`FrameReport::dropped_fixed_ticks`]) so the simulation does not spiral
//! trying to catch up; only the sub-interval remainder carries over.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut driver = FixedStepDriver::new(DriverConfig::DEFAULT);
//! loop {
//!     let frame_delta = measure_frame();
//!     let report = driver.advance(&mut coordinator, frame_delta, &mut Tracer::none())?;
//!     render(driver.alpha(&coordinator));
//! }
//! ```

use crate::config::DriverConfig;
use crate::coordinator::HybridCoordinator;
use crate::error::{ConfigError, CoordinatorError, InvalidArgument};
use crate::timing::FrameReport;
use crate::trace::{FrameEvent, TickEvent, Tracer};

/// Converts measured frame deltas into fixed and variable tick reports.
#[derive(Clone, Debug)]
pub struct FixedStepDriver {
    config: DriverConfig,
    accumulator: f64,
    frame_index: u64,
}

impl FixedStepDriver {
    /// Creates a driver with an empty accumulator.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`DriverConfig::validate`].
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        assert!(
            config.validate().is_ok(),
            "driver limits must be positive"
        );
        Self {
            config,
            accumulator: 0.0,
            frame_index: 0,
        }
    }

    /// Creates a driver, rejecting an invalid config.
    pub fn try_new(config: DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Runs one host frame that took `frame_delta` seconds.
    ///
    /// Issues the frame's fixed ticks, then one variable tick with the
    /// clamped frame delta, emitting a [`TickEvent`] per tick and a
    /// [`FrameEvent`] at the end.
    ///
    /// Fails with [`InvalidArgument`] if `frame_delta` is negative or not
    /// finite; nothing is issued in that case.
    pub fn advance(
        &mut self,
        coordinator: &mut HybridCoordinator,
        frame_delta: f64,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, CoordinatorError> {
        InvalidArgument::check_elapsed(frame_delta)?;

        let interval = coordinator.fixed_interval();
        let clamped_delta = frame_delta.min(self.config.max_frame_delta);
        self.accumulator += clamped_delta;

        let mut delivered = 0.0;
        let mut fixed_ticks = 0_u32;
        while self.accumulator >= interval && fixed_ticks < self.config.max_fixed_ticks_per_frame {
            let report = coordinator.report_fixed_tick();
            tracer.tick(&TickEvent::new(&report, Some(self.frame_index)));
            delivered += interval;
            self.accumulator -= interval;
            fixed_ticks += 1;
        }

        let mut dropped_fixed_ticks = 0_u32;
        if self.accumulator >= interval {
            // Truncates towards zero and saturates at u32::MAX.
            #[expect(
                clippy::cast_possible_truncation,
                reason = "dropped count saturates for tiny fixed intervals"
            )]
            {
                dropped_fixed_ticks = (self.accumulator / interval) as u32;
            }
            self.accumulator %= interval;
        }

        let report = coordinator.report_variable_tick(clamped_delta)?;
        tracer.tick(&TickEvent::new(&report, Some(self.frame_index)));
        delivered += report.hybrid_delta.unwrap_or(0.0);

        let frame = FrameReport {
            frame_index: self.frame_index,
            frame_delta,
            clamped_delta,
            fixed_ticks,
            dropped_fixed_ticks,
            variable_pass: report.ran_pass(),
            delivered,
        };
        tracer.frame(&FrameEvent::new(&frame, self.accumulator));
        self.frame_index += 1;

        Ok(frame)
    }

    /// Fraction of a fixed interval accumulated but not yet simulated, in
    /// `[0, 1]`. Hosts use it to blend between the last two fixed states.
    #[must_use]
    pub fn alpha(&self, coordinator: &HybridCoordinator) -> f64 {
        (self.accumulator / coordinator.fixed_interval()).clamp(0.0, 1.0)
    }

    /// Time accumulated towards the next fixed tick, in seconds.
    #[must_use]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Number of frames advanced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// The limits this driver was built with.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Clears the accumulator and frame counter.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.frame_index = 0;
    }
}
