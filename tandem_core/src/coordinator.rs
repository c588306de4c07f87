// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merges fixed and variable ticks into a single receiver pass stream.
//!
//! The [`HybridCoordinator`] is driven by a host loop with two kinds of tick:
//!
//! - [`report_fixed_tick`](HybridCoordinator::report_fixed_tick), once per
//!   fixed simulation step;
//! - [`report_variable_tick`](HybridCoordinator::report_variable_tick), once
//!   per render frame, with the wall-clock time since the previous frame.
//!
//! Every fixed tick runs one pass with the fixed interval as delta. A variable
//! tick runs an extra pass only when the tick right before it was *not* fixed,
//! and then hands out the part of the current fixed interval that variable
//! ticks have not already consumed ("stolen"). That remaining budget shrinks
//! towards zero as frames pile up inside one fixed interval and is restored by
//! the next fixed tick.
//!
//! ```text
//!   fixed      ──► pass(interval)                    stolen = 0
//!   variable   ──► skip (previous tick was fixed)    stolen += elapsed
//!   variable   ──► pass(interval - stolen)           stolen += elapsed
//!   variable   ──► pass(interval - stolen)           stolen += elapsed
//!   fixed      ──► pass(interval)                    stolen = 0
//! ```
//!
//! Stolen time is clamped to the fixed interval, so the variable delta
//! bottoms out at zero and is never negative.

use alloc::rc::Rc;
use core::any::type_name;
use core::cell::RefCell;

use crate::config::CoordinatorConfig;
use crate::error::{ConfigError, CoordinatorError, InvalidArgument};
use crate::receiver::{Receiver, TimeStepReceiver};
use crate::registry::{Registration, RegistrationId, Registry};
use crate::timing::{TickKind, TickReport};

/// Running counters kept by the coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinatorStats {
    /// Passes run by fixed ticks.
    pub fixed_passes: u64,
    /// Passes run by variable ticks.
    pub variable_passes: u64,
    /// Variable ticks that ran no pass because the previous tick was fixed.
    pub skipped_variable_ticks: u64,
    /// Sum of the hybrid deltas of all passes, in seconds.
    pub delivered: f64,
}

/// Single-threaded coordinator for hybrid updates.
///
/// Owned by the host's frame-loop driver; there is no global instance.
/// Receivers are shared `Rc<RefCell<_>>` cells, which makes the coordinator
/// `!Send` and `!Sync`.
///
/// # Re-entrancy
///
/// Tick methods take `&mut self`, so receivers cannot register or unregister
/// through the same coordinator while a pass is running. A receiver whose
/// cell is already mutably borrowed when a pass reaches it makes the pass
/// panic.
#[derive(Debug)]
pub struct HybridCoordinator {
    config: CoordinatorConfig,
    registry: Registry,
    fixed_last: bool,
    total_stolen_time: f64,
    tick_index: u64,
    stats: CoordinatorStats,
}

impl HybridCoordinator {
    /// Creates a coordinator with no registrations.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`CoordinatorConfig::validate`]. Use
    /// [`try_new`](Self::try_new) for configs that come from user input.
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        assert!(
            config.validate().is_ok(),
            "fixed interval must be finite and positive"
        );
        Self::new_unchecked(config)
    }

    /// Creates a coordinator, rejecting an invalid config.
    pub fn try_new(config: CoordinatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new_unchecked(config))
    }

    fn new_unchecked(config: CoordinatorConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            fixed_last: false,
            total_stolen_time: 0.0,
            tick_index: 0,
            stats: CoordinatorStats::default(),
        }
    }

    // -- Registration --

    /// Registers a receiver at the given priority.
    ///
    /// Lower priorities run first; equal priorities run in registration
    /// order. The owner tag is the receiver's type name.
    ///
    /// The coordinator keeps a clone of `receiver` until it is unregistered.
    /// Keep your own clone to identify the receiver later.
    pub fn register<R>(
        &mut self,
        receiver: Rc<RefCell<R>>,
        priority: i32,
    ) -> Result<RegistrationId, CoordinatorError>
    where
        R: TimeStepReceiver + 'static,
    {
        self.register_dyn(receiver, type_name::<R>(), priority)
    }

    /// Registers an already type-erased receiver with an explicit owner tag.
    ///
    /// Fails with [`InvalidArgument::EmptyOwnerTag`] if `owner` is empty and
    /// with [`CoordinatorError::DuplicateRegistration`] if the same receiver
    /// cell is already registered. The registry is unchanged on failure.
    pub fn register_dyn(
        &mut self,
        receiver: Receiver,
        owner: &'static str,
        priority: i32,
    ) -> Result<RegistrationId, CoordinatorError> {
        if owner.is_empty() {
            return Err(InvalidArgument::EmptyOwnerTag.into());
        }
        if let Some(existing) = self.registry.find_receiver(&receiver) {
            return Err(CoordinatorError::DuplicateRegistration { existing });
        }
        Ok(self.registry.insert(receiver, owner, priority))
    }

    /// Removes a registration.
    ///
    /// Returns `Ok(true)` if it was live and `Ok(false)` if it was already
    /// removed or never issued by this coordinator. Only the null handle is
    /// an error.
    pub fn unregister(&mut self, id: RegistrationId) -> Result<bool, CoordinatorError> {
        if !id.is_valid() {
            return Err(InvalidArgument::NullHandle.into());
        }
        Ok(self.registry.remove(id).is_some())
    }

    // -- Ticks --

    /// Processes one fixed simulation step.
    ///
    /// Runs a pass with the fixed interval as delta, then marks the last tick
    /// as fixed and clears stolen time.
    ///
    /// # Panics
    ///
    /// Panics if a receiver's cell is already borrowed.
    pub fn report_fixed_tick(&mut self) -> TickReport {
        let delta = self.config.fixed_interval;
        let invoked = self.run_pass(delta);
        self.stats.fixed_passes += 1;

        self.fixed_last = true;
        self.total_stolen_time = 0.0;

        self.finish_tick(TickKind::Fixed, delta, Some(delta), invoked)
    }

    /// Processes one render frame that took `elapsed` seconds.
    ///
    /// If the previous tick was fixed, no pass runs. Otherwise one pass runs
    /// with `max(fixed_interval - stolen, 0)` as delta, using the stolen time
    /// from before this frame. In both cases `elapsed` is then added to the
    /// stolen time (clamped to the fixed interval) and the last tick is marked
    /// as variable.
    ///
    /// Fails with [`InvalidArgument`] if `elapsed` is negative or not finite;
    /// the coordinator is unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if a receiver's cell is already borrowed.
    pub fn report_variable_tick(&mut self, elapsed: f64) -> Result<TickReport, CoordinatorError> {
        InvalidArgument::check_elapsed(elapsed)?;

        let interval = self.config.fixed_interval;
        let hybrid_delta = if self.fixed_last {
            None
        } else {
            Some((interval - self.total_stolen_time).max(0.0))
        };

        let invoked = match hybrid_delta {
            Some(delta) => {
                self.stats.variable_passes += 1;
                self.run_pass(delta)
            }
            None => {
                self.stats.skipped_variable_ticks += 1;
                0
            }
        };

        self.total_stolen_time = (self.total_stolen_time + elapsed).min(interval);
        self.fixed_last = false;

        Ok(self.finish_tick(TickKind::Variable, elapsed, hybrid_delta, invoked))
    }

    /// Forgets tick history without touching registrations.
    ///
    /// Afterwards the coordinator behaves as if no tick had been reported
    /// yet: the next variable tick runs a full-interval pass. Statistics and
    /// the tick counter are kept.
    pub fn reset_timing(&mut self) {
        self.fixed_last = false;
        self.total_stolen_time = 0.0;
    }

    fn run_pass(&mut self, delta: f64) -> u32 {
        let mut invoked = 0_u32;
        for entry in self.registry.iter() {
            entry.receiver().borrow_mut().on_hybrid_update(delta);
            invoked = invoked.saturating_add(1);
        }
        self.stats.delivered += delta;
        invoked
    }

    fn finish_tick(
        &mut self,
        kind: TickKind,
        elapsed: f64,
        hybrid_delta: Option<f64>,
        invoked: u32,
    ) -> TickReport {
        let report = TickReport {
            tick_index: self.tick_index,
            kind,
            elapsed,
            hybrid_delta,
            invoked,
            stolen_time: self.total_stolen_time,
        };
        self.tick_index += 1;
        report
    }

    // -- Queries --

    /// The configuration this coordinator was built with.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Length of one fixed step, in seconds.
    #[must_use]
    pub fn fixed_interval(&self) -> f64 {
        self.config.fixed_interval
    }

    /// Whether the most recent tick was a fixed tick.
    #[must_use]
    pub fn fixed_last(&self) -> bool {
        self.fixed_last
    }

    /// Variable-tick time accumulated since the last fixed tick, clamped to
    /// the fixed interval.
    #[must_use]
    pub fn total_stolen_time(&self) -> f64 {
        self.total_stolen_time
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_index
    }

    /// Running counters.
    #[must_use]
    pub fn stats(&self) -> &CoordinatorStats {
        &self.stats
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether `id` names a live registration.
    #[must_use]
    pub fn contains(&self, id: RegistrationId) -> bool {
        self.registry.get(id).is_some()
    }

    /// Priority of a live registration.
    #[must_use]
    pub fn priority_of(&self, id: RegistrationId) -> Option<i32> {
        self.registry.get(id).map(Registration::priority)
    }

    /// Iterates live registrations in invocation order.
    pub fn registrations(&self) -> impl Iterator<Item = &Registration> + '_ {
        self.registry.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    type Log = Rc<RefCell<Vec<(&'static str, f64)>>>;

    const EPS: f64 = 1e-12;

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn logging(log: &Log, name: &'static str) -> Rc<RefCell<impl FnMut(f64) + 'static>> {
        let log = Rc::clone(log);
        Rc::new(RefCell::new(move |dt: f64| log.borrow_mut().push((name, dt))))
    }

    fn names(log: &Log) -> Vec<&'static str> {
        log.borrow().iter().map(|(name, _)| *name).collect()
    }

    fn deltas(log: &Log) -> Vec<f64> {
        log.borrow().iter().map(|(_, dt)| *dt).collect()
    }

    fn coordinator() -> HybridCoordinator {
        HybridCoordinator::new(CoordinatorConfig::HZ_50)
    }

    #[test]
    fn initial_state() {
        let coord = coordinator();
        assert!(!coord.fixed_last());
        assert_eq!(coord.total_stolen_time(), 0.0);
        assert!(coord.is_empty());
        assert_eq!(coord.tick_count(), 0);
    }

    #[test]
    fn try_new_rejects_bad_interval() {
        let config = CoordinatorConfig {
            fixed_interval: 0.0,
        };
        assert_eq!(
            HybridCoordinator::try_new(config).err(),
            Some(ConfigError::NonPositiveInterval)
        );
    }

    #[test]
    #[should_panic(expected = "fixed interval must be finite and positive")]
    fn new_panics_on_bad_interval() {
        let _ = HybridCoordinator::new(CoordinatorConfig {
            fixed_interval: f64::INFINITY,
        });
    }

    #[test]
    fn passes_run_in_priority_order() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "late"), 100).unwrap();
        coord.register(logging(&log, "early"), -100).unwrap();
        coord.register(logging(&log, "mid-a"), 0).unwrap();
        coord.register(logging(&log, "mid-b"), 0).unwrap();

        let report = coord.report_fixed_tick();
        assert_eq!(report.invoked, 4);
        assert_eq!(names(&log), ["early", "mid-a", "mid-b", "late"]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let log = new_log();
        let mut coord = coordinator();
        let receiver = logging(&log, "dup");
        let first = coord.register(Rc::clone(&receiver), 1).unwrap();

        let err = coord.register(Rc::clone(&receiver), 5).unwrap_err();
        assert_eq!(
            err,
            CoordinatorError::DuplicateRegistration { existing: first }
        );
        assert_eq!(coord.len(), 1);
        assert_eq!(coord.priority_of(first), Some(1));

        coord.report_fixed_tick();
        assert_eq!(log.borrow().len(), 1, "duplicate must not run twice");
    }

    #[test]
    fn empty_owner_tag_is_rejected() {
        let log = new_log();
        let mut coord = coordinator();
        let err = coord
            .register_dyn(logging(&log, "anon"), "", 0)
            .unwrap_err();
        assert_eq!(
            err,
            CoordinatorError::InvalidArgument(InvalidArgument::EmptyOwnerTag)
        );
        assert!(coord.is_empty());
    }

    #[test]
    fn owner_tag_defaults_to_type_name() {
        struct Physics;
        impl TimeStepReceiver for Physics {
            fn on_hybrid_update(&mut self, _delta: f64) {}
        }

        let mut coord = coordinator();
        coord.register(Rc::new(RefCell::new(Physics)), 0).unwrap();
        let owner = coord.registrations().next().unwrap().owner();
        assert!(owner.ends_with("Physics"), "got {owner}");
    }

    #[test]
    fn unregister_absent_is_noop() {
        let log = new_log();
        let mut coord = coordinator();
        let a = coord.register(logging(&log, "a"), 0).unwrap();
        let b = coord.register(logging(&log, "b"), 0).unwrap();

        assert_eq!(coord.unregister(a), Ok(true));
        assert_eq!(coord.unregister(a), Ok(false));
        assert_eq!(coord.unregister(RegistrationId(999)), Ok(false));
        assert!(coord.contains(b));

        coord.report_fixed_tick();
        assert_eq!(names(&log), ["b"]);
    }

    #[test]
    fn unregister_null_handle_is_invalid() {
        let mut coord = coordinator();
        assert_eq!(
            coord.unregister(RegistrationId::default()),
            Err(CoordinatorError::InvalidArgument(InvalidArgument::NullHandle))
        );
    }

    #[test]
    fn reregister_after_unregister() {
        let log = new_log();
        let mut coord = coordinator();
        let receiver = logging(&log, "r");
        let first = coord.register(Rc::clone(&receiver), 0).unwrap();
        coord.unregister(first).unwrap();
        let second = coord.register(receiver, 0).unwrap();
        assert_ne!(first, second);
        assert!(coord.contains(second));
    }

    #[test]
    fn fixed_tick_resets_stolen_time() {
        let mut coord = coordinator();
        coord.report_variable_tick(0.007).unwrap();
        coord.report_variable_tick(0.007).unwrap();
        assert!(coord.total_stolen_time() > 0.0);

        let report = coord.report_fixed_tick();
        assert_eq!(coord.total_stolen_time(), 0.0);
        assert!(coord.fixed_last());
        assert_eq!(report.kind, TickKind::Fixed);
        assert_eq!(report.hybrid_delta, Some(0.02));
    }

    #[test]
    fn variable_after_fixed_is_skipped() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "r"), 0).unwrap();

        coord.report_fixed_tick();
        let report = coord.report_variable_tick(0.01).unwrap();

        assert_eq!(report.hybrid_delta, None);
        assert_eq!(report.invoked, 0);
        assert!(!coord.fixed_last());
        assert_eq!(log.borrow().len(), 1, "only the fixed pass ran");
    }

    #[test]
    fn first_variable_tick_gets_full_interval() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "r"), 0).unwrap();

        let report = coord.report_variable_tick(0.016).unwrap();
        assert_eq!(report.hybrid_delta, Some(0.02));
        assert!((coord.total_stolen_time() - 0.016).abs() < EPS);
    }

    #[test]
    fn variable_deltas_shrink_to_zero() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "r"), 0).unwrap();

        coord.report_fixed_tick();
        for _ in 0..8 {
            coord.report_variable_tick(0.004).unwrap();
        }

        // One fixed pass, one skipped variable tick, seven variable passes.
        let seen = deltas(&log);
        assert_eq!(seen.len(), 8);
        let variable = &seen[1..];
        for pair in variable.windows(2) {
            assert!(pair[1] <= pair[0], "deltas must not grow: {seen:?}");
        }
        assert!(variable.iter().all(|dt| *dt >= 0.0));
        assert_eq!(*variable.last().unwrap(), 0.0);
        assert_eq!(coord.total_stolen_time(), 0.02, "stolen time is clamped");
    }

    #[test]
    fn worked_scenario() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "r"), 0).unwrap();

        let pass1 = coord.report_fixed_tick();
        assert_eq!(pass1.hybrid_delta, Some(0.02));
        assert_eq!(coord.total_stolen_time(), 0.0);

        let skip = coord.report_variable_tick(0.005).unwrap();
        assert_eq!(skip.hybrid_delta, None);
        assert!((coord.total_stolen_time() - 0.005).abs() < EPS);

        let pass2 = coord.report_variable_tick(0.005).unwrap();
        assert!((pass2.hybrid_delta.unwrap() - 0.015).abs() < EPS);
        assert!((coord.total_stolen_time() - 0.01).abs() < EPS);

        let pass3 = coord.report_fixed_tick();
        assert_eq!(pass3.hybrid_delta, Some(0.02));
        assert_eq!(coord.total_stolen_time(), 0.0);

        assert_eq!(log.borrow().len(), 3);
        assert_eq!(
            [pass1.tick_index, skip.tick_index, pass2.tick_index, pass3.tick_index],
            [0, 1, 2, 3]
        );
    }

    #[test]
    fn invalid_elapsed_leaves_state_untouched() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "r"), 0).unwrap();
        coord.report_variable_tick(0.005).unwrap();
        let stolen = coord.total_stolen_time();
        let ticks = coord.tick_count();

        for bad in [-0.001, f64::NAN, f64::INFINITY] {
            assert!(coord.report_variable_tick(bad).is_err());
        }
        assert_eq!(coord.total_stolen_time(), stolen);
        assert_eq!(coord.tick_count(), ticks);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn passes_with_no_receivers_still_account_time() {
        let mut coord = coordinator();
        let report = coord.report_fixed_tick();
        assert_eq!(report.invoked, 0);
        assert!(coord.fixed_last());
        assert_eq!(coord.stats().fixed_passes, 1);
    }

    #[test]
    fn stats_track_delivered_time() {
        let mut coord = coordinator();
        coord.report_fixed_tick();
        coord.report_variable_tick(0.005).unwrap();
        coord.report_variable_tick(0.005).unwrap();
        coord.report_fixed_tick();

        let stats = coord.stats();
        assert_eq!(stats.fixed_passes, 2);
        assert_eq!(stats.variable_passes, 1);
        assert_eq!(stats.skipped_variable_ticks, 1);
        assert!((stats.delivered - 0.055).abs() < EPS);
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn pass_panics_on_borrowed_receiver() {
        let log = new_log();
        let mut coord = coordinator();
        let receiver = logging(&log, "held");
        coord.register(Rc::clone(&receiver), 0).unwrap();

        let _held = receiver.borrow_mut();
        coord.report_fixed_tick();
    }

    #[test]
    fn reset_timing_forgets_fixed_last() {
        let log = new_log();
        let mut coord = coordinator();
        coord.register(logging(&log, "r"), 0).unwrap();
        coord.report_fixed_tick();
        coord.reset_timing();

        let report = coord.report_variable_tick(0.01).unwrap();
        assert_eq!(report.hybrid_delta, Some(0.02));
        assert_eq!(coord.len(), 1);
    }
}
