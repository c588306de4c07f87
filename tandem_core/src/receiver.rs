// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The callback capability invoked on every coordinator pass.
//!
//! Anything that wants hybrid updates implements [`TimeStepReceiver`]. Plain
//! `FnMut(f64)` closures implement it through a blanket impl, so a closure can
//! be registered directly:
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//!
//! use tandem_core::config::CoordinatorConfig;
//! use tandem_core::coordinator::HybridCoordinator;
//!
//! let mut coordinator = HybridCoordinator::new(CoordinatorConfig::HZ_50);
//! let total = Rc::new(RefCell::new(0.0_f64));
//! let sink = Rc::clone(&total);
//! let receiver = Rc::new(RefCell::new(move |dt: f64| *sink.borrow_mut() += dt));
//! let id = coordinator.register(Rc::clone(&receiver), 0).unwrap();
//!
//! coordinator.report_fixed_tick();
//! assert!((*total.borrow() - 0.02).abs() < 1e-12);
//!
//! coordinator.unregister(id).unwrap();
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;

/// Receives the hybrid delta time once per coordinator pass.
pub trait TimeStepReceiver {
    /// Called with the time slice, in seconds, this receiver should treat as
    /// elapsed. Never negative.
    fn on_hybrid_update(&mut self, delta: f64);
}

impl<F> TimeStepReceiver for F
where
    F: FnMut(f64),
{
    fn on_hybrid_update(&mut self, delta: f64) {
        self(delta);
    }
}

/// A type-erased, shared receiver as stored by the registry.
///
/// The caller keeps its own clone; registration identity is the address of
/// the shared cell.
pub type Receiver = Rc<RefCell<dyn TimeStepReceiver>>;

/// Returns the thin address identifying a receiver cell.
///
/// Two [`Receiver`]s are the same callback if and only if their addresses
/// match. Vtable pointers are ignored since they are not guaranteed unique.
#[inline]
#[must_use]
pub fn receiver_addr(receiver: &Receiver) -> *const () {
    Rc::as_ptr(receiver).cast::<()>()
}
