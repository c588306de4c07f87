// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority-ordered storage for receiver registrations.
//!
//! The coordinator's registry keeps its entries sorted by ascending
//! priority. Entries with equal priority stay in registration order, so
//! insertion behaves like a stable sort on the priority key. Handles ([`RegistrationId`]) are issued
//! from a monotonic counter and never reused.

use alloc::vec::Vec;
use core::fmt;

use crate::receiver::{Receiver, receiver_addr};

/// A handle to a registration held by a
/// [`HybridCoordinator`](crate::coordinator::HybridCoordinator).
///
/// The default value is [`RegistrationId::INVALID`], the null handle, which
/// is never issued.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RegistrationId(pub(crate) u64);

impl RegistrationId {
    /// The null handle.
    pub const INVALID: Self = Self(0);

    /// Returns the raw value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegistrationId({})", self.0)
    }
}

/// One live registration.
pub struct Registration {
    id: RegistrationId,
    owner: &'static str,
    priority: i32,
    receiver: Receiver,
}

impl Registration {
    /// The handle issued for this registration.
    #[must_use]
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Diagnostic tag naming the receiver's type.
    #[must_use]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Ordering key; lower values run first.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn receiver(&self) -> &Receiver {
        &self.receiver
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Registrations sorted by `(priority, registration order)`.
#[derive(Debug)]
pub(crate) struct Registry {
    entries: Vec<Registration>,
    next_id: u64,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no live registrations.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the id of the registration holding `receiver`, if any.
    #[must_use]
    pub(crate) fn find_receiver(&self, receiver: &Receiver) -> Option<RegistrationId> {
        let addr = receiver_addr(receiver);
        self.entries
            .iter()
            .find(|entry| receiver_addr(&entry.receiver) == addr)
            .map(|entry| entry.id)
    }

    /// Looks up a registration by handle.
    #[must_use]
    pub(crate) fn get(&self, id: RegistrationId) -> Option<&Registration> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Inserts a registration after every entry with priority `<= priority`
    /// and returns its new handle.
    ///
    /// Does not check for duplicates; callers go through
    /// [`find_receiver`](Self::find_receiver) first.
    pub(crate) fn insert(
        &mut self,
        receiver: Receiver,
        owner: &'static str,
        priority: i32,
    ) -> RegistrationId {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;

        let at = self.entries.partition_point(|entry| entry.priority <= priority);
        self.entries.insert(
            at,
            Registration {
                id,
                owner,
                priority,
                receiver,
            },
        );
        id
    }

    /// Removes the registration with the given handle, returning it if it
    /// was present. Relative order of the remaining entries is kept.
    pub(crate) fn remove(&mut self, id: RegistrationId) -> Option<Registration> {
        let at = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(at))
    }

    /// Iterates registrations in invocation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Registration> + '_ {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    fn noop() -> Receiver {
        Rc::new(RefCell::new(|_: f64| {}))
    }

    fn order(registry: &Registry) -> Vec<u64> {
        registry.iter().map(|entry| entry.id().get()).collect()
    }

    #[test]
    fn default_handle_is_null() {
        assert_eq!(RegistrationId::default(), RegistrationId::INVALID);
        assert!(!RegistrationId::INVALID.is_valid());
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut registry = Registry::new();
        let a = registry.insert(noop(), "a", 0);
        let b = registry.insert(noop(), "b", 0);
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn sorted_by_priority_then_insertion() {
        let mut registry = Registry::new();
        let a = registry.insert(noop(), "a", 10);
        let b = registry.insert(noop(), "b", -5);
        let c = registry.insert(noop(), "c", 10);
        let d = registry.insert(noop(), "d", 0);
        let e = registry.insert(noop(), "e", -5);

        assert_eq!(
            order(&registry),
            [b.get(), e.get(), d.get(), a.get(), c.get()]
        );
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut registry = Registry::new();
        let a = registry.insert(noop(), "a", 1);
        let b = registry.insert(noop(), "b", 1);
        let c = registry.insert(noop(), "c", 1);

        let removed = registry.remove(b).expect("b is registered");
        assert_eq!(removed.owner(), "b");
        assert_eq!(order(&registry), [a.get(), c.get()]);
        assert!(registry.remove(b).is_none());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut registry = Registry::new();
        let a = registry.insert(noop(), "a", 0);
        registry.remove(a);
        let b = registry.insert(noop(), "b", 0);
        assert_ne!(a, b);
    }

    #[test]
    fn find_receiver_uses_cell_identity() {
        let mut registry = Registry::new();
        let shared = noop();
        let id = registry.insert(Rc::clone(&shared), "shared", 3);

        assert_eq!(registry.find_receiver(&shared), Some(id));
        assert_eq!(registry.find_receiver(&noop()), None);
        assert_eq!(registry.get(id).map(Registration::priority), Some(3));
    }
}
