// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Predicate-keyed fan-out over one mutation observation.
//!
//! A [`MutationWatcher`] owns (at most) one observer on a [`Document`] and a
//! list of subscriptions. Each record handed to [`MutationWatcher::dispatch`]
//! is offered to every subscription in registration order; subscriptions
//! whose predicate accepts the record get their callback invoked. Callbacks
//! run strictly one after another, and each record is fully fanned out
//! before the next one, so no two mutation-triggered callbacks ever overlap.
//!
//! Callbacks receive a caller-owned context `C` (typically the engine state
//! that owns the watcher) and may fail. A failing callback is logged and
//! counted; it does not stop delivery to later subscribers or records.
//!
//! ```
//! use diagram_zoom_dom::{Document, MutationWatcher, ObserveOptions};
//!
//! let mut doc = Document::new();
//! let mut watcher: MutationWatcher<Vec<&'static str>, String> = MutationWatcher::new();
//! let root = doc.root();
//! watcher.attach(&mut doc, root, ObserveOptions::class_attribute().with_subtree());
//! watcher.subscribe(
//!     |r| r.attribute_name() == Some("class"),
//!     |seen, _| {
//!         seen.push("class");
//!         Ok(())
//!     },
//! );
//!
//! let el = doc.create_element("div");
//! doc.append_child(doc.root(), el);
//! doc.add_class(el, "folded");
//!
//! let mut seen = Vec::new();
//! let records = doc.take_records_for(watcher.observer().unwrap());
//! watcher.dispatch(&mut seen, &records);
//! assert_eq!(seen, ["class"]);
//! ```

use core::fmt;

use crate::document::Document;
use crate::mutation::{MutationRecord, ObserveOptions};
use crate::types::{NodeId, ObserverId};

/// Handle of a subscription, used to unsubscribe.
///
/// Every [`MutationWatcher::subscribe`] call yields a distinct handle, so two
/// subscriptions with identical predicates are still independent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Counts from one [`MutationWatcher::dispatch`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Callback invocations that returned `Ok`.
    pub delivered: usize,
    /// Callback invocations that returned `Err` (logged and skipped).
    pub failed: usize,
}

type Predicate = Box<dyn Fn(&MutationRecord) -> bool>;
type Callback<C, E> = Box<dyn FnMut(&mut C, &MutationRecord) -> Result<(), E>>;

struct Subscription<C, E> {
    id: SubscriptionId,
    predicate: Predicate,
    callback: Callback<C, E>,
}

/// Subscribe/unsubscribe registry over one document observer.
pub struct MutationWatcher<C, E> {
    observer: Option<ObserverId>,
    subscriptions: Vec<Subscription<C, E>>,
    next_id: u64,
}

impl<C, E> Default for MutationWatcher<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for MutationWatcher<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationWatcher")
            .field("observer", &self.observer)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl<C, E> MutationWatcher<C, E> {
    /// Creates a detached watcher with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observer: None,
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }

    /// Starts observing `target`, replacing any previous observation.
    pub fn attach(&mut self, doc: &mut Document, target: NodeId, options: ObserveOptions) {
        if let Some(old) = self.observer.take() {
            doc.disconnect(old);
        }
        self.observer = Some(doc.observe(target, options));
    }

    /// Returns the underlying observer, if attached.
    #[must_use]
    pub fn observer(&self) -> Option<ObserverId> {
        self.observer
    }

    /// Registers a callback for records accepted by `predicate`.
    pub fn subscribe(
        &mut self,
        predicate: impl Fn(&MutationRecord) -> bool + 'static,
        callback: impl FnMut(&mut C, &MutationRecord) -> Result<(), E> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            predicate: Box::new(predicate),
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Disconnects the observer and clears every subscription.
    pub fn teardown(&mut self, doc: &mut Document) {
        if let Some(observer) = self.observer.take() {
            doc.disconnect(observer);
        }
        self.subscriptions.clear();
    }
}

impl<C, E: fmt::Display> MutationWatcher<C, E> {
    /// Delivers records to matching subscriptions, in record order and then
    /// registration order.
    pub fn dispatch(&mut self, ctx: &mut C, records: &[MutationRecord]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for record in records {
            for sub in &mut self.subscriptions {
                if !(sub.predicate)(record) {
                    continue;
                }
                match (sub.callback)(ctx, record) {
                    Ok(()) => report.delivered += 1,
                    Err(err) => {
                        report.failed += 1;
                        tracing::warn!(
                            subscription = sub.id.0,
                            target = ?record.target,
                            error = %err,
                            "mutation subscriber failed"
                        );
                    }
                }
            }
        }
        report
    }
}
