// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram Zoom DOM: a headless mirror of the host document.
//!
//! The container engine never talks to a browser DOM directly. The host
//! adapter mirrors the parts of its document the engine cares about into a
//! [`Document`] and replays user input against it. In return the engine gets
//! a deterministic, testable tree with:
//!
//! - Generational element handles ([`NodeId`]); a stale handle never aliases
//!   a live element.
//! - Classes, attributes, inline style properties and a host-reported layout
//!   size per element.
//! - A small CSS selector subset ([`SelectorList`]) for descriptor selectors.
//! - Mutation observation with the platform contract: records are queued per
//!   observer at mutation time, [`Document::disconnect`] drops pending
//!   records, and [`Document::take_records`] drains them in observer
//!   creation order.
//! - A [`MutationWatcher`] that fans one observation out to predicate-keyed
//!   subscribers, sequentially and in registration order.
//!
//! ## Minimal example
//!
//! ```rust
//! use diagram_zoom_dom::{Document, ObserveOptions, SelectorList};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let observer = doc.observe(root, ObserveOptions::child_list_subtree());
//!
//! let block = doc.create_element("div");
//! doc.add_class(block, "mermaid");
//! let svg = doc.create_element("svg");
//! doc.append_child(block, svg);
//! doc.append_child(root, block);
//!
//! let batches = doc.take_records();
//! assert_eq!(batches.len(), 1);
//! assert_eq!(batches[0].0, observer);
//!
//! let selector = SelectorList::parse(".mermaid svg").unwrap();
//! assert_eq!(doc.query_selector(root, &selector), Some(svg));
//! ```

mod document;
mod mutation;
mod selector;
mod serialize;
mod types;
mod watcher;

pub use document::{Document, NodeKind};
pub use mutation::{MutationKind, MutationRecord, ObserveOptions};
pub use selector::{SelectorError, SelectorList};
pub use types::{NodeId, ObserverId};
pub use watcher::{DispatchReport, MutationWatcher, SubscriptionId};
