// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram Zoom Event State: small state machines for diagram interactions.
//!
//! Each module handles one interaction pattern that needs state across
//! several input events:
//!
//! - [`drag`]: one-pointer drags anchored at the pan offset the drag started from.
//! - [`pinch`]: two-finger pinches reporting per-frame distance ratios.
//! - [`wheel`]: when a wheel event zooms, and by how much.
//! - [`keys`]: keyboard shortcuts mapped to pan/zoom/fit actions.
//! - [`visibility`]: composition of the rules that show or hide control panels.
//!
//! The managers accept raw positions, modifiers and flags and return deltas
//! or actions. They know nothing about elements, containers or the host;
//! the `diagram_zoom` crate wires them to concrete containers.
//!
//! ## Drag
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use diagram_zoom_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! // Pan offset was (10, 10) when the button went down at (100, 100).
//! drag.start(Point::new(100.0, 100.0), Vec2::new(10.0, 10.0));
//! assert_eq!(drag.update(Point::new(130.0, 80.0)), Some(Vec2::new(40.0, -10.0)));
//! assert_eq!(drag.end(), Some(Vec2::new(30.0, -20.0)));
//! ```
//!
//! ## Keys
//!
//! ```rust
//! use diagram_zoom_event_state::input::{Key, Modifiers};
//! use diagram_zoom_event_state::keys::{KeyAction, key_action};
//!
//! assert_eq!(key_action(&Key::Character('='), Modifiers::CTRL), Some(KeyAction::Zoom(1.1)));
//! assert_eq!(key_action(&Key::Character('='), Modifiers::empty()), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod drag;
pub mod input;
pub mod keys;
pub mod pinch;
pub mod visibility;
pub mod wheel;
