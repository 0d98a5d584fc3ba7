// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram Zoom View: pan, zoom and fit geometry for diagram containers.
//!
//! This crate provides a small, headless model of the transform applied to a
//! rendered diagram inside its container. All coordinates are container-local
//! CSS pixels with the transform origin at the container's top-left corner.
//! It focuses on:
//! - Pan offset + uniform zoom state ([`DiagramTransform`]).
//! - Zoom that keeps a focal point stationary (container center for discrete
//!   steps, cursor position for wheel input).
//! - Fitting a diagram into its container without upscaling.
//! - Rendering the state as CSS `transform` / `transition` values.
//!
//! It does **not** own any element tree or input handling. Callers are
//! expected to:
//! - Measure the container and the diagram's layout size.
//! - Translate input into deltas and factors at a higher layer.
//! - Write [`DiagramTransform::css`] into the diagram element's style.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use diagram_zoom_view::{DiagramTransform, MIN_SCALE};
//!
//! let container = Size::new(400.0, 300.0);
//! let mut t = DiagramTransform::default();
//!
//! // Fit an 800x300 diagram: scaled down to half size and centered vertically.
//! t.fit(container, Size::new(800.0, 300.0));
//! assert_eq!(t.scale(), 0.5);
//! assert_eq!(t.translate(), Vec2::new(0.0, 75.0));
//!
//! // Discrete zoom around the container center.
//! t.zoom_about(Point::new(200.0, 150.0), 2.0);
//! assert_eq!(t.scale(), 1.0);
//!
//! // Zoom never goes below the floor.
//! t.zoom_about(Point::new(200.0, 150.0), 1e-6);
//! assert_eq!(t.scale(), MIN_SCALE);
//! ```
//!
//! ## Origin convention
//!
//! Every operation in this crate assumes `transform-origin: 0 0`. The
//! center-preserving zoom is expressed in those coordinates by converting the
//! focal point into diagram space before rescaling, so fit and zoom can be
//! applied to the same CSS `transform` property without drift.
//!
//! This crate is `no_std`.

#![no_std]

mod transform;
mod transition;

pub use transform::{CssTransform, DiagramTransform, MIN_SCALE};
pub use transition::{Easing, Transition};
