// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Size, Vec2};

/// Smallest zoom factor any operation may produce.
pub const MIN_SCALE: f64 = 0.125;

/// Pan offset and uniform zoom of a diagram inside its container.
///
/// The transform maps a diagram-space point `p` to container space as
/// `translate + p * scale`, i.e. CSS `translate(..) scale(..)` with the
/// transform origin at the top-left corner.
///
/// The scale is floored at [`MIN_SCALE`]; there is no ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagramTransform {
    translate: Vec2,
    scale: f64,
}

impl Default for DiagramTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DiagramTransform {
    /// No pan, unit zoom.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// Creates a transform, flooring `scale` at [`MIN_SCALE`].
    ///
    /// Non-finite scales fall back to `1.0`.
    #[must_use]
    pub fn new(translate: Vec2, scale: f64) -> Self {
        Self {
            translate,
            scale: floor_scale(scale),
        }
    }

    /// Returns the pan offset in container pixels.
    #[must_use]
    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Returns the zoom factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Replaces the pan offset.
    pub fn set_translate(&mut self, translate: Vec2) {
        self.translate = translate;
    }

    /// Replaces the zoom factor, flooring it at [`MIN_SCALE`].
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = floor_scale(scale);
    }

    /// Pans by `delta` container pixels.
    pub fn move_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Multiplies the zoom by `factor`, keeping `focal` (container space) fixed.
    ///
    /// The diagram point under `focal` before the zoom stays under `focal`
    /// afterwards, unless the [`MIN_SCALE`] floor kicks in. Non-positive or
    /// non-finite factors are ignored.
    pub fn zoom_about(&mut self, focal: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        self.rescale_about(focal, self.scale * factor);
    }

    /// Adds `delta` to the zoom, keeping `cursor` (container space) fixed.
    ///
    /// This is the wheel variant: the wheel delta is additive in scale units
    /// rather than multiplicative.
    pub fn zoom_at_cursor(&mut self, cursor: Point, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.rescale_about(cursor, self.scale + delta);
    }

    /// Fits a diagram of layout size `diagram` into `container`, centered.
    ///
    /// The resulting scale is `min(cw / dw, ch / dh, 1)`: content is shrunk to
    /// fit but never enlarged past 1:1. Returns `false` (leaving the transform
    /// untouched) if either size is empty.
    pub fn fit(&mut self, container: Size, diagram: Size) -> bool {
        if !is_positive(container) || !is_positive(diagram) {
            return false;
        }
        let sx = container.width / diagram.width;
        let sy = container.height / diagram.height;
        let scale = floor_scale(sx.min(sy).min(1.0));
        let scaled = diagram * scale;
        self.scale = scale;
        self.translate = Vec2::new(
            (container.width - scaled.width) / 2.0,
            (container.height - scaled.height) / 2.0,
        );
        true
    }

    /// Maps a diagram-space point into container space.
    #[must_use]
    pub fn to_container(&self, pt: Point) -> Point {
        self.to_affine() * pt
    }

    /// Maps a container-space point into diagram space.
    #[must_use]
    pub fn to_diagram(&self, pt: Point) -> Point {
        ((pt.to_vec2() - self.translate) / self.scale).to_point()
    }

    /// Returns the equivalent affine map (diagram → container).
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Returns a [`fmt::Display`] adapter producing the CSS `transform` value.
    #[must_use]
    pub fn css(&self) -> CssTransform {
        CssTransform(*self)
    }

    fn rescale_about(&mut self, focal: Point, new_scale: f64) {
        let offset = self.to_diagram(focal).to_vec2();
        self.scale = floor_scale(new_scale);
        self.translate = focal.to_vec2() - offset * self.scale;
    }
}

/// CSS rendering of a [`DiagramTransform`]: `translate(Xpx, Ypx) scale(S)`.
#[derive(Clone, Copy, Debug)]
pub struct CssTransform(DiagramTransform);

impl fmt::Display for CssTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0.translate;
        write!(f, "translate({}px, {}px) scale({})", t.x, t.y, self.0.scale)
    }
}

fn floor_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.max(MIN_SCALE)
}

fn is_positive(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}
