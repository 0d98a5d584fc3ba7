// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS transition descriptions for animated transform changes.

use core::fmt;

/// Timing function of a [`Transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Easing {
    /// `linear`
    Linear,
    /// `ease-out`
    #[default]
    EaseOut,
}

impl Easing {
    fn as_css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOut => "ease-out",
        }
    }
}

/// A one-shot CSS transition on the `transform` property.
///
/// Rendered through [`fmt::Display`] as the value of the `transition` style
/// property, e.g. `transform 0.3s ease-out`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Timing function.
    pub easing: Easing,
}

impl Transition {
    /// The animation used for button and keyboard driven moves and zooms.
    pub const TRANSFORM: Self = Self {
        duration_ms: 300,
        easing: Easing::EaseOut,
    };
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.duration_ms / 1000;
        let millis = self.duration_ms % 1000;
        if millis == 0 {
            write!(f, "transform {secs}s {}", self.easing.as_css())
        } else {
            // Trim trailing zeros: 300 -> "0.3", 250 -> "0.25".
            let mut frac = millis;
            let mut width = 3;
            while frac % 10 == 0 {
                frac /= 10;
                width -= 1;
            }
            write!(
                f,
                "transform {secs}.{frac:0width$}s {}",
                self.easing.as_css()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::{Easing, Transition};

    #[test]
    fn default_transition_renders_css() {
        assert_eq!(
            Transition::TRANSFORM.to_string(),
            "transform 0.3s ease-out"
        );
    }

    #[test]
    fn fractional_and_whole_durations() {
        let t = Transition {
            duration_ms: 1050,
            easing: Easing::Linear,
        };
        assert_eq!(t.to_string(), "transform 1.05s linear");

        let t = Transition {
            duration_ms: 2000,
            easing: Easing::EaseOut,
        };
        assert_eq!(t.to_string(), "transform 2s ease-out");

        let t = Transition {
            duration_ms: 5,
            easing: Easing::EaseOut,
        };
        assert_eq!(t.to_string(), "transform 0.005s ease-out");
    }
}
