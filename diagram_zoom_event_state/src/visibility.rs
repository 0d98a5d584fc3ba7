// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel visibility: one place where the independent rules are composed.
//!
//! Three mechanisms can hide a container's control panels:
//!
//! - the container is folded;
//! - the user hid the panels explicitly (service panel or command);
//! - "hide on mouse out" is enabled and the pointer is outside the container.
//!
//! Each mechanism only ever contributes a "hide" vote. Panels are shown when
//! nobody votes to hide them, so folding and hovering never fight: unfolding
//! a container while the pointer is outside leaves the panels hidden, and
//! moving the pointer back in shows them again.
//!
//! ```
//! use diagram_zoom_event_state::visibility::PanelVisibility;
//!
//! let mut v = PanelVisibility::new(true);
//! v.pointer_enter();
//! assert!(v.visible());
//! v.set_folded(true);
//! assert!(!v.visible());
//! v.set_folded(false);
//! assert!(v.visible());
//! ```

/// Inputs deciding whether non-fold panels of one container are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelVisibility {
    folded: bool,
    user_hidden: bool,
    hide_on_mouse_out: bool,
    pointer_inside: bool,
}

impl PanelVisibility {
    /// Creates the visibility state for a new, expanded container.
    #[must_use]
    pub fn new(hide_on_mouse_out: bool) -> Self {
        Self {
            hide_on_mouse_out,
            ..Self::default()
        }
    }

    /// Returns `true` if non-fold panels should be shown.
    #[must_use]
    pub fn visible(&self) -> bool {
        !self.folded && !self.user_hidden && (!self.hide_on_mouse_out || self.pointer_inside)
    }

    /// Records that the pointer entered the container.
    pub fn pointer_enter(&mut self) {
        self.pointer_inside = true;
    }

    /// Records that the pointer left the container.
    pub fn pointer_leave(&mut self) {
        self.pointer_inside = false;
    }

    /// Sets the fold vote.
    pub fn set_folded(&mut self, folded: bool) {
        self.folded = folded;
    }

    /// Returns the fold vote.
    #[must_use]
    pub fn folded(&self) -> bool {
        self.folded
    }

    /// Flips the explicit user vote and returns the new visibility.
    pub fn toggle_user_hidden(&mut self) -> bool {
        self.user_hidden = !self.user_hidden;
        self.visible()
    }

    /// Returns the explicit user vote.
    #[must_use]
    pub fn user_hidden(&self) -> bool {
        self.user_hidden
    }

    /// Enables or disables the mouse-out rule.
    pub fn set_hide_on_mouse_out(&mut self, enabled: bool) {
        self.hide_on_mouse_out = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::PanelVisibility;

    #[test]
    fn default_expanded_container_shows_panels() {
        assert!(PanelVisibility::new(false).visible());
        // With the mouse-out rule, panels wait for the pointer.
        assert!(!PanelVisibility::new(true).visible());
    }

    #[test]
    fn fold_hides_regardless_of_pointer() {
        let mut v = PanelVisibility::new(true);
        v.set_folded(true);
        v.pointer_enter();
        assert!(!v.visible());
        v.pointer_leave();
        assert!(!v.visible());
    }

    #[test]
    fn unfold_reverts_to_pointer_rule() {
        let mut v = PanelVisibility::new(true);
        v.set_folded(true);
        v.set_folded(false);
        assert!(!v.visible(), "pointer is outside");
        v.pointer_enter();
        assert!(v.visible());
    }

    #[test]
    fn user_vote_is_independent() {
        let mut v = PanelVisibility::new(false);
        assert!(!v.toggle_user_hidden());
        v.set_folded(true);
        v.set_folded(false);
        assert!(!v.visible(), "unfolding does not undo an explicit hide");
        assert!(v.toggle_user_hidden());
    }
}
