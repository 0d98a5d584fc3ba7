// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control panels: one generic builder fed by a per-kind button list.
//!
//! Each panel is a `div.diagram-panel.diagram-<kind>-panel` inside the
//! container, holding `button` elements whose `data-action` attribute names a
//! [`PanelAction`]. Clicks are routed back through that attribute, so the
//! document stays the single source of truth for which buttons exist.

use core::fmt;

use kurbo::Vec2;

use diagram_zoom_dom::{Document, NodeId};
use diagram_zoom_event_state::keys::{PAN_STEP, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

use crate::settings::PanelPosition;
use crate::state::ContainerState;

/// Class shared by every panel element.
pub const PANEL_CLASS: &str = "diagram-panel";

/// Class on panels hidden by the visibility rules.
pub const HIDDEN_CLASS: &str = "hidden";

/// The four panel kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelKind {
    /// Pan buttons.
    Move,
    /// Zoom buttons.
    Zoom,
    /// Fold toggle.
    Fold,
    /// Hide, fullscreen and touch toggles.
    Service,
}

impl PanelKind {
    /// Every kind, in creation order. The fold panel comes first so other
    /// panels can rely on it.
    pub const ALL: [Self; 4] = [Self::Fold, Self::Move, Self::Zoom, Self::Service];

    /// Short name used in class names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Zoom => "zoom",
            Self::Fold => "fold",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a panel button does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelAction {
    /// Pan up.
    MoveUp,
    /// Pan down.
    MoveDown,
    /// Pan left.
    MoveLeft,
    /// Pan right.
    MoveRight,
    /// Pan up and left.
    MoveUpLeft,
    /// Pan up and right.
    MoveUpRight,
    /// Pan down and left.
    MoveDownLeft,
    /// Pan down and right.
    MoveDownRight,
    /// Zoom in one step.
    ZoomIn,
    /// Reset to fit.
    ZoomReset,
    /// Zoom out one step.
    ZoomOut,
    /// Fold or expand.
    ToggleFold,
    /// Hide or show panels.
    TogglePanels,
    /// Enter or leave fullscreen.
    ToggleFullscreen,
    /// Leave touches to the host, or take them back.
    ToggleNativeTouch,
}

impl PanelAction {
    const ALL: [Self; 15] = [
        Self::MoveUp,
        Self::MoveDown,
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveUpLeft,
        Self::MoveUpRight,
        Self::MoveDownLeft,
        Self::MoveDownRight,
        Self::ZoomIn,
        Self::ZoomReset,
        Self::ZoomOut,
        Self::ToggleFold,
        Self::TogglePanels,
        Self::ToggleFullscreen,
        Self::ToggleNativeTouch,
    ];

    /// Value of the button's `data-action` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MoveUp => "move-up",
            Self::MoveDown => "move-down",
            Self::MoveLeft => "move-left",
            Self::MoveRight => "move-right",
            Self::MoveUpLeft => "move-up-left",
            Self::MoveUpRight => "move-up-right",
            Self::MoveDownLeft => "move-down-left",
            Self::MoveDownRight => "move-down-right",
            Self::ZoomIn => "zoom-in",
            Self::ZoomReset => "zoom-reset",
            Self::ZoomOut => "zoom-out",
            Self::ToggleFold => "toggle-fold",
            Self::TogglePanels => "toggle-panels",
            Self::ToggleFullscreen => "toggle-fullscreen",
            Self::ToggleNativeTouch => "toggle-native-touch",
        }
    }

    /// Parses a `data-action` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }

    /// Pan delta of the move actions.
    #[must_use]
    pub fn move_delta(self) -> Option<Vec2> {
        let (x, y) = match self {
            Self::MoveUp => (0.0, -1.0),
            Self::MoveDown => (0.0, 1.0),
            Self::MoveLeft => (-1.0, 0.0),
            Self::MoveRight => (1.0, 0.0),
            Self::MoveUpLeft => (-1.0, -1.0),
            Self::MoveUpRight => (1.0, -1.0),
            Self::MoveDownLeft => (-1.0, 1.0),
            Self::MoveDownRight => (1.0, 1.0),
            _ => return None,
        };
        Some(Vec2::new(x, y) * PAN_STEP)
    }

    /// Zoom factor of the zoom step actions.
    #[must_use]
    pub fn zoom_factor(self) -> Option<f64> {
        match self {
            Self::ZoomIn => Some(ZOOM_IN_FACTOR),
            Self::ZoomOut => Some(ZOOM_OUT_FACTOR),
            _ => None,
        }
    }
}

/// One button of a panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanelButton {
    /// Routed action.
    pub action: PanelAction,
    /// Icon name.
    pub icon: &'static str,
    /// Tooltip and accessible label.
    pub tooltip: &'static str,
}

const fn button(action: PanelAction, icon: &'static str, tooltip: &'static str) -> PanelButton {
    PanelButton {
        action,
        icon,
        tooltip,
    }
}

/// The fold button as it should look for a fold state.
#[must_use]
pub fn fold_button(folded: bool) -> PanelButton {
    if folded {
        button(PanelAction::ToggleFold, "maximize", "Expand diagram")
    } else {
        button(PanelAction::ToggleFold, "minimize", "Fold diagram")
    }
}

fn panels_button(visible: bool) -> PanelButton {
    if visible {
        button(PanelAction::TogglePanels, "eye-off", "Hide panels")
    } else {
        button(PanelAction::TogglePanels, "eye", "Show panels")
    }
}

fn fullscreen_button(fullscreen: bool) -> PanelButton {
    if fullscreen {
        button(PanelAction::ToggleFullscreen, "minimize-2", "Exit fullscreen")
    } else {
        button(PanelAction::ToggleFullscreen, "maximize-2", "Open in fullscreen")
    }
}

fn touch_button(native: bool) -> PanelButton {
    if native {
        button(PanelAction::ToggleNativeTouch, "hand", "Enable diagram touch")
    } else {
        button(PanelAction::ToggleNativeTouch, "pointer-off", "Use native touch")
    }
}

/// Buttons of a panel kind for the container's current state.
#[must_use]
pub fn buttons(kind: PanelKind, container: &ContainerState, mobile: bool) -> Vec<PanelButton> {
    match kind {
        PanelKind::Move => vec![
            button(PanelAction::MoveUpLeft, "arrow-up-left", "Move up left"),
            button(PanelAction::MoveUp, "arrow-up", "Move up"),
            button(PanelAction::MoveUpRight, "arrow-up-right", "Move up right"),
            button(PanelAction::MoveLeft, "arrow-left", "Move left"),
            button(PanelAction::MoveRight, "arrow-right", "Move right"),
            button(PanelAction::MoveDownLeft, "arrow-down-left", "Move down left"),
            button(PanelAction::MoveDown, "arrow-down", "Move down"),
            button(PanelAction::MoveDownRight, "arrow-down-right", "Move down right"),
        ],
        PanelKind::Zoom => vec![
            button(PanelAction::ZoomIn, "zoom-in", "Zoom in"),
            button(PanelAction::ZoomReset, "refresh-cw", "Reset zoom and position"),
            button(PanelAction::ZoomOut, "zoom-out", "Zoom out"),
        ],
        PanelKind::Fold => vec![fold_button(container.folded)],
        PanelKind::Service => {
            let mut out = vec![
                panels_button(!container.visibility.user_hidden()),
                fullscreen_button(container.fullscreen),
            ];
            if mobile {
                out.push(touch_button(container.native_touch));
            }
            out
        }
    }
}

/// Builds a panel element and appends it to `container`.
pub(crate) fn build(
    doc: &mut Document,
    container: NodeId,
    kind: PanelKind,
    position: PanelPosition,
    buttons: &[PanelButton],
) -> NodeId {
    let panel = doc.create_element("div");
    doc.add_class(panel, PANEL_CLASS);
    doc.add_class(panel, &format!("diagram-{kind}-panel"));
    doc.set_attribute(panel, "data-panel", kind.as_str());
    doc.set_style(panel, "position", "absolute");
    for (property, px) in position.style_pairs() {
        doc.set_style(panel, property, &format!("{px}px"));
    }
    for b in buttons {
        let el = doc.create_element("button");
        doc.add_class(el, "diagram-panel-button");
        doc.set_attribute(el, "data-action", b.action.as_str());
        write_button(doc, el, b);
        doc.append_child(panel, el);
    }
    doc.append_child(container, panel);
    panel
}

fn write_button(doc: &mut Document, el: NodeId, b: &PanelButton) {
    doc.set_attribute(el, "data-icon", b.icon);
    doc.set_attribute(el, "aria-label", b.tooltip);
}

/// Finds the button for `action` inside `panel`.
fn find_button(doc: &Document, panel: NodeId, action: PanelAction) -> Option<NodeId> {
    doc.descendants(panel)
        .into_iter()
        .find(|&d| doc.attribute(d, "data-action").as_deref() == Some(action.as_str()))
}

/// Rewrites the icon and tooltip of the button for `b.action`, if present.
pub(crate) fn refresh_button(doc: &mut Document, panel: Option<NodeId>, b: PanelButton) {
    if let Some(el) = panel.and_then(|p| find_button(doc, p, b.action)) {
        write_button(doc, el, &b);
    }
}

/// Brings every toggle button of a container in line with its state.
pub(crate) fn refresh_toggles(doc: &mut Document, container: &ContainerState) {
    let panels = container.panels;
    refresh_button(doc, panels.fold, fold_button(container.folded));
    refresh_button(
        doc,
        panels.service,
        panels_button(!container.visibility.user_hidden()),
    );
    refresh_button(doc, panels.service, fullscreen_button(container.fullscreen));
    refresh_button(doc, panels.service, touch_button(container.native_touch));
}

/// Shows or hides the non-fold panels per the container's visibility rules.
///
/// Returns the new visibility if it changed.
pub(crate) fn apply_visibility(doc: &mut Document, container: &mut ContainerState) -> Option<bool> {
    let visible = container.visibility.visible();
    for (kind, panel) in container.panels.iter() {
        if kind != PanelKind::Fold {
            doc.toggle_class(panel, HIDDEN_CLASS, Some(!visible));
        }
    }
    if visible == container.panels_visible {
        return None;
    }
    container.panels_visible = visible;
    Some(visible)
}

/// Returns the action of a panel button at or above `target`, if any.
pub(crate) fn action_at(doc: &Document, target: NodeId) -> Option<PanelAction> {
    inclusive_ancestors(doc, target)
        .filter(|&n| doc.tag(n) == Some("button"))
        .find_map(|n| PanelAction::parse(&doc.attribute(n, "data-action")?))
}

/// Returns `true` if `target` is inside a panel.
pub(crate) fn is_in_panel(doc: &Document, target: NodeId) -> bool {
    inclusive_ancestors(doc, target).any(|n| doc.has_class(n, PANEL_CLASS))
}

fn inclusive_ancestors(doc: &Document, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    doc.is_alive(node)
        .then_some(node)
        .into_iter()
        .chain(doc.ancestors(node))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_round_trip_through_data_attribute() {
        for action in PanelAction::ALL {
            assert_eq!(PanelAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(PanelAction::parse("explode"), None);
    }

    #[test]
    fn move_deltas_follow_the_arrow() {
        assert_eq!(
            PanelAction::MoveUp.move_delta(),
            Some(Vec2::new(0.0, -PAN_STEP))
        );
        assert_eq!(
            PanelAction::MoveDownLeft.move_delta(),
            Some(Vec2::new(-PAN_STEP, PAN_STEP))
        );
        assert_eq!(PanelAction::ZoomIn.move_delta(), None);
        assert_eq!(PanelAction::ZoomOut.zoom_factor(), Some(ZOOM_OUT_FACTOR));
    }

    #[test]
    fn fold_icon_tracks_state() {
        assert_eq!(fold_button(true).icon, "maximize");
        assert_eq!(fold_button(true).tooltip, "Expand diagram");
        assert_eq!(fold_button(false).icon, "minimize");
        assert_eq!(fold_button(false).tooltip, "Fold diagram");
    }

    #[test]
    fn built_panel_routes_clicks() {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc.create_element("div");
        doc.append_child(root, container);
        let panel = build(
            &mut doc,
            container,
            PanelKind::Zoom,
            PanelPosition {
                top: Some(5.0),
                ..PanelPosition::default()
            },
            &[button(PanelAction::ZoomIn, "zoom-in", "Zoom in")],
        );
        assert!(doc.has_class(panel, "diagram-zoom-panel"));
        assert_eq!(doc.style(panel, "top"), Some("5px"));
        let b = doc.children(panel)[0];
        assert_eq!(action_at(&doc, b), Some(PanelAction::ZoomIn));
        assert!(is_in_panel(&doc, b));
        assert_eq!(action_at(&doc, container), None);
        assert!(!is_in_panel(&doc, container));
    }
}
