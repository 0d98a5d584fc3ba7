// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input handling for containers.
//!
//! The host adapter forwards each raw input with the element it hit.
//! Positions are in container coordinates: pixels from the top-left corner
//! of the container the input lands in. Every handler routes the input to
//! the nearest registered container, makes it the active container, acts,
//! and reports whether the host should suppress its default behavior.
//!
//! Handlers compose: a drag, the mouse-out panel rule and the fold state all
//! update the same container without excluding each other.

use kurbo::Point;

use diagram_zoom_dom::{Document, NodeId};
use diagram_zoom_event_state::input::{Key, Modifiers, MouseButton};
use diagram_zoom_event_state::keys::{KeyAction, key_action};
use diagram_zoom_event_state::wheel::wheel_zoom_delta;

use crate::actions;
use crate::engine::DiagramZoom;
use crate::events::DiagramEvent;
use crate::fold::{self, FULLSCREEN_CLASS};
use crate::host::{Host, LeafId};
use crate::id::ContainerId;
use crate::listeners::{Listen, Route};
use crate::panels::{self, PanelAction};
use crate::state::ContainerState;

/// What the host should do with the original input event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Handled {
    /// Suppress the host's default action.
    pub prevent_default: bool,
    /// Stop the event from reaching outer listeners.
    pub stop_propagation: bool,
}

impl Handled {
    /// Not handled; the host proceeds as usual.
    pub const IGNORED: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };
    /// Handled; suppress the default action only.
    pub const PREVENT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };
    /// Handled and consumed.
    pub const CONSUMED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}

/// Kind of a mouse input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    /// A button went down.
    Down(MouseButton),
    /// The pointer moved.
    Move,
    /// A button went up.
    Up,
    /// The pointer entered the element.
    Enter,
    /// The pointer left the element.
    Leave,
}

/// A mouse input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseInput {
    /// What happened.
    pub kind: MouseEventKind,
    /// Element hit.
    pub target: NodeId,
    /// Pointer position in container coordinates.
    pub position: Point,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

/// A wheel input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    /// Element hit.
    pub target: NodeId,
    /// Pointer position in container coordinates.
    pub position: Point,
    /// Vertical wheel delta in pixels; negative is away from the user.
    pub delta_y: f64,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

/// Phase of a touch input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// Touches began.
    Start,
    /// Touches moved.
    Move,
    /// Touches ended.
    End,
    /// The host cancelled the touches.
    Cancel,
}

/// A touch input with the positions of every active touch.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchInput {
    /// Phase.
    pub phase: TouchPhase,
    /// Element hit.
    pub target: NodeId,
    /// Active touches in container coordinates.
    pub touches: Vec<Point>,
}

/// A key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Focused element.
    pub target: NodeId,
    /// Pressed key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

/// Direction of a focus change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusChange {
    /// Focus moved into the element.
    In,
    /// Focus left the element.
    Out,
}

/// A focus change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusInput {
    /// In or out.
    pub change: FocusChange,
    /// Element gaining or losing focus.
    pub target: NodeId,
    /// The other side of the change, if any.
    pub related: Option<NodeId>,
}

fn end_drag(doc: &mut Document, container: &mut ContainerState) -> bool {
    if container.drag.end().is_none() {
        return false;
    }
    doc.remove_style(container.content, "cursor");
    true
}

fn publish_visibility(events: &mut Vec<DiagramEvent>, container: &ContainerState, change: Option<bool>) {
    if let Some(visible) = change {
        events.push(DiagramEvent::PanelsVisibilityChanged {
            leaf: container.leaf,
            id: container.id.clone(),
            visible,
        });
    }
}

impl<H: Host> DiagramZoom<H> {
    /// Routes an input and makes its container active.
    fn begin(&mut self, target: NodeId, kind: Listen) -> Option<Route> {
        if self.is_unloaded() {
            return None;
        }
        let route = self.listeners.route(&self.core.doc, target, kind)?;
        self.core
            .state
            .set_active(route.leaf, &route.id)
            .then_some(route)
    }

    /// Mouse press, move, release, enter and leave.
    ///
    /// A primary press outside the panels starts a drag; moves pan the
    /// diagram to the drag origin plus the aggregate pointer displacement.
    pub fn mouse(&mut self, input: MouseInput) -> Handled {
        let Some(route) = self.begin(input.target, Listen::MOUSE) else {
            return Handled::IGNORED;
        };
        let Some(container) = self.core.state.container_mut(route.leaf, &route.id) else {
            return Handled::IGNORED;
        };
        let doc = &mut self.core.doc;
        let handled = match input.kind {
            MouseEventKind::Down(MouseButton::Primary) => {
                if panels::is_in_panel(doc, input.target) {
                    Handled::IGNORED
                } else {
                    let origin = container.transform.translate();
                    container.drag.start(input.position, origin);
                    doc.set_style(container.content, "cursor", "grabbing");
                    Handled::PREVENT
                }
            }
            MouseEventKind::Down(_) => Handled::IGNORED,
            MouseEventKind::Move => match container.drag.update(input.position) {
                Some(translate) => {
                    actions::pan_to(doc, container, translate);
                    Handled::PREVENT
                }
                None => Handled::IGNORED,
            },
            MouseEventKind::Up => {
                end_drag(doc, container);
                Handled::IGNORED
            }
            MouseEventKind::Enter => {
                container.visibility.pointer_enter();
                let change = panels::apply_visibility(doc, container);
                publish_visibility(&mut self.core.events, container, change);
                Handled::IGNORED
            }
            MouseEventKind::Leave => {
                end_drag(doc, container);
                container.visibility.pointer_leave();
                let change = panels::apply_visibility(doc, container);
                publish_visibility(&mut self.core.events, container, change);
                Handled::IGNORED
            }
        };
        self.pump();
        handled
    }

    /// Wheel zoom anchored at the cursor.
    ///
    /// Zooms only with Ctrl, Cmd or Alt held, or in fullscreen; otherwise the
    /// host scrolls as usual.
    pub fn wheel(&mut self, input: WheelInput) -> Handled {
        let Some(route) = self.begin(input.target, Listen::WHEEL) else {
            return Handled::IGNORED;
        };
        let Some(container) = self.core.state.container_mut(route.leaf, &route.id) else {
            return Handled::IGNORED;
        };
        let Some(delta) = wheel_zoom_delta(input.delta_y, input.modifiers, container.fullscreen)
        else {
            return Handled::IGNORED;
        };
        actions::zoom_at_cursor(&mut self.core.doc, container, input.position, delta);
        self.pump();
        Handled::PREVENT
    }

    /// One-finger drags and two-finger pinches.
    ///
    /// Ignored entirely while the container leaves touches to the host, and
    /// for touches that start on a panel.
    pub fn touch(&mut self, input: TouchInput) -> Handled {
        let Some(route) = self.begin(input.target, Listen::TOUCH) else {
            return Handled::IGNORED;
        };
        let Some(container) = self.core.state.container_mut(route.leaf, &route.id) else {
            return Handled::IGNORED;
        };
        if container.native_touch {
            return Handled::IGNORED;
        }
        let doc = &mut self.core.doc;
        if input.phase == TouchPhase::Start && panels::is_in_panel(doc, input.target) {
            return Handled::IGNORED;
        }
        let handled = match (input.phase, input.touches.as_slice()) {
            (TouchPhase::Start, [p]) => {
                container.pinch.end();
                let origin = container.transform.translate();
                container.drag.start(*p, origin);
                Handled::PREVENT
            }
            (TouchPhase::Start, [a, b, ..]) => {
                end_drag(doc, container);
                container.pinch.start(*a, *b);
                Handled::PREVENT
            }
            (TouchPhase::Move, [p]) => match container.drag.update(*p) {
                Some(translate) => {
                    actions::pan_to(doc, container, translate);
                    Handled::PREVENT
                }
                None => Handled::IGNORED,
            },
            (TouchPhase::Move, [a, b, ..]) => match container.pinch.update(*a, *b) {
                Some(step) => {
                    actions::zoom_about(doc, container, step.focal, step.factor);
                    Handled::PREVENT
                }
                None => Handled::IGNORED,
            },
            (TouchPhase::End | TouchPhase::Cancel, _) => {
                end_drag(doc, container);
                container.pinch.end();
                Handled::IGNORED
            }
            _ => Handled::IGNORED,
        };
        self.pump();
        handled
    }

    /// Keyboard shortcuts of a focused container.
    ///
    /// Only recognized keys are consumed.
    pub fn key(&mut self, input: KeyInput) -> Handled {
        let Some(route) = self.begin(input.target, Listen::KEY) else {
            return Handled::IGNORED;
        };
        let Some(action) = key_action(&input.key, input.modifiers) else {
            return Handled::IGNORED;
        };
        let Some(container) = self.core.state.container_mut(route.leaf, &route.id) else {
            return Handled::IGNORED;
        };
        let doc = &mut self.core.doc;
        match action {
            KeyAction::Pan(delta) => actions::move_by(doc, container, delta, true),
            KeyAction::Zoom(factor) => actions::zoom_by(doc, container, factor, true),
            KeyAction::Fit => {
                actions::fit(doc, container, true);
            }
        }
        self.pump();
        Handled::CONSUMED
    }

    /// Focus moving into or out of a container.
    ///
    /// With auto-fold enabled, focusing a container expands it and moving
    /// focus elsewhere folds it again. Focus moving between elements inside
    /// the same container changes nothing.
    pub fn focus(&mut self, input: FocusInput) -> Handled {
        let Some(route) = self.begin(input.target, Listen::FOCUS) else {
            return Handled::IGNORED;
        };
        if !self.settings.auto_fold_on_focus_change {
            return Handled::IGNORED;
        }
        let doc = &mut self.core.doc;
        let folded = match input.change {
            FocusChange::In => false,
            FocusChange::Out => {
                if input
                    .related
                    .is_some_and(|r| r == route.node || doc.contains(route.node, r))
                {
                    return Handled::IGNORED;
                }
                true
            }
        };
        fold::set_folded(doc, route.node, folded);
        self.pump();
        Handled::IGNORED
    }

    /// A click, routed to the panel button under `target`.
    pub fn click(&mut self, target: NodeId) -> Handled {
        let Some(route) = self.begin(target, Listen::CLICK) else {
            return Handled::IGNORED;
        };
        let Some(action) = panels::action_at(&self.core.doc, target) else {
            return Handled::IGNORED;
        };
        self.run_panel_action(route.leaf, &route.id, action);
        Handled::CONSUMED
    }

    /// The transform transition of a container ended.
    pub fn transition_end(&mut self, target: NodeId) -> Handled {
        let Some(route) = self.begin(target, Listen::TRANSITION) else {
            return Handled::IGNORED;
        };
        if let Some(container) = self.core.state.container(route.leaf, &route.id) {
            actions::clear_transition(&mut self.core.doc, container);
        }
        self.pump();
        Handled::IGNORED
    }

    /// Runs a panel action on a container.
    ///
    /// Returns `false` if the container is not tracked.
    pub fn run_panel_action(&mut self, leaf: LeafId, id: &ContainerId, action: PanelAction) -> bool {
        if self.core.state.container(leaf, id).is_none() {
            return false;
        }
        if let Some(delta) = action.move_delta() {
            return self.move_element(Some((leaf, id)), delta, true);
        }
        if let Some(factor) = action.zoom_factor() {
            return self.zoom_element(Some((leaf, id)), factor, true);
        }
        match action {
            PanelAction::ZoomReset => {
                self.fit_element(Some((leaf, id)), true);
            }
            PanelAction::ToggleFold => {
                if let Some(container) = self.core.state.container(leaf, id) {
                    let (node, folded) = (container.node, container.folded);
                    fold::set_folded(&mut self.core.doc, node, !folded);
                }
            }
            PanelAction::TogglePanels => {
                self.toggle_panels(leaf, id);
            }
            PanelAction::ToggleFullscreen => self.toggle_fullscreen(leaf, id),
            PanelAction::ToggleNativeTouch => {
                if let Some(container) = self.core.state.container_mut(leaf, id) {
                    container.native_touch = !container.native_touch;
                    container.drag.end();
                    container.pinch.end();
                    panels::refresh_toggles(&mut self.core.doc, container);
                }
            }
            _ => {}
        }
        self.pump();
        true
    }

    /// Flips the user-hidden state of a container's panels.
    ///
    /// Returns the resulting visibility.
    pub(crate) fn toggle_panels(&mut self, leaf: LeafId, id: &ContainerId) -> Option<bool> {
        let container = self.core.state.container_mut(leaf, id)?;
        container.visibility.toggle_user_hidden();
        let doc = &mut self.core.doc;
        let change = panels::apply_visibility(doc, container);
        panels::refresh_toggles(doc, container);
        publish_visibility(&mut self.core.events, container, change);
        let visible = container.panels_visible;
        self.pump();
        Some(visible)
    }

    fn toggle_fullscreen(&mut self, leaf: LeafId, id: &ContainerId) {
        let Some(container) = self.core.state.container(leaf, id) else {
            return;
        };
        let (node, on) = (container.node, !container.fullscreen);
        if let Err(err) = self.host.set_fullscreen(node, on) {
            tracing::warn!(%leaf, %id, error = %err, "fullscreen request failed");
            self.host.notice(&format!("Fullscreen failed: {err}"));
            return;
        }
        let Some(container) = self.core.state.container_mut(leaf, id) else {
            return;
        };
        container.fullscreen = on;
        let doc = &mut self.core.doc;
        doc.toggle_class(node, FULLSCREEN_CLASS, Some(on));
        fold::apply_size(doc, container);
        panels::refresh_toggles(doc, container);
        tracing::debug!(%leaf, %id, fullscreen = on, "fullscreen toggled");
        self.schedule_fit(leaf, id, false);
    }
}
