// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plugin settings: the diagram descriptor list, sizes and panel behavior.
//!
//! Settings are stored by the host as a JSON blob. Every field has a default,
//! so a partial blob written by an older version merges over the defaults.
//!
//! ```
//! use diagram_zoom::Settings;
//!
//! let settings = Settings::from_json(r#"{ "foldByDefault": true }"#).unwrap();
//! assert!(settings.fold_by_default);
//! assert_eq!(settings.diagrams[0].name, "Default");
//! ```

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use diagram_zoom_dom::{SelectorError, SelectorList};

use crate::panels::PanelKind;

/// Name of the descriptor that always exists.
pub const DEFAULT_DIAGRAM_NAME: &str = "Default";

/// Which optional panels a descriptor's containers get.
///
/// The fold panel is not optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelToggles {
    /// Move (pan) buttons.
    #[serde(rename = "move")]
    pub move_panel: bool,
    /// Zoom buttons.
    pub zoom: bool,
    /// Hide, fullscreen and touch buttons.
    pub service: bool,
}

impl Default for PanelToggles {
    fn default() -> Self {
        Self {
            move_panel: true,
            zoom: true,
            service: true,
        }
    }
}

impl PanelToggles {
    /// Returns `true` if panels of `kind` should be created.
    #[must_use]
    pub fn enabled(&self, kind: PanelKind) -> bool {
        match kind {
            PanelKind::Move => self.move_panel,
            PanelKind::Zoom => self.zoom,
            PanelKind::Fold => true,
            PanelKind::Service => self.service,
        }
    }
}

/// One class of diagram to make interactive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramDescriptor {
    /// Unique display name.
    pub name: String,
    /// Unique CSS selector of the rendered diagram element.
    pub selector: String,
    /// Disabled descriptors are skipped by detection.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Optional panels.
    #[serde(default)]
    pub panels: PanelToggles,
}

fn enabled_default() -> bool {
    true
}

impl DiagramDescriptor {
    /// Creates an enabled descriptor with every panel.
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            enabled: true,
            panels: PanelToggles::default(),
        }
    }
}

/// Pixel offsets of a panel from the container edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPosition {
    /// Offset from the top edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Offset from the left edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Offset from the right edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    /// Offset from the bottom edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

impl PanelPosition {
    const fn top_left(top: f64, left: f64) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            right: None,
            bottom: None,
        }
    }

    const fn top_right(top: f64, right: f64) -> Self {
        Self {
            top: Some(top),
            left: None,
            right: Some(right),
            bottom: None,
        }
    }

    const fn bottom_right(bottom: f64, right: f64) -> Self {
        Self {
            top: None,
            left: None,
            right: Some(right),
            bottom: Some(bottom),
        }
    }

    /// Returns the `(property, value)` style pairs of the set offsets.
    pub fn style_pairs(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("top", self.top),
            ("left", self.left),
            ("right", self.right),
            ("bottom", self.bottom),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v)))
    }
}

/// Where each panel sits inside its container.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPositions {
    /// Move panel.
    #[serde(rename = "move")]
    pub move_panel: PanelPosition,
    /// Zoom panel.
    pub zoom: PanelPosition,
    /// Fold panel.
    pub fold: PanelPosition,
    /// Service panel.
    pub service: PanelPosition,
}

impl Default for PanelPositions {
    fn default() -> Self {
        Self {
            move_panel: PanelPosition::bottom_right(10.0, 10.0),
            zoom: PanelPosition::top_right(50.0, 10.0),
            fold: PanelPosition::top_left(0.0, 0.0),
            service: PanelPosition::top_right(10.0, 10.0),
        }
    }
}

impl PanelPositions {
    /// Returns the position of one panel kind.
    #[must_use]
    pub fn get(&self, kind: PanelKind) -> PanelPosition {
        match kind {
            PanelKind::Move => self.move_panel,
            PanelKind::Zoom => self.zoom,
            PanelKind::Fold => self.fold,
            PanelKind::Service => self.service,
        }
    }
}

/// All plugin settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Descriptors in detection priority order.
    pub diagrams: Vec<DiagramDescriptor>,
    /// Size new containers from the rendered diagram instead of the fixed sizes.
    pub apply_suitable_size: bool,
    /// Expanded container width in pixels.
    pub expanded_width: f64,
    /// Expanded container height in pixels.
    pub expanded_height: f64,
    /// Folded container width in pixels.
    pub folded_width: f64,
    /// Folded container height in pixels.
    pub folded_height: f64,
    /// Fold new containers.
    pub fold_by_default: bool,
    /// Unfold on focus, fold again on blur.
    pub auto_fold_on_focus_change: bool,
    /// Show panels only while the pointer is over the container.
    pub hide_panels_on_mouse_out: bool,
    /// Panel placement.
    pub panel_positions: PanelPositions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            diagrams: vec![
                DiagramDescriptor::new(DEFAULT_DIAGRAM_NAME, ".diagram"),
                DiagramDescriptor::new("Mermaid", ".mermaid"),
                DiagramDescriptor::new("PlantUML", ".block-language-plantuml"),
                DiagramDescriptor::new("Graphviz", ".block-language-dot"),
                DiagramDescriptor::new("Kroki", ".block-language-kroki"),
                DiagramDescriptor::new("Mehrmaid", ".block-language-mehrmaid"),
            ],
            apply_suitable_size: false,
            expanded_width: 400.0,
            expanded_height: 400.0,
            folded_width: 200.0,
            folded_height: 200.0,
            fold_by_default: false,
            auto_fold_on_focus_change: false,
            hide_panels_on_mouse_out: false,
            panel_positions: PanelPositions::default(),
        }
    }
}

/// Rejected settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The stored blob is not valid settings JSON.
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Two descriptors share a name.
    #[error("duplicate diagram name `{0}`")]
    DuplicateName(String),
    /// Two descriptors share a selector.
    #[error("duplicate diagram selector `{0}`")]
    DuplicateSelector(String),
    /// A descriptor selector does not parse.
    #[error("diagram `{name}` has an invalid selector")]
    InvalidSelector {
        /// Descriptor name.
        name: String,
        /// Parse failure.
        source: SelectorError,
    },
    /// The `Default` descriptor was removed or renamed.
    #[error("the `Default` diagram is missing")]
    MissingDefault,
    /// A container size is not a positive finite number.
    #[error("`{0}` must be a positive number of pixels")]
    InvalidSize(&'static str),
}

/// A validated descriptor selector, in priority order.
#[derive(Clone, Debug)]
pub(crate) struct Matcher {
    pub(crate) index: usize,
    pub(crate) selector: SelectorList,
}

impl Settings {
    /// Parses a stored blob, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes for storage.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.matchers().map(|_| ())
    }

    /// Returns the descriptor with the given name.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&DiagramDescriptor> {
        self.diagrams.iter().find(|d| d.name == name)
    }

    /// Validates and compiles the selectors of enabled descriptors.
    pub(crate) fn matchers(&self) -> Result<Vec<Matcher>, SettingsError> {
        for (field, value) in [
            ("expandedWidth", self.expanded_width),
            ("expandedHeight", self.expanded_height),
            ("foldedWidth", self.folded_width),
            ("foldedHeight", self.folded_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidSize(field));
            }
        }
        if self.descriptor(DEFAULT_DIAGRAM_NAME).is_none() {
            return Err(SettingsError::MissingDefault);
        }

        let mut names = HashSet::new();
        let mut selectors = HashSet::new();
        let mut out = Vec::new();
        for (index, d) in self.diagrams.iter().enumerate() {
            if !names.insert(d.name.as_str()) {
                return Err(SettingsError::DuplicateName(d.name.clone()));
            }
            if !selectors.insert(d.selector.trim()) {
                return Err(SettingsError::DuplicateSelector(d.selector.clone()));
            }
            let selector =
                SelectorList::parse(&d.selector).map_err(|source| SettingsError::InvalidSelector {
                    name: d.name.clone(),
                    source,
                })?;
            if d.enabled {
                out.push(Matcher { index, selector });
            }
        }
        Ok(out)
    }
}
