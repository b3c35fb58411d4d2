use baseplan_core::{BuildingStyle, GRID_SIZE, SNAP_THRESHOLD};
use serde::{Deserialize, Serialize};

use crate::gesture::PointerButton;

/// Per-design preferences. Every field has a default, so partial documents
/// deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid_enabled: bool,
    pub grid_size: f64,
    pub snap_threshold: f64,
    pub fief_enabled: bool,
    /// Fraction of each buildable rectangle's size added on every side.
    pub fief_padding: f64,
    pub claim_countdown_ms: u64,
    pub active_style: BuildingStyle,
    pub click_mode: ClickMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_enabled: false,
            grid_size: GRID_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            fief_enabled: false,
            fief_padding: 0.0,
            claim_countdown_ms: 3000,
            active_style: BuildingStyle::default(),
            click_mode: ClickMode::default(),
        }
    }
}

/// Which pointer button places pieces and which one drags groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickMode {
    #[default]
    Standard,
    Swapped,
}

impl ClickMode {
    #[must_use]
    pub fn placement_button(self) -> PointerButton {
        match self {
            ClickMode::Standard => PointerButton::Primary,
            ClickMode::Swapped => PointerButton::Secondary,
        }
    }

    #[must_use]
    pub fn group_button(self) -> PointerButton {
        match self {
            ClickMode::Standard => PointerButton::Secondary,
            ClickMode::Swapped => PointerButton::Primary,
        }
    }
}
