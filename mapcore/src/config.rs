//! Tunables for the detail view's editing and focusing behavior.

use crate::consts::{FIT_PADDING_PX, NUDGE_STEP_DEG, NUDGE_STEP_LARGE_DEG, POINT_FOCUS_ZOOM};

/// Editing configuration carried by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditConfig {
    /// Arrow-key nudge in degrees.
    pub nudge_step: f64,
    /// Arrow-key nudge in degrees while Shift is held.
    pub nudge_step_large: f64,
    /// Padding in CSS pixels kept around fitted bounds.
    pub fit_padding_px: f64,
    /// Zoom used when focusing a single point.
    pub point_zoom: f64,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            nudge_step: NUDGE_STEP_DEG,
            nudge_step_large: NUDGE_STEP_LARGE_DEG,
            fit_padding_px: FIT_PADDING_PX,
            point_zoom: POINT_FOCUS_ZOOM,
        }
    }
}

impl EditConfig {
    /// Nudge step for the given Shift state.
    #[must_use]
    pub fn step(&self, large: bool) -> f64 {
        if large { self.nudge_step_large } else { self.nudge_step }
    }
}
