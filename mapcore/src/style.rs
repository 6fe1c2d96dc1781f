//! Visual styles for districts, masks, outlines, and drawings.
//!
//! Colors are CSS strings so the renderer can hand them to the canvas
//! context unchanged.

/// Stroke and fill for a vector primitive (paths and circle markers).
#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    /// Stroke color; `None` disables the stroke.
    pub stroke: Option<&'static str>,
    /// Stroke width in CSS pixels.
    pub weight: f64,
    pub opacity: f64,
    /// Fill color; `None` disables the fill.
    pub fill: Option<&'static str>,
    pub fill_opacity: f64,
    /// Marker radius in CSS pixels (circle markers only).
    pub radius: f64,
}

const BLUE: &str = "#58a6ff";
const GRAY: &str = "#6B7280";
const WHITE: &str = "#FFFFFF";
const CYAN: &str = "#00B4D8";
const GREEN: &str = "#22c55e";
const AMBER: &str = "#f59e0b";

impl PathStyle {
    /// District outline on the overview map when not selected.
    #[must_use]
    pub fn district_default() -> Self {
        Self { stroke: Some(GRAY), weight: 2.0, opacity: 1.0, fill: None, fill_opacity: 0.0, radius: 0.0 }
    }

    /// District under the pointer (only applied when not selected).
    #[must_use]
    pub fn district_hovered() -> Self {
        Self { stroke: Some(WHITE), weight: 3.0, ..Self::district_default() }
    }

    /// Selected district on the overview map.
    #[must_use]
    pub fn district_selected() -> Self {
        Self { stroke: Some(BLUE), weight: 4.0, opacity: 1.0, fill: Some(BLUE), fill_opacity: 0.2, radius: 0.0 }
    }

    /// White outline of a focused district on the detail map.
    #[must_use]
    pub fn detail_outline() -> Self {
        Self { stroke: Some(WHITE), weight: 3.0, opacity: 1.0, fill: None, fill_opacity: 0.0, radius: 0.0 }
    }

    /// Darkening overlay outside the selection.
    #[must_use]
    pub fn mask() -> Self {
        Self { stroke: None, weight: 0.0, opacity: 0.0, fill: Some("black"), fill_opacity: 0.7, radius: 0.0 }
    }

    /// Drawing path, normal or highlighted.
    #[must_use]
    pub fn drawing(highlighted: bool) -> Self {
        let (color, weight) = if highlighted { (GREEN, 5.0) } else { (CYAN, 3.0) };
        Self { stroke: Some(color), weight, opacity: 1.0, fill: Some(color), fill_opacity: 0.2, radius: 0.0 }
    }

    /// Point drawing rendered as a circle marker, normal or highlighted.
    #[must_use]
    pub fn drawing_marker(highlighted: bool) -> Self {
        let (color, radius) = if highlighted { (GREEN, 10.0) } else { (CYAN, 7.0) };
        Self { stroke: Some(WHITE), weight: 2.0, opacity: 1.0, fill: Some(color), fill_opacity: 0.8, radius }
    }

    /// Primitive currently bound to keyboard editing.
    #[must_use]
    pub fn active(marker: bool) -> Self {
        if marker {
            Self { fill: Some(AMBER), radius: 10.0, ..Self::drawing_marker(true) }
        } else {
            Self { stroke: Some(AMBER), fill: Some(AMBER), weight: 5.0, ..Self::drawing(true) }
        }
    }
}
