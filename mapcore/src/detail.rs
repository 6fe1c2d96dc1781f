//! Detail map: the current selection outlined, everything else masked.
//!
//! The view owns two layers. `focus` holds the white outlines and the
//! darkening mask and is rebuilt from the selection label on every change.
//! `edit` holds the editable drawings shown for the district's projects plus
//! anything drawn in this session.

#[cfg(test)]
#[path = "detail_test.rs"]
mod detail_test;

use crate::camera::Viewport;
use crate::consts::{DEFAULT_CENTER, DETAIL_ZOOM};
use crate::doc::DistrictCatalog;
use crate::geometry::{Bounds, Geometry, LngLat};
use crate::layer::{Owner, Pane, Primitive, PrimitiveId, RenderedLayer};
use crate::mask::compute_mask;
use crate::selection::split_label;
use crate::style::PathStyle;

pub struct DetailMapView {
    pub viewport: Viewport,
    /// Outlines and mask for the focused districts.
    pub focus: RenderedLayer,
    /// Editable drawings.
    pub edit: RenderedLayer,
}

impl Default for DetailMapView {
    fn default() -> Self {
        let (lng, lat) = DEFAULT_CENTER;
        Self {
            viewport: Viewport::new(LngLat::new(lng, lat), DETAIL_ZOOM),
            focus: RenderedLayer::new(),
            edit: RenderedLayer::new(),
        }
    }
}

impl DetailMapView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild outlines and mask for `label` and fit the viewport to them.
    ///
    /// An empty label only clears the previous focus. Names missing from the
    /// catalog are skipped. Returns whether the viewport changed.
    pub fn focus_on(&mut self, label: Option<&str>, catalog: &DistrictCatalog, padding_px: f64) -> bool {
        self.focus.clear();
        let Some(label) = label else {
            return false;
        };

        let names = split_label(label);
        let features: Vec<_> = names.iter().filter_map(|n| catalog.get(n)).collect();
        if features.is_empty() {
            log::debug!("no catalog district matches `{label}`");
            return false;
        }

        let mut bounds = Bounds::empty();
        for feature in &features {
            bounds = bounds.union(feature.boundary.bounds());
            self.focus.add(
                Primitive::path(
                    feature.boundary.clone(),
                    PathStyle::detail_outline(),
                    Owner::District(feature.name.clone()),
                )
                .non_interactive(),
            );
        }

        if let Some(mask) = compute_mask(features.iter().copied()) {
            self.focus.add(
                Primitive::path(mask, PathStyle::mask(), Owner::Mask)
                    .in_pane(Pane::Mask)
                    .non_interactive(),
            );
        }

        self.viewport.fit_bounds(bounds, padding_px)
    }

    /// The mask primitive currently drawn, if any.
    #[must_use]
    pub fn mask(&self) -> Option<&Primitive> {
        self.focus.ids_for(&Owner::Mask).first().and_then(|id| self.focus.get(id))
    }

    /// Number of district outlines currently drawn.
    #[must_use]
    pub fn outline_count(&self) -> usize {
        self.focus
            .sorted()
            .iter()
            .filter(|p| matches!(p.owner, Owner::District(_)))
            .count()
    }

    /// Append a shape completed by the host's draw tool as an editable primitive.
    pub fn add_drawn_shape(&mut self, geometry: Geometry) -> PrimitiveId {
        let prim = match geometry.as_point() {
            Some(p) => Primitive::marker(p, PathStyle::drawing_marker(false), Owner::Drawn),
            None => Primitive::path(geometry, PathStyle::drawing(false), Owner::Drawn),
        };
        self.edit.add(prim.draggable())
    }
}
