//! Overview map: every district boundary, styled by the selection.
//!
//! One primitive per catalog district. Selected districts carry the selected
//! style and paint above the rest; a hovered district that is not selected
//! carries the hover style; everything else uses the default style.

#[cfg(test)]
#[path = "overview_test.rs"]
mod overview_test;

use std::collections::HashMap;

use crate::camera::{Point, Viewport};
use crate::consts::{DEFAULT_CENTER, OVERVIEW_ZOOM};
use crate::doc::DistrictCatalog;
use crate::geometry::LngLat;
use crate::hit;
use crate::layer::{Owner, Primitive, PrimitiveId, RenderedLayer, Tooltip};
use crate::selection::{DistrictSelectionModel, SelectionChanged};
use crate::style::PathStyle;

pub struct OverviewMapView {
    pub viewport: Viewport,
    pub layer: RenderedLayer,
    /// Read-only drawings of the selected districts' projects.
    pub drawings: RenderedLayer,
    by_name: HashMap<String, PrimitiveId>,
    hovered: Option<String>,
}

impl Default for OverviewMapView {
    fn default() -> Self {
        let (lng, lat) = DEFAULT_CENTER;
        Self {
            viewport: Viewport::new(LngLat::new(lng, lat), OVERVIEW_ZOOM),
            layer: RenderedLayer::new(),
            drawings: RenderedLayer::new(),
            by_name: HashMap::new(),
            hovered: None,
        }
    }
}

impl OverviewMapView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one primitive per district, replacing any previous ones.
    pub fn load(&mut self, catalog: &DistrictCatalog) {
        self.layer.clear();
        self.by_name.clear();
        self.hovered = None;
        for district in catalog.iter() {
            let prim = Primitive::path(
                district.boundary.clone(),
                PathStyle::district_default(),
                Owner::District(district.name.clone()),
            )
            .with_tooltip(Tooltip::new(district.name.clone(), ""));
            let id = self.layer.add(prim);
            self.by_name.insert(district.name.clone(), id);
        }
    }

    /// Re-style every district from the selection and raise selected ones.
    pub fn restyle(&mut self, selection: &DistrictSelectionModel) {
        for (name, id) in &self.by_name {
            if let Some(p) = self.layer.get_mut(id) {
                if selection.contains(name) {
                    p.restyle(PathStyle::district_selected());
                } else {
                    p.restyle(PathStyle::district_default());
                    if self.hovered.as_deref() == Some(name.as_str()) {
                        p.set_transient_style(PathStyle::district_hovered());
                    }
                }
            }
        }
        for name in selection.names() {
            if let Some(id) = self.by_name.get(name) {
                self.layer.bring_to_front(id);
            }
        }
    }

    /// District under the screen point, topmost first.
    #[must_use]
    pub fn district_at(&self, pt: Point) -> Option<&str> {
        let id = hit::hit_test(&self.layer, &self.viewport, pt)?;
        match &self.layer.get(&id)?.owner {
            Owner::District(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Primitive drawn for `name`.
    #[must_use]
    pub fn primitive_for(&self, name: &str) -> Option<PrimitiveId> {
        self.by_name.get(name).copied()
    }

    /// Click: toggle the district under the pointer, or clear on background.
    pub fn click(&mut self, pt: Point, selection: &mut DistrictSelectionModel) -> Option<SelectionChanged> {
        let changed = match self.district_at(pt).map(str::to_owned) {
            Some(name) => Some(selection.toggle(&name)),
            None => selection.clear(),
        };
        if changed.is_some() {
            self.restyle(selection);
        }
        changed
    }

    /// Double click: select only the district under the pointer.
    pub fn double_click(&mut self, pt: Point, selection: &mut DistrictSelectionModel) -> Option<SelectionChanged> {
        let name = self.district_at(pt)?.to_owned();
        let changed = selection.replace_with([name]);
        self.restyle(selection);
        Some(changed)
    }

    /// Pointer move: update hover. Returns `(restyled, over_district)`.
    pub fn pointer_move(&mut self, pt: Point, selection: &DistrictSelectionModel) -> (bool, bool) {
        let under = self.district_at(pt).map(str::to_owned);
        let over = under.is_some();
        if under == self.hovered {
            return (false, over);
        }
        self.hovered = under;
        self.restyle(selection);
        (true, over)
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }
}
