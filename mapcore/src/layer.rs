//! Rendered layers: the visual primitives a map view owns.
//!
//! Every map view builds its own `RenderedLayer`s from shared data (the
//! district catalog, fetched projects). Primitives are never shared between
//! views; consistency comes from re-rendering both from the same state.
//!
//! Paint order is `(pane, z, id)`: panes stack mask below overlay paths below
//! markers, and `z` orders primitives within a pane. `bring_to_front` and
//! `bring_to_back` only touch `z`.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::consts::READOUT_DECIMALS;
use crate::doc::ProjectId;
use crate::geometry::{Bounds, Feature, Geometry, LngLat};
use crate::style::PathStyle;

/// Unique identifier for a rendered primitive.
pub type PrimitiveId = Uuid;

/// What a primitive draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Stroked (and possibly filled) vector path over a geometry.
    Path(Geometry),
    /// Circle marker at a single position.
    Marker(LngLat),
}

impl Shape {
    /// The shape as a GeoJSON geometry (markers become Points).
    #[must_use]
    pub fn to_geometry(&self) -> Geometry {
        match self {
            Self::Path(g) => g.clone(),
            Self::Marker(p) => Geometry::Point { coordinates: *p },
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Path(g) => g.bounds(),
            Self::Marker(p) => {
                let mut b = Bounds::empty();
                b.extend(*p);
                b
            }
        }
    }

    /// Shift the whole shape.
    pub fn translate(&mut self, d_lng: f64, d_lat: f64) {
        match self {
            Self::Path(g) => g.translate(d_lng, d_lat),
            Self::Marker(p) => *p = p.offset(d_lng, d_lat),
        }
    }

    /// Reference position shown in coordinate readouts: the marker position,
    /// or the first vertex of a path.
    #[must_use]
    pub fn anchor(&self) -> Option<LngLat> {
        match self {
            Self::Marker(p) => Some(*p),
            Self::Path(g) => {
                let mut first = None;
                g.for_each_position(&mut |p| {
                    if first.is_none() {
                        first = Some(p);
                    }
                });
                first
            }
        }
    }

    /// Where a tooltip is placed: the marker position, or the center of a
    /// path's bounds.
    #[must_use]
    pub fn label_position(&self) -> Option<LngLat> {
        match self {
            Self::Marker(p) => Some(*p),
            Self::Path(g) => {
                let b = g.bounds();
                b.is_valid().then(|| b.center())
            }
        }
    }

    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }
}

/// Stacking pane. Declaration order is paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pane {
    /// Darkening mask, above tiles and below every vector.
    Mask,
    /// Vector paths (districts, outlines, drawings).
    Overlay,
    /// Circle markers.
    Marker,
}

/// The record a primitive was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    District(String),
    Project(ProjectId),
    Mask,
    /// Drawn on the edit layer in this session, not yet tied to a saved drawing.
    Drawn,
}

/// Hover label bound to a primitive.
///
/// Tooltips are never interactive, so they cannot swallow the clicks and
/// drags used for selection and editing.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub detail: String,
    /// Position line, refreshed when the primitive moves.
    pub position: Option<LngLat>,
    pub interactive: bool,
}

impl Tooltip {
    #[must_use]
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { title: title.into(), detail: detail.into(), position: None, interactive: false }
    }

    /// Plain-text content, one line per field.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = self.title.clone();
        if !self.detail.is_empty() {
            out.push('\n');
            out.push_str(&self.detail);
        }
        if let Some(p) = self.position {
            out.push('\n');
            out.push_str(&format!("{:.prec$}, {:.prec$}", p.lat, p.lng, prec = READOUT_DECIMALS));
        }
        out
    }
}

/// One drawable item on a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: PrimitiveId,
    pub shape: Shape,
    /// Style currently applied.
    pub style: PathStyle,
    /// Style to restore when a transient state (hover, active) ends.
    pub base_style: PathStyle,
    pub pane: Pane,
    pub owner: Owner,
    pub tooltip: Option<Tooltip>,
    /// Receives click / drag gestures.
    pub interactive: bool,
    pub draggable: bool,
    z: i64,
}

impl Primitive {
    /// An interactive vector path in the overlay pane.
    #[must_use]
    pub fn path(geometry: Geometry, style: PathStyle, owner: Owner) -> Self {
        Self::build(Shape::Path(geometry), style, Pane::Overlay, owner)
    }

    /// An interactive circle marker in the marker pane.
    #[must_use]
    pub fn marker(position: LngLat, style: PathStyle, owner: Owner) -> Self {
        Self::build(Shape::Marker(position), style, Pane::Marker, owner)
    }

    fn build(shape: Shape, style: PathStyle, pane: Pane, owner: Owner) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape,
            base_style: style.clone(),
            style,
            pane,
            owner,
            tooltip: None,
            interactive: true,
            draggable: false,
            z: 0,
        }
    }

    #[must_use]
    pub fn in_pane(mut self, pane: Pane) -> Self {
        self.pane = pane;
        self
    }

    #[must_use]
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    #[must_use]
    pub fn draggable(mut self) -> Self {
        self.draggable = true;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Replace both the current and the base style.
    pub fn restyle(&mut self, style: PathStyle) {
        self.base_style = style.clone();
        self.style = style;
    }

    /// Apply a transient style, keeping the base for later restore.
    pub fn set_transient_style(&mut self, style: PathStyle) {
        self.style = style;
    }

    /// Drop any transient style.
    pub fn restore_style(&mut self) {
        self.style = self.base_style.clone();
    }

    /// Move the primitive and refresh its tooltip position line.
    pub fn translate(&mut self, d_lng: f64, d_lat: f64) {
        self.shape.translate(d_lng, d_lat);
        let anchor = self.shape.anchor();
        if let Some(tip) = self.tooltip.as_mut().filter(|t| t.position.is_some()) {
            tip.position = anchor;
        }
    }
}

/// A view-owned collection of primitives.
#[derive(Debug, Clone, Default)]
pub struct RenderedLayer {
    primitives: HashMap<PrimitiveId, Primitive>,
    top_z: i64,
    bottom_z: i64,
}

impl RenderedLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive on top of its pane and return its id.
    pub fn add(&mut self, mut primitive: Primitive) -> PrimitiveId {
        self.top_z += 1;
        primitive.z = self.top_z;
        let id = primitive.id;
        self.primitives.insert(id, primitive);
        id
    }

    pub fn remove(&mut self, id: &PrimitiveId) -> Option<Primitive> {
        self.primitives.remove(id)
    }

    /// Remove every primitive.
    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    #[must_use]
    pub fn get(&self, id: &PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id)
    }

    pub fn get_mut(&mut self, id: &PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.get_mut(id)
    }

    /// Move a primitive above everything else in its pane.
    pub fn bring_to_front(&mut self, id: &PrimitiveId) {
        self.top_z += 1;
        let z = self.top_z;
        if let Some(p) = self.primitives.get_mut(id) {
            p.z = z;
        }
    }

    /// Move a primitive below everything else in its pane.
    pub fn bring_to_back(&mut self, id: &PrimitiveId) {
        self.bottom_z -= 1;
        let z = self.bottom_z;
        if let Some(p) = self.primitives.get_mut(id) {
            p.z = z;
        }
    }

    /// Translate a primitive. Returns false if it doesn't exist.
    pub fn translate(&mut self, id: &PrimitiveId, d_lng: f64, d_lat: f64) -> bool {
        let Some(p) = self.primitives.get_mut(id) else {
            return false;
        };
        p.translate(d_lng, d_lat);
        true
    }

    /// All primitives in paint order (bottom first).
    #[must_use]
    pub fn sorted(&self) -> Vec<&Primitive> {
        let mut prims: Vec<&Primitive> = self.primitives.values().collect();
        prims.sort_by(|a, b| a.pane.cmp(&b.pane).then(a.z.cmp(&b.z)).then_with(|| a.id.cmp(&b.id)));
        prims
    }

    /// Ids of the primitives rendered from `owner`, in paint order.
    #[must_use]
    pub fn ids_for(&self, owner: &Owner) -> Vec<PrimitiveId> {
        self.sorted()
            .into_iter()
            .filter(|p| &p.owner == owner)
            .map(|p| p.id)
            .collect()
    }

    /// Union of all primitive bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.primitives
            .values()
            .fold(Bounds::empty(), |acc, p| acc.union(p.shape.bounds()))
    }

    /// Export the primitives rendered from any of `owners` as property-less
    /// GeoJSON features, in paint order.
    #[must_use]
    pub fn to_features_for(&self, owners: &[Owner]) -> Vec<Feature> {
        self.sorted()
            .into_iter()
            .filter(|p| owners.contains(&p.owner))
            .map(|p| Feature::bare(p.shape.to_geometry()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
