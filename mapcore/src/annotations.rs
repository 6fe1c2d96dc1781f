//! Annotation layers: projects' stored drawings rendered as primitives.
//!
//! Read-only layers get one primitive per drawing. Editable layers (the
//! detail view's edit layer) get one draggable primitive per geometry so each
//! can be selected and moved on its own. Drawings whose GeoJSON does not
//! parse are logged and skipped; the rest still render.

#[cfg(test)]
#[path = "annotations_test.rs"]
mod annotations_test;

use crate::camera::Viewport;
use crate::config::EditConfig;
use crate::doc::{Project, ProjectId};
use crate::geometry::{Bounds, Geometry};
use crate::layer::{Owner, Primitive, RenderedLayer, Tooltip};
use crate::style::PathStyle;

/// Options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Clear the target layer first.
    pub clear: bool,
    /// Project rendered in the highlight style.
    pub highlight_id: Option<ProjectId>,
    /// Decompose into draggable per-geometry primitives.
    pub editable: bool,
    /// Move the viewport onto the highlighted project.
    pub fit_bounds: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { clear: false, highlight_id: None, editable: false, fit_bounds: true }
    }
}

/// What a [`render`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    /// Primitives added to the layer.
    pub primitives: usize,
    /// Drawings skipped because their GeoJSON did not parse.
    pub skipped: usize,
    /// Whether the viewport was moved onto the highlighted project.
    pub viewport_changed: bool,
}

/// Render every drawing of every project onto `layer`.
pub fn render(
    projects: &[Project],
    layer: &mut RenderedLayer,
    viewport: &mut Viewport,
    options: RenderOptions,
    config: &EditConfig,
) -> RenderOutcome {
    if options.clear {
        layer.clear();
    }

    let mut outcome = RenderOutcome::default();
    let mut focus: Vec<Geometry> = Vec::new();

    for project in projects {
        let highlighted = options.highlight_id == Some(project.id);
        let tooltip = Tooltip::new(project.name.clone(), project.status.as_str());

        for drawing in &project.drawings {
            let geometries = match drawing.geometries() {
                Ok(g) => g,
                Err(e) => {
                    log::warn!("project {}: skipping malformed drawing {:?}: {e}", project.id, drawing.id);
                    outcome.skipped += 1;
                    continue;
                }
            };
            if highlighted {
                focus.extend(geometries.iter().cloned());
            }

            let owner = Owner::Project(project.id);
            if options.editable {
                for geometry in geometries {
                    let prim = editable_primitive(geometry, highlighted, owner.clone(), tooltip.clone());
                    layer.add(prim);
                    outcome.primitives += 1;
                }
            } else if let Some(geometry) = merge(geometries) {
                layer.add(styled(geometry, highlighted, owner).with_tooltip(tooltip.clone()));
                outcome.primitives += 1;
            }
        }
    }

    if options.fit_bounds && !focus.is_empty() {
        outcome.viewport_changed = focus_viewport(viewport, &focus, config);
    }
    outcome
}

/// Marker for points, stroked path for everything else.
fn styled(geometry: Geometry, highlighted: bool, owner: Owner) -> Primitive {
    match geometry.as_point() {
        Some(p) => Primitive::marker(p, PathStyle::drawing_marker(highlighted), owner),
        None => Primitive::path(geometry, PathStyle::drawing(highlighted), owner),
    }
}

fn editable_primitive(geometry: Geometry, highlighted: bool, owner: Owner, mut tooltip: Tooltip) -> Primitive {
    let prim = styled(geometry, highlighted, owner).draggable();
    tooltip.position = prim.shape.anchor();
    prim.with_tooltip(tooltip)
}

/// One geometry per drawing: a lone geometry as is, several as a collection.
fn merge(mut geometries: Vec<Geometry>) -> Option<Geometry> {
    match geometries.len() {
        0 => None,
        1 => geometries.pop(),
        _ => Some(Geometry::GeometryCollection { geometries }),
    }
}

/// Center on a lone point at the fixed zoom, otherwise fit the union bounds.
fn focus_viewport(viewport: &mut Viewport, geometries: &[Geometry], config: &EditConfig) -> bool {
    if let [only] = geometries {
        if let Some(p) = only.as_point() {
            viewport.set_view(p, config.point_zoom);
            return true;
        }
    }
    let bounds = geometries
        .iter()
        .fold(Bounds::empty(), |acc, g| acc.union(g.bounds()));
    viewport.fit_bounds(bounds, config.fit_padding_px)
}
