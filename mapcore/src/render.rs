//! Rendering: draws a map view's layers to a 2D canvas context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads layers and a viewport and produces pixels; it never mutates
//! application state. Base-map tiles are drawn by the host underneath the
//! canvas, so the mask pane sits directly above them.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule};

use crate::camera::Viewport;
use crate::geometry::{Geometry, LngLat, Ring};
use crate::layer::{Pane, Primitive, RenderedLayer, Shape};
use crate::style::PathStyle;

/// Radius of a point drawn inside a path geometry (e.g. a collection member).
const INLINE_POINT_RADIUS_PX: f64 = 3.0;

/// Draw `layers` pane by pane: mask, then overlay paths, then markers.
///
/// Within a pane, earlier layers paint first and each layer keeps its own
/// paint order. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, layers: &[&RenderedLayer], viewport: &Viewport, dpr: f64) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);

    for pane in [Pane::Mask, Pane::Overlay, Pane::Marker] {
        for layer in layers {
            for prim in layer.sorted().into_iter().filter(|p| p.pane == pane) {
                draw_primitive(ctx, prim, viewport)?;
            }
        }
    }
    Ok(())
}

fn draw_primitive(ctx: &CanvasRenderingContext2d, prim: &Primitive, viewport: &Viewport) -> Result<(), JsValue> {
    ctx.save();
    let result = match &prim.shape {
        Shape::Marker(p) => draw_marker(ctx, *p, &prim.style, viewport),
        Shape::Path(g) => draw_path(ctx, g, &prim.style, viewport),
    };
    ctx.restore();
    result
}

fn draw_marker(ctx: &CanvasRenderingContext2d, p: LngLat, style: &PathStyle, viewport: &Viewport) -> Result<(), JsValue> {
    let s = viewport.project(p);
    ctx.begin_path();
    ctx.arc(s.x, s.y, style.radius, 0.0, 2.0 * PI)?;
    fill(ctx, style, CanvasWindingRule::Nonzero);
    stroke(ctx, style);
    Ok(())
}

fn draw_path(ctx: &CanvasRenderingContext2d, geometry: &Geometry, style: &PathStyle, viewport: &Viewport) -> Result<(), JsValue> {
    ctx.begin_path();
    trace(ctx, geometry, viewport)?;
    if geometry_has_area(geometry) {
        // Holes (and the mask's cut-outs) rely on even-odd filling.
        fill(ctx, style, CanvasWindingRule::Evenodd);
    }
    stroke(ctx, style);
    Ok(())
}

/// Add the geometry's outline to the current path.
fn trace(ctx: &CanvasRenderingContext2d, geometry: &Geometry, viewport: &Viewport) -> Result<(), JsValue> {
    match geometry {
        Geometry::Point { coordinates } => trace_point(ctx, *coordinates, viewport)?,
        Geometry::MultiPoint { coordinates } => {
            for p in coordinates {
                trace_point(ctx, *p, viewport)?;
            }
        }
        Geometry::LineString { coordinates } => trace_line(ctx, coordinates, viewport, false),
        Geometry::MultiLineString { coordinates } => {
            for line in coordinates {
                trace_line(ctx, line, viewport, false);
            }
        }
        Geometry::Polygon { coordinates } => trace_rings(ctx, coordinates, viewport),
        Geometry::MultiPolygon { coordinates } => {
            for rings in coordinates {
                trace_rings(ctx, rings, viewport);
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                trace(ctx, g, viewport)?;
            }
        }
    }
    Ok(())
}

fn trace_point(ctx: &CanvasRenderingContext2d, p: LngLat, viewport: &Viewport) -> Result<(), JsValue> {
    let s = viewport.project(p);
    ctx.move_to(s.x + INLINE_POINT_RADIUS_PX, s.y);
    ctx.arc(s.x, s.y, INLINE_POINT_RADIUS_PX, 0.0, 2.0 * PI)
}

fn trace_rings(ctx: &CanvasRenderingContext2d, rings: &[Ring], viewport: &Viewport) {
    for ring in rings {
        trace_line(ctx, ring, viewport, true);
    }
}

fn trace_line(ctx: &CanvasRenderingContext2d, line: &[LngLat], viewport: &Viewport, closed: bool) {
    let mut points = line.iter().map(|p| viewport.project(*p));
    let Some(first) = points.next() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    for s in points {
        ctx.line_to(s.x, s.y);
    }
    if closed {
        ctx.close_path();
    }
}

fn geometry_has_area(geometry: &Geometry) -> bool {
    match geometry {
        Geometry::GeometryCollection { geometries } => geometries.iter().any(geometry_has_area),
        g => g.is_polygonal(),
    }
}

// =============================================================
// Style application
// =============================================================

fn fill(ctx: &CanvasRenderingContext2d, style: &PathStyle, rule: CanvasWindingRule) {
    if let Some(color) = style.fill {
        if style.fill_opacity > 0.0 {
            ctx.set_global_alpha(style.fill_opacity);
            ctx.set_fill_style_str(color);
            ctx.fill_with_canvas_winding_rule(rule);
        }
    }
}

fn stroke(ctx: &CanvasRenderingContext2d, style: &PathStyle) {
    if let Some(color) = style.stroke {
        if style.weight > 0.0 && style.opacity > 0.0 {
            ctx.set_global_alpha(style.opacity);
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(style.weight);
            ctx.set_line_join("round");
            ctx.set_line_cap("round");
            ctx.stroke();
        }
    }
}
