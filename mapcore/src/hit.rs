#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use geo::Contains;

use crate::camera::{Point, Viewport};
use crate::consts::HIT_SLOP_PX;
use crate::geometry::{Geometry, LngLat, Ring};
use crate::layer::{Primitive, PrimitiveId, RenderedLayer, Shape};

/// Topmost interactive primitive of `layer` under the screen point `pt`.
#[must_use]
pub fn hit_test(layer: &RenderedLayer, viewport: &Viewport, pt: Point) -> Option<PrimitiveId> {
    layer
        .sorted()
        .into_iter()
        .rev()
        .filter(|p| p.interactive)
        .find(|p| primitive_hit(p, viewport, pt))
        .map(|p| p.id)
}

fn primitive_hit(primitive: &Primitive, viewport: &Viewport, pt: Point) -> bool {
    match &primitive.shape {
        Shape::Marker(pos) => marker_hit(*pos, primitive.style.radius, viewport, pt),
        Shape::Path(geometry) => geometry_hit(geometry, viewport, pt),
    }
}

fn marker_hit(pos: LngLat, radius: f64, viewport: &Viewport, pt: Point) -> bool {
    viewport.project(pos).distance(pt) <= radius.max(HIT_SLOP_PX)
}

fn geometry_hit(geometry: &Geometry, viewport: &Viewport, pt: Point) -> bool {
    match geometry {
        Geometry::Point { coordinates } => marker_hit(*coordinates, 0.0, viewport, pt),
        Geometry::MultiPoint { coordinates } => coordinates.iter().any(|c| marker_hit(*c, 0.0, viewport, pt)),
        Geometry::LineString { coordinates } => near_polyline(coordinates, viewport, pt),
        Geometry::MultiLineString { coordinates } => coordinates.iter().any(|l| near_polyline(l, viewport, pt)),
        Geometry::Polygon { coordinates } => polygon_hit(coordinates, viewport, pt),
        Geometry::MultiPolygon { coordinates } => coordinates.iter().any(|poly| polygon_hit(poly, viewport, pt)),
        Geometry::GeometryCollection { geometries } => geometries.iter().any(|g| geometry_hit(g, viewport, pt)),
    }
}

/// Inside the filled area (holes excluded) or within slop of any ring.
fn polygon_hit(rings: &[Ring], viewport: &Viewport, pt: Point) -> bool {
    let Some((outer, holes)) = rings.split_first() else {
        return false;
    };
    let screen_ring = |ring: &Ring| -> geo::LineString<f64> {
        ring.iter()
            .map(|p| {
                let s = viewport.project(*p);
                geo::Coord { x: s.x, y: s.y }
            })
            .collect()
    };
    let polygon = geo::Polygon::new(screen_ring(outer), holes.iter().map(screen_ring).collect());
    polygon.contains(&geo::Point::new(pt.x, pt.y)) || rings.iter().any(|r| near_polyline(r, viewport, pt))
}

fn near_polyline(line: &[LngLat], viewport: &Viewport, pt: Point) -> bool {
    let projected: Vec<Point> = line.iter().map(|p| viewport.project(*p)).collect();
    match projected.as_slice() {
        [] => false,
        [only] => only.distance(pt) <= HIT_SLOP_PX,
        _ => projected
            .windows(2)
            .any(|seg| segment_distance(pt, seg[0], seg[1]) <= HIT_SLOP_PX),
    }
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
