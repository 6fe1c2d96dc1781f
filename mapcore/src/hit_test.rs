use super::*;
use crate::layer::Owner;
use crate::style::PathStyle;

fn viewport() -> Viewport {
    let mut vp = Viewport::new(LngLat::new(0.0, 0.0), 10.0);
    vp.resize(800.0, 600.0);
    vp
}

/// Square ring of `half` degrees around `(cx, cy)`.
fn square(cx: f64, cy: f64, half: f64) -> Ring {
    vec![
        LngLat::new(cx - half, cy - half),
        LngLat::new(cx + half, cy - half),
        LngLat::new(cx + half, cy + half),
        LngLat::new(cx - half, cy + half),
        LngLat::new(cx - half, cy - half),
    ]
}

fn district(rings: Vec<Ring>, name: &str) -> Primitive {
    Primitive::path(
        Geometry::Polygon { coordinates: rings },
        PathStyle::district_default(),
        Owner::District(name.into()),
    )
}

#[test]
fn empty_layer_hits_nothing() {
    let vp = viewport();
    assert!(hit_test(&RenderedLayer::new(), &vp, Point::new(400.0, 300.0)).is_none());
}

#[test]
fn point_inside_polygon_hits() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    let id = layer.add(district(vec![square(0.0, 0.0, 0.1)], "Lima"));
    assert_eq!(hit_test(&layer, &vp, Point::new(400.0, 300.0)), Some(id));
}

#[test]
fn point_outside_polygon_misses() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    layer.add(district(vec![square(0.0, 0.0, 0.01)], "Lima"));
    assert!(hit_test(&layer, &vp, Point::new(10.0, 10.0)).is_none());
}

#[test]
fn point_in_hole_misses_unless_near_edge() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    layer.add(district(vec![square(0.0, 0.0, 0.5), square(0.0, 0.0, 0.2)], "Lima"));
    assert!(hit_test(&layer, &vp, Point::new(400.0, 300.0)).is_none());
}

#[test]
fn topmost_primitive_wins() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    let below = layer.add(district(vec![square(0.0, 0.0, 0.1)], "Lima"));
    let above = layer.add(district(vec![square(0.0, 0.0, 0.1)], "Callao"));
    assert_eq!(hit_test(&layer, &vp, Point::new(400.0, 300.0)), Some(above));

    layer.bring_to_front(&below);
    assert_eq!(hit_test(&layer, &vp, Point::new(400.0, 300.0)), Some(below));
}

#[test]
fn non_interactive_primitives_are_transparent() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    let below = layer.add(district(vec![square(0.0, 0.0, 0.1)], "Lima"));
    layer.add(district(vec![square(0.0, 0.0, 0.1)], "Outline").non_interactive());
    assert_eq!(hit_test(&layer, &vp, Point::new(400.0, 300.0)), Some(below));
}

#[test]
fn marker_hit_within_radius() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    let id = layer.add(Primitive::marker(LngLat::new(0.0, 0.0), PathStyle::drawing_marker(false), Owner::Drawn));
    assert_eq!(hit_test(&layer, &vp, Point::new(405.0, 303.0)), Some(id));
    assert!(hit_test(&layer, &vp, Point::new(430.0, 300.0)).is_none());
}

#[test]
fn line_hit_within_slop() {
    let vp = viewport();
    let mut layer = RenderedLayer::new();
    let a = vp.unproject(Point::new(300.0, 300.0));
    let b = vp.unproject(Point::new(500.0, 300.0));
    let id = layer.add(Primitive::path(
        Geometry::LineString { coordinates: vec![a, b] },
        PathStyle::drawing(false),
        Owner::Drawn,
    ));
    assert_eq!(hit_test(&layer, &vp, Point::new(400.0, 305.0)), Some(id));
    assert!(hit_test(&layer, &vp, Point::new(400.0, 320.0)).is_none());
    assert!(hit_test(&layer, &vp, Point::new(520.0, 300.0)).is_none());
}

#[test]
fn segment_distance_clamps_to_endpoints() {
    let d = segment_distance(Point::new(-3.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!((d - 5.0).abs() < 1e-12);
    let d = segment_distance(Point::new(5.0, 2.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!((d - 2.0).abs() < 1e-12);
}

#[test]
fn zero_length_segment_measures_to_point() {
    let d = segment_distance(Point::new(3.0, 4.0), Point::new(0.0, 0.0), Point::new(0.0, 0.0));
    assert!((d - 5.0).abs() < 1e-12);
}
