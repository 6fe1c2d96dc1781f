#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn square(x0: f64, y0: f64, size: f64) -> Ring {
    vec![
        LngLat::new(x0, y0),
        LngLat::new(x0 + size, y0),
        LngLat::new(x0 + size, y0 + size),
        LngLat::new(x0, y0 + size),
        LngLat::new(x0, y0),
    ]
}

// =============================================================
// Positions
// =============================================================

#[test]
fn position_serializes_as_lng_lat_pair() {
    let json = serde_json::to_value(LngLat::new(-77.04, -12.05)).unwrap();
    assert_eq!(json, json!([-77.04, -12.05]));
}

#[test]
fn position_drops_altitude() {
    let p: LngLat = serde_json::from_value(json!([-77.0, -12.0, 150.0])).unwrap();
    assert_eq!(p, LngLat::new(-77.0, -12.0));
}

#[test]
fn position_rejects_single_number() {
    let err = serde_json::from_value::<LngLat>(json!([1.0])).unwrap_err();
    assert!(err.to_string().contains("at least two"));
}

// =============================================================
// Geometry serde
// =============================================================

#[test]
fn polygon_round_trips_with_type_tag() {
    let poly = Geometry::Polygon { coordinates: vec![square(0.0, 0.0, 1.0)] };
    let value = serde_json::to_value(&poly).unwrap();
    assert_eq!(value["type"], "Polygon");
    assert_eq!(value["coordinates"][0][1], json!([1.0, 0.0]));
    let back: Geometry = serde_json::from_value(value).unwrap();
    assert_eq!(back, poly);
}

#[test]
fn type_name_matches_geojson() {
    assert_eq!(Geometry::Point { coordinates: LngLat::new(0.0, 0.0) }.type_name(), "Point");
    assert_eq!(Geometry::MultiPolygon { coordinates: vec![] }.type_name(), "MultiPolygon");
    assert_eq!(Geometry::LineString { coordinates: vec![] }.type_name(), "LineString");
}

// =============================================================
// Outer rings
// =============================================================

#[test]
fn polygon_outer_ring_ignores_holes() {
    let poly = Geometry::Polygon { coordinates: vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 1.0)] };
    let rings = poly.outer_rings();
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0][2], LngLat::new(10.0, 10.0));
}

#[test]
fn multipolygon_yields_one_ring_per_part() {
    let mp = Geometry::MultiPolygon {
        coordinates: vec![
            vec![square(0.0, 0.0, 1.0), square(0.2, 0.2, 0.1)],
            vec![square(5.0, 5.0, 1.0)],
            vec![square(9.0, 9.0, 1.0)],
        ],
    };
    assert_eq!(mp.outer_rings().len(), 3);
}

#[test]
fn line_has_no_outer_rings() {
    let line = Geometry::LineString { coordinates: vec![LngLat::new(0.0, 0.0), LngLat::new(1.0, 1.0)] };
    assert!(line.outer_rings().is_empty());
}

// =============================================================
// Bounds and translation
// =============================================================

#[test]
fn bounds_cover_all_positions() {
    let poly = Geometry::Polygon { coordinates: vec![square(-77.1, -12.2, 0.1)] };
    let b = poly.bounds();
    assert!(b.is_valid());
    assert!((b.min.lng + 77.1).abs() < 1e-12);
    assert!((b.max.lat + 12.1).abs() < 1e-12);
}

#[test]
fn empty_bounds_are_invalid() {
    let b = Geometry::MultiPoint { coordinates: vec![] }.bounds();
    assert!(!b.is_valid());
    assert!(!b.is_degenerate());
}

#[test]
fn point_bounds_are_degenerate() {
    let b = Geometry::Point { coordinates: LngLat::new(3.0, 4.0) }.bounds();
    assert!(b.is_valid());
    assert!(b.is_degenerate());
    assert_eq!(b.center(), LngLat::new(3.0, 4.0));
}

#[test]
fn union_ignores_invalid_side() {
    let a = Geometry::Point { coordinates: LngLat::new(1.0, 1.0) }.bounds();
    let u = a.union(Bounds::empty());
    assert_eq!(u, a);
}

#[test]
fn translate_shifts_every_vertex() {
    let mut poly = Geometry::Polygon { coordinates: vec![square(0.0, 0.0, 1.0)] };
    poly.translate(0.5, -0.25);
    let b = poly.bounds();
    assert_eq!(b.min, LngLat::new(0.5, -0.25));
    assert_eq!(b.max, LngLat::new(1.5, 0.75));
}

// =============================================================
// GeoJson dispatch
// =============================================================

#[test]
fn parses_bare_geometry() {
    let parsed = GeoJson::from_value(&json!({ "type": "Point", "coordinates": [1.0, 2.0] })).unwrap();
    assert_eq!(parsed, GeoJson::Geometry(Geometry::Point { coordinates: LngLat::new(1.0, 2.0) }));
}

#[test]
fn parses_string_encoded_feature() {
    let text = r#"{"type":"Feature","properties":{"k":1},"geometry":{"type":"Point","coordinates":[1,2]}}"#;
    let parsed = GeoJson::from_value(&json!(text)).unwrap();
    let features = parsed.into_features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].properties["k"], 1);
}

#[test]
fn parses_feature_collection_into_geometries() {
    let value = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [0, 0] } },
            { "type": "Feature", "properties": {}, "geometry": null },
            { "type": "Feature", "properties": {}, "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] } },
        ]
    });
    let geoms = GeoJson::from_value(&value).unwrap().into_geometries();
    assert_eq!(geoms.len(), 2);
}

#[test]
fn rejects_unknown_type() {
    let err = GeoJson::from_value(&json!({ "type": "Circle", "radius": 4 })).unwrap_err();
    assert!(matches!(err, GeometryError::UnsupportedType(ref t) if t == "Circle"));
}

#[test]
fn rejects_missing_type() {
    let err = GeoJson::from_value(&json!({ "coordinates": [0, 0] })).unwrap_err();
    assert!(matches!(err, GeometryError::MissingType));
}

#[test]
fn rejects_garbage_string() {
    let err = GeoJson::from_value(&json!("{not json")).unwrap_err();
    assert!(matches!(err, GeometryError::Json(_)));
}

#[test]
fn rejects_numbers() {
    assert!(matches!(GeoJson::from_value(&json!(42)), Err(GeometryError::NotAnObject)));
}

#[test]
fn bare_feature_serializes_with_type_and_empty_properties() {
    let f = Feature::bare(Geometry::Point { coordinates: LngLat::new(1.0, 2.0) });
    let value = serde_json::to_value(&f).unwrap();
    assert_eq!(value["type"], "Feature");
    assert_eq!(value["properties"], json!({}));
    assert_eq!(value["geometry"]["type"], "Point");
}

#[test]
fn geo_ring_round_trip_preserves_coordinates() {
    let ring = square(1.0, 2.0, 3.0);
    assert_eq!(ring_from_geo(&ring_to_geo(&ring)), ring);
}
