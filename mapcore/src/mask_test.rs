use geo::Winding;

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

fn polygon_district(name: &str, x0: f64) -> DistrictFeature {
    DistrictFeature { name: name.into(), boundary: Geometry::Polygon { coordinates: vec![square(x0, 0.0, 1.0)] } }
}

fn rings(mask: &Geometry) -> &Vec<Ring> {
    match mask {
        Geometry::Polygon { coordinates } => coordinates,
        other => panic!("mask must be a polygon, got {}", other.type_name()),
    }
}

#[test]
fn no_features_means_no_mask() {
    assert!(compute_mask(std::iter::empty()).is_none());
}

#[test]
fn single_polygon_has_one_hole() {
    let lima = polygon_district("Lima", 0.0);
    let mask = compute_mask([&lima]).unwrap();
    assert_eq!(rings(&mask).len(), 2);
}

#[test]
fn two_polygons_have_two_holes() {
    let lima = polygon_district("Lima", 0.0);
    let callao = polygon_district("Callao", 5.0);
    let mask = compute_mask([&lima, &callao]).unwrap();
    assert_eq!(rings(&mask).len(), 3);
}

#[test]
fn multipolygon_contributes_each_part_and_drops_source_holes() {
    let callao = DistrictFeature {
        name: "Callao".into(),
        boundary: Geometry::MultiPolygon {
            coordinates: vec![
                vec![square(0.0, 0.0, 4.0), square(1.0, 1.0, 1.0)],
                vec![square(10.0, 0.0, 1.0)],
                vec![square(20.0, 0.0, 1.0)],
            ],
        },
    };
    let lima = polygon_district("Lima", 30.0);
    let mask = compute_mask([&callao, &lima]).unwrap();
    // world + 3 Callao parts + 1 Lima
    assert_eq!(rings(&mask).len(), 5);
}

#[test]
fn removing_a_district_removes_only_its_holes() {
    let lima = polygon_district("Lima", 0.0);
    let callao = polygon_district("Callao", 5.0);
    let both = mask_holes([&lima, &callao]);
    let only_lima = mask_holes([&lima]);
    assert_eq!(both.len(), 2);
    assert_eq!(only_lima, vec![both[0].clone()]);
}

#[test]
fn non_polygonal_features_are_skipped() {
    let point = DistrictFeature {
        name: "Pin".into(),
        boundary: Geometry::Point { coordinates: LngLat::new(0.0, 0.0) },
    };
    assert!(compute_mask([&point]).is_none());

    let lima = polygon_district("Lima", 0.0);
    let mask = compute_mask([&point, &lima]).unwrap();
    assert_eq!(rings(&mask).len(), 2);
}

#[test]
fn outer_ring_is_the_world() {
    let lima = polygon_district("Lima", 0.0);
    let mask = compute_mask([&lima]).unwrap();
    let b = Geometry::Polygon { coordinates: vec![rings(&mask)[0].clone()] }.bounds();
    assert_eq!(b.min, LngLat::new(-180.0, -90.0));
    assert_eq!(b.max, LngLat::new(180.0, 90.0));
}

#[test]
fn holes_are_wound_opposite_to_the_world_ring() {
    // Input hole is counter-clockwise, same as the world ring would be.
    let lima = polygon_district("Lima", 0.0);
    assert!(ring_to_geo(&lima.boundary.outer_rings()[0]).is_ccw());

    let mask = compute_mask([&lima]).unwrap();
    let r = rings(&mask);
    assert!(ring_to_geo(&r[0]).is_ccw());
    assert!(ring_to_geo(&r[1]).is_cw());
}

#[test]
fn clockwise_input_is_normalized_too() {
    let mut ring = square(0.0, 0.0, 1.0);
    ring.reverse();
    let lima = DistrictFeature { name: "Lima".into(), boundary: Geometry::Polygon { coordinates: vec![ring] } };
    let mask = compute_mask([&lima]).unwrap();
    assert!(ring_to_geo(&rings(&mask)[1]).is_cw());
}
