//! Cut-out mask: the world minus the selected districts.
//!
//! The detail view darkens everything outside the selection with a single
//! polygon whose outer ring spans the whole coordinate range and whose holes
//! are the outer rings of every selected district. Source holes (lakes,
//! enclaves) are dropped; the mask only needs each district's silhouette.
//!
//! Rings are re-oriented before output (outer counter-clockwise, holes
//! clockwise) so the result fills correctly under either the non-zero or the
//! even-odd rule. The canvas renderer additionally fills with even-odd.

#[cfg(test)]
#[path = "mask_test.rs"]
mod mask_test;

use geo::algorithm::orient::{Direction, Orient};

use crate::doc::DistrictFeature;
use crate::geometry::{Geometry, LngLat, Ring, ring_from_geo, ring_to_geo};

/// Axis-aligned rectangle covering ±180 longitude and ±90 latitude.
#[must_use]
pub fn world_ring() -> Ring {
    vec![
        LngLat::new(-180.0, -90.0),
        LngLat::new(-180.0, 90.0),
        LngLat::new(180.0, 90.0),
        LngLat::new(180.0, -90.0),
        LngLat::new(-180.0, -90.0),
    ]
}

/// Outer ring of every constituent polygon across `features`, in input order.
///
/// Features whose boundary is neither a Polygon nor a MultiPolygon contribute
/// nothing.
pub fn mask_holes<'a>(features: impl IntoIterator<Item = &'a DistrictFeature>) -> Vec<Ring> {
    features
        .into_iter()
        .flat_map(|f| f.boundary.outer_rings())
        .cloned()
        .collect()
}

/// Compute the mask polygon for the given districts.
///
/// Returns `None` when no hole could be collected (no features, or only
/// non-polygonal ones): a mask without holes would black out the whole map,
/// so callers treat that as "no mask".
pub fn compute_mask<'a>(features: impl IntoIterator<Item = &'a DistrictFeature>) -> Option<Geometry> {
    let holes = mask_holes(features);
    if holes.is_empty() {
        return None;
    }

    let polygon = geo::Polygon::new(ring_to_geo(&world_ring()), holes.iter().map(|h| ring_to_geo(h)).collect())
        .orient(Direction::Default);

    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(ring_from_geo(polygon.exterior()));
    rings.extend(polygon.interiors().iter().map(ring_from_geo));
    Some(Geometry::Polygon { coordinates: rings })
}
