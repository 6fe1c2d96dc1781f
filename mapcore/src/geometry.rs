//! GeoJSON geometry model: positions, geometries, features, and bounds.
//!
//! Stored drawings and district boundaries both arrive as GeoJSON. This module
//! owns the typed representation of that wire format plus the small amount of
//! coordinate math the views need (bounds, translation, ring extraction).
//!
//! Positions are `[lng, lat]` in GeoJSON order. A third member (altitude) is
//! accepted on input and dropped.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors produced while parsing or interpreting GeoJSON.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// A position array had fewer than two numbers.
    #[error("position needs at least two numbers, got {0}")]
    ShortPosition(usize),

    /// The JSON was syntactically valid but not the expected shape.
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The object has no string `type` member.
    #[error("GeoJSON object is missing a string `type` member")]
    MissingType,

    /// The `type` member names something other than a geometry, Feature, or FeatureCollection.
    #[error("unsupported GeoJSON type `{0}`")]
    UnsupportedType(String),

    /// The stored value was neither a JSON object nor a string holding one.
    #[error("GeoJSON must be an object or a string containing one")]
    NotAnObject,
}

// =============================================================
// Positions
// =============================================================

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Return this position shifted by the given deltas.
    #[must_use]
    pub fn offset(self, d_lng: f64, d_lat: f64) -> Self {
        Self { lng: self.lng + d_lng, lat: self.lat + d_lat }
    }
}

impl TryFrom<Vec<f64>> for LngLat {
    type Error = GeometryError;

    fn try_from(raw: Vec<f64>) -> Result<Self, Self::Error> {
        match raw.as_slice() {
            [lng, lat, ..] => Ok(Self { lng: *lng, lat: *lat }),
            _ => Err(GeometryError::ShortPosition(raw.len())),
        }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

/// A closed ring of positions (first == last in well-formed input).
pub type Ring = Vec<LngLat>;

// =============================================================
// Geometry
// =============================================================

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: LngLat },
    MultiPoint { coordinates: Vec<LngLat> },
    LineString { coordinates: Vec<LngLat> },
    MultiLineString { coordinates: Vec<Vec<LngLat>> },
    /// `coordinates[0]` is the outer ring; the rest are holes.
    Polygon { coordinates: Vec<Ring> },
    /// One `[outer, ...holes]` entry per constituent polygon.
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// The GeoJSON `type` name, e.g. `"Polygon"`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::LineString { .. } => "LineString",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Whether this is a Polygon or MultiPolygon.
    #[must_use]
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Self::Polygon { .. } | Self::MultiPolygon { .. })
    }

    /// The single position of a Point geometry.
    #[must_use]
    pub fn as_point(&self) -> Option<LngLat> {
        match self {
            Self::Point { coordinates } => Some(*coordinates),
            _ => None,
        }
    }

    /// Outer ring of every constituent polygon, in input order.
    ///
    /// Holes of the source polygons are not included. Non-polygonal
    /// geometries contribute nothing.
    #[must_use]
    pub fn outer_rings(&self) -> Vec<&Ring> {
        match self {
            Self::Polygon { coordinates } => coordinates.first().into_iter().collect(),
            Self::MultiPolygon { coordinates } => coordinates.iter().filter_map(|poly| poly.first()).collect(),
            _ => Vec::new(),
        }
    }

    /// Call `f` for every position in the geometry.
    pub fn for_each_position(&self, f: &mut impl FnMut(LngLat)) {
        match self {
            Self::Point { coordinates } => f(*coordinates),
            Self::MultiPoint { coordinates } | Self::LineString { coordinates } => {
                coordinates.iter().copied().for_each(f);
            }
            Self::MultiLineString { coordinates } | Self::Polygon { coordinates } => {
                coordinates.iter().flatten().copied().for_each(f);
            }
            Self::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().copied().for_each(f);
            }
            Self::GeometryCollection { geometries } => {
                for g in geometries {
                    g.for_each_position(f);
                }
            }
        }
    }

    /// Shift every position by `(d_lng, d_lat)`.
    pub fn translate(&mut self, d_lng: f64, d_lat: f64) {
        let shift = |p: &mut LngLat| *p = p.offset(d_lng, d_lat);
        match self {
            Self::Point { coordinates } => shift(coordinates),
            Self::MultiPoint { coordinates } | Self::LineString { coordinates } => {
                coordinates.iter_mut().for_each(shift);
            }
            Self::MultiLineString { coordinates } | Self::Polygon { coordinates } => {
                coordinates.iter_mut().flatten().for_each(shift);
            }
            Self::MultiPolygon { coordinates } => {
                coordinates.iter_mut().flatten().flatten().for_each(shift);
            }
            Self::GeometryCollection { geometries } => {
                for g in geometries {
                    g.translate(d_lng, d_lat);
                }
            }
        }
    }

    /// Bounding box of all positions. Empty (invalid) bounds for an empty geometry.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        self.for_each_position(&mut |p| b.extend(p));
        b
    }
}

// =============================================================
// Features
// =============================================================

/// A GeoJSON Feature. `geometry` may be null on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Value,
}

impl Feature {
    /// Wrap a geometry in a Feature with empty properties.
    #[must_use]
    pub fn bare(geometry: Geometry) -> Self {
        Self { geometry: Some(geometry), properties: Value::Object(serde_json::Map::new()) }
    }

    /// String property lookup.
    #[must_use]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Any GeoJSON object a stored drawing may contain.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl GeoJson {
    /// Parse a GeoJSON object, dispatching on its `type` member.
    ///
    /// A JSON string holding GeoJSON text is also accepted, since the backend
    /// stores drawings as text.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] when the value is not GeoJSON this crate understands.
    pub fn from_value(value: &Value) -> Result<Self, GeometryError> {
        match value {
            Value::String(text) => {
                let inner: Value = serde_json::from_str(text)?;
                if inner.is_string() {
                    return Err(GeometryError::NotAnObject);
                }
                Self::from_value(&inner)
            }
            Value::Object(obj) => {
                let kind = obj
                    .get("type")
                    .and_then(Value::as_str)
                    .ok_or(GeometryError::MissingType)?;
                match kind {
                    "Feature" => Ok(Self::Feature(Feature::deserialize(value)?)),
                    "FeatureCollection" => Ok(Self::FeatureCollection(FeatureCollection::deserialize(value)?)),
                    "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon"
                    | "GeometryCollection" => Ok(Self::Geometry(Geometry::deserialize(value)?)),
                    other => Err(GeometryError::UnsupportedType(other.to_owned())),
                }
            }
            _ => Err(GeometryError::NotAnObject),
        }
    }

    /// Flatten into features. A bare geometry becomes one property-less feature.
    #[must_use]
    pub fn into_features(self) -> Vec<Feature> {
        match self {
            Self::Geometry(g) => vec![Feature::bare(g)],
            Self::Feature(f) => vec![f],
            Self::FeatureCollection(fc) => fc.features,
        }
    }

    /// Flatten into the non-null geometries it contains.
    #[must_use]
    pub fn into_geometries(self) -> Vec<Geometry> {
        self.into_features()
            .into_iter()
            .filter_map(|f| f.geometry)
            .collect()
    }
}

// =============================================================
// Bounds
// =============================================================

/// Axis-aligned lng/lat bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: LngLat,
    pub max: LngLat,
}

impl Bounds {
    /// Bounds containing nothing; `extend` grows it.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: LngLat::new(f64::INFINITY, f64::INFINITY),
            max: LngLat::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Grow to include `p`.
    pub fn extend(&mut self, p: LngLat) {
        self.min.lng = self.min.lng.min(p.lng);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
    }

    /// Smallest bounds containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let mut out = self;
        if other.is_valid() {
            out.extend(other.min);
            out.extend(other.max);
        }
        out
    }

    /// Finite and non-inverted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.min.lng, self.min.lat, self.max.lng, self.max.lat]
            .iter()
            .all(|v| v.is_finite())
            && self.min.lng <= self.max.lng
            && self.min.lat <= self.max.lat
    }

    /// Valid but with zero extent on both axes (a single point).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.is_valid() && self.min.lng == self.max.lng && self.min.lat == self.max.lat
    }

    #[must_use]
    pub fn center(&self) -> LngLat {
        LngLat::new((self.min.lng + self.max.lng) * 0.5, (self.min.lat + self.max.lat) * 0.5)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================
// geo interop
// =============================================================

/// Convert a ring into a `geo` line string.
#[must_use]
pub fn ring_to_geo(ring: &[LngLat]) -> geo::LineString<f64> {
    ring.iter()
        .map(|p| geo::Coord { x: p.lng, y: p.lat })
        .collect()
}

/// Convert a `geo` line string back into a ring.
#[must_use]
pub fn ring_from_geo(line: &geo::LineString<f64>) -> Ring {
    line.coords().map(|c| LngLat::new(c.x, c.y)).collect()
}
