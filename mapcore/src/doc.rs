//! Document model: districts, projects, and their stored drawings.
//!
//! This module defines the reference data the views read (`DistrictFeature`,
//! held in a `DistrictCatalog` loaded once at startup) and the backend-owned
//! records the annotation layers render (`Project`, `Drawing`). Projects are a
//! read/write-through cache of the backend; nothing here is the source of
//! truth.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::geometry::{FeatureCollection, GeoJson, Geometry, GeometryError};

/// Backend identifier for a project.
pub type ProjectId = i64;

/// Property holding the district name in the boundary catalog.
pub const DISTRICT_NAME_PROPERTY: &str = "distrito";

// =============================================================
// Districts
// =============================================================

/// A named administrative boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictFeature {
    /// Unique district name.
    pub name: String,
    /// Polygon or MultiPolygon boundary.
    pub boundary: Geometry,
}

/// Errors produced while loading the district catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog JSON was not a FeatureCollection.
    #[error("district catalog is not a FeatureCollection: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two features share the same district name.
    #[error("duplicate district `{0}` in catalog")]
    Duplicate(String),
}

/// Immutable collection of district boundaries, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct DistrictCatalog {
    districts: Vec<DistrictFeature>,
    index: HashMap<String, usize>,
}

impl DistrictCatalog {
    /// Build a catalog from already-typed districts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Duplicate`] when two districts share a name.
    pub fn new(districts: Vec<DistrictFeature>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(districts.len());
        for (i, d) in districts.iter().enumerate() {
            if index.insert(d.name.clone(), i).is_some() {
                return Err(CatalogError::Duplicate(d.name.clone()));
            }
        }
        Ok(Self { districts, index })
    }

    /// Load from a GeoJSON FeatureCollection whose features carry the name in
    /// the `distrito` property.
    ///
    /// Features without a name or with a non-polygonal geometry are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the value is not a FeatureCollection or
    /// names repeat.
    pub fn from_geojson(value: &Value) -> Result<Self, CatalogError> {
        let collection = FeatureCollection::deserialize(value)?;
        let mut districts = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let Some(name) = feature.property_str(DISTRICT_NAME_PROPERTY).map(str::to_owned) else {
                log::warn!("district feature without `{DISTRICT_NAME_PROPERTY}` property skipped");
                continue;
            };
            match feature.geometry {
                Some(boundary) if boundary.is_polygonal() => districts.push(DistrictFeature { name, boundary }),
                _ => log::warn!("district `{name}` has no polygonal boundary; skipped"),
            }
        }
        Self::new(districts)
    }

    /// Look up a district by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DistrictFeature> {
        self.index.get(name).map(|&i| &self.districts[i])
    }

    /// Whether a district with this name is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Districts in load order.
    pub fn iter(&self) -> impl Iterator<Item = &DistrictFeature> {
        self.districts.iter()
    }

    /// District names sorted alphabetically, for pick lists.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.districts.iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Number of districts loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    /// Returns `true` if no districts are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

// =============================================================
// Projects
// =============================================================

/// Lifecycle status of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
    Completed,
    Archived,
    /// A status this client does not know; kept verbatim.
    Other(String),
}

impl ProjectStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Other(s) => s,
        }
    }

    /// Parse a lower-case status name. Unknown names become [`ProjectStatus::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "completed" => Self::Completed,
            "archived" => Self::Archived,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A stored annotation belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Backend row id, absent for drawings not yet saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// GeoJSON, either as an object or as a string holding JSON text.
    pub geojson: Value,
    /// Geometry type name as recorded at save time.
    #[serde(default)]
    pub drawing_type: String,
}

impl Drawing {
    /// Parse the stored GeoJSON into geometries.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] when the stored value cannot be parsed.
    pub fn geometries(&self) -> Result<Vec<Geometry>, GeometryError> {
        Ok(GeoJson::from_value(&self.geojson)?.into_geometries())
    }
}

/// A project as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Names of the districts this project is scoped to.
    #[serde(default)]
    pub districts: Vec<String>,
    #[serde(default)]
    pub drawings: Vec<Drawing>,
}

/// Errors raised by local validation before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("project name is required")]
    EmptyName,
    #[error("select at least one district")]
    NoDistricts,
}

/// Create/update body for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub districts: Vec<String>,
}

impl ProjectDraft {
    /// Trim the name and description and check required fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name is blank or no district is chosen.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_owned();
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.districts.retain(|d| !d.trim().is_empty());
        if self.districts.is_empty() {
            return Err(ValidationError::NoDistricts);
        }
        self.description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        Ok(self)
    }
}
