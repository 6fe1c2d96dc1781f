//! Replace-all persistence of an edit layer's drawings.
//!
//! Saving reads the layer's current primitives, strips them to bare GeoJSON
//! geometry, and submits them as one batch that overwrites every drawing the
//! project had before. There is no partial update.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ProjectApi};
use crate::doc::ProjectId;
use crate::geometry::{Feature, Geometry};
use crate::layer::{Owner, RenderedLayer};

/// One drawing as sent to the batch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrawing {
    pub geojson: Feature,
    /// Lower-cased geometry type, e.g. `"polygon"`.
    pub drawing_type: String,
}

impl NewDrawing {
    #[must_use]
    pub fn from_geometry(geometry: Geometry) -> Self {
        let drawing_type = geometry.type_name().to_lowercase();
        Self { geojson: Feature::bare(geometry), drawing_type }
    }
}

/// Body of `POST projects/{id}/drawings/batch`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawingBatch {
    pub drawings: Vec<NewDrawing>,
}

impl DrawingBatch {
    /// Build a batch from arbitrary features. Properties are dropped and
    /// features without geometry are skipped.
    #[must_use]
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let drawings = features
            .into_iter()
            .filter_map(|f| f.geometry)
            .map(NewDrawing::from_geometry)
            .collect();
        Self { drawings }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }
}

/// Why a save did not happen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("select a project first")]
    NoProject,

    #[error("there are no drawings on the map to save")]
    EmptyLayer,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Convert the primitives of `project_id` and the shapes drawn this session
/// into wire drawings, in paint order. Other projects' drawings on the same
/// layer are left out.
///
/// # Errors
///
/// Returns [`PersistError::EmptyLayer`] when there is nothing to save.
pub fn build_batch(layer: &RenderedLayer, project_id: ProjectId) -> Result<DrawingBatch, PersistError> {
    let owners = [Owner::Project(project_id), Owner::Drawn];
    let batch = DrawingBatch::from_features(layer.to_features_for(&owners));
    if batch.is_empty() {
        return Err(PersistError::EmptyLayer);
    }
    Ok(batch)
}

/// Replace the stored drawings of `project_id` with what `layer` shows.
///
/// Validation happens before any network call. Returns the number of
/// drawings saved.
///
/// # Errors
///
/// Returns a [`PersistError`] when no project is chosen, the layer is
/// empty, or the backend call fails.
pub async fn save(
    api: &dyn ProjectApi,
    project_id: Option<ProjectId>,
    layer: &RenderedLayer,
) -> Result<usize, PersistError> {
    let id = project_id.ok_or(PersistError::NoProject)?;
    let batch = build_batch(layer, id)?;
    api.save_drawings(id, &batch).await?;
    log::info!("saved {} drawings for project {id}", batch.len());
    Ok(batch.len())
}
