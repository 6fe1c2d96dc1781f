//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};

use serde_json::Value;

use crate::api::{ApiError, ProjectApi};
use crate::doc::{Drawing, Project, ProjectDraft, ProjectId};
use crate::notify::{Notice, Notifier};
use crate::persistence::DrawingBatch;
use crate::selection::split_label;

/// Backend fake holding projects in memory. Batch saves replace drawings.
#[derive(Default)]
pub struct FakeApi {
    pub projects: RefCell<Vec<Project>>,
    pub catalog: Value,
    /// When set, every call fails with this error.
    pub fail_with: RefCell<Option<ApiError>>,
    pub saved: RefCell<Vec<(ProjectId, DrawingBatch)>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self { projects: RefCell::new(projects), ..Self::default() }
    }

    pub fn fail(&self, err: ApiError) {
        *self.fail_with.borrow_mut() = Some(err);
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }

    fn enter(&self, name: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(name.to_owned());
        match self.fail_with.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, r#"{"detail":"Project not found"}"#.into())
    }
}

#[async_trait::async_trait(?Send)]
impl ProjectApi for FakeApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.enter("list_projects")?;
        Ok(self.projects.borrow().clone())
    }

    async fn fetch_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.enter("fetch_project")?;
        self.projects
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn fetch_district_projects(&self, label: &str) -> Result<Vec<Project>, ApiError> {
        self.enter("fetch_district_projects")?;
        let names = split_label(label);
        Ok(self
            .projects
            .borrow()
            .iter()
            .filter(|p| p.districts.iter().any(|d| names.contains(d)))
            .cloned()
            .collect())
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.enter("create_project")?;
        let mut projects = self.projects.borrow_mut();
        let id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let project = Project {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            status: draft.status.clone(),
            districts: draft.districts.clone(),
            drawings: Vec::new(),
        };
        projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.enter("update_project")?;
        let mut projects = self.projects.borrow_mut();
        let project = projects.iter_mut().find(|p| p.id == id).ok_or_else(Self::not_found)?;
        project.name.clone_from(&draft.name);
        project.description.clone_from(&draft.description);
        project.status = draft.status.clone();
        project.districts.clone_from(&draft.districts);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), ApiError> {
        self.enter("delete_project")?;
        let mut projects = self.projects.borrow_mut();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn save_drawings(&self, id: ProjectId, batch: &DrawingBatch) -> Result<(), ApiError> {
        self.enter("save_drawings")?;
        let mut projects = self.projects.borrow_mut();
        let project = projects.iter_mut().find(|p| p.id == id).ok_or_else(Self::not_found)?;
        project.drawings = batch
            .drawings
            .iter()
            .map(|d| Drawing {
                id: None,
                geojson: serde_json::to_value(&d.geojson).unwrap_or_default(),
                drawing_type: d.drawing_type.clone(),
            })
            .collect();
        self.saved.borrow_mut().push((id, batch.clone()));
        Ok(())
    }

    async fn fetch_district_catalog(&self) -> Result<Value, ApiError> {
        self.enter("fetch_district_catalog")?;
        Ok(self.catalog.clone())
    }
}

/// Notifier that records everything and answers confirmations with `answer`.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
    pub logins: Cell<usize>,
    pub confirms: RefCell<Vec<String>>,
    pub answer: Cell<bool>,
}

impl RecordingNotifier {
    pub fn confirming() -> Self {
        let n = Self::default();
        n.answer.set(true);
        n
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn prompt_login(&self) {
        self.logins.set(self.logins.get() + 1);
    }

    fn confirm(&self, question: &str) -> bool {
        self.confirms.borrow_mut().push(question.to_owned());
        self.answer.get()
    }
}
