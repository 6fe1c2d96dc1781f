//! Session: owns the engine and its collaborators and runs the flows that
//! need the backend.
//!
//! Every flow is an `async` method on `&mut Session`, so two flows never
//! interleave on one session. Responses are applied as they arrive; a later
//! call simply overwrites what an earlier one set. Notices go straight to the
//! [`Notifier`]; everything the host must draw or show comes back as
//! [`Action`]s.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;
use std::slice;

use crate::api::{ApiError, ProjectApi};
use crate::camera::Point;
use crate::config::EditConfig;
use crate::doc::{DistrictCatalog, Project, ProjectDraft, ProjectId};
use crate::engine::{Action, EngineCore};
use crate::input::Tab;
use crate::notify::{report_api_error, Notice, Notifier};
use crate::persistence::{self, PersistError};
use crate::stats::DistrictStats;
use crate::sync::CardClick;

pub struct Session {
    pub core: EngineCore,
    api: Rc<dyn ProjectApi>,
    notifier: Rc<dyn Notifier>,
    /// Project opened from a card or the project list.
    current: Option<Project>,
    /// Label the district project list was loaded for.
    district_label: Option<String>,
    district_projects: Vec<Project>,
    /// Every project, for the projects tab.
    projects: Vec<Project>,
    deleting: bool,
}

impl Session {
    #[must_use]
    pub fn new(api: Rc<dyn ProjectApi>, notifier: Rc<dyn Notifier>, config: EditConfig) -> Self {
        Self {
            core: EngineCore::new(config),
            api,
            notifier,
            current: None,
            district_label: None,
            district_projects: Vec::new(),
            projects: Vec::new(),
            deleting: false,
        }
    }

    #[must_use]
    pub fn current_project(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn district_projects(&self) -> &[Project] {
        &self.district_projects
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    // =============================================================
    // Loading
    // =============================================================

    /// Fetch the district boundaries and rebuild the overview.
    pub async fn load_catalog(&mut self) -> Vec<Action> {
        let value = match self.api.fetch_district_catalog().await {
            Ok(v) => v,
            Err(e) => {
                report_api_error(&*self.notifier, "Error loading districts", &e);
                return Vec::new();
            }
        };
        match DistrictCatalog::from_geojson(&value) {
            Ok(catalog) => {
                log::info!("loaded {} districts", catalog.len());
                self.core.load_catalog(catalog)
            }
            Err(e) => {
                log::warn!("district catalog rejected: {e}");
                self.notifier.notify(Notice::error(format!("Error loading districts: {e}")));
                Vec::new()
            }
        }
    }

    /// Run the actions that need the backend and pass the rest through.
    ///
    /// Only the last `LoadDistrictProjects` in a batch is fetched. `Notify`
    /// actions are shown through the notifier.
    pub async fn dispatch(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let last_load = actions
            .iter()
            .rposition(|a| matches!(a, Action::LoadDistrictProjects { .. }));
        let mut out = Vec::with_capacity(actions.len());
        for (i, action) in actions.into_iter().enumerate() {
            match action {
                Action::LoadDistrictProjects { label } => {
                    if Some(i) == last_load {
                        out.extend(self.load_district_projects(label.as_deref()).await);
                    }
                }
                Action::Notify(notice) => self.notifier.notify(notice),
                other => out.push(other),
            }
        }
        out
    }

    /// Fetch the projects of the districts in `label` and draw all of them,
    /// unhighlighted, on both maps. `None` clears the list.
    pub async fn load_district_projects(&mut self, label: Option<&str>) -> Vec<Action> {
        let Some(label) = label else {
            self.district_label = None;
            self.district_projects.clear();
            let mut actions = self.clear_highlight();
            actions.extend(self.core.clear_drawings());
            return actions;
        };

        let projects = match self.api.fetch_district_projects(label).await {
            Ok(p) => p,
            Err(e) => {
                report_api_error(&*self.notifier, "Error loading district projects", &e);
                return Vec::new();
            }
        };
        log::info!("{} projects in `{label}`", projects.len());
        self.district_label = Some(label.to_owned());
        self.district_projects = projects;

        let mut actions = self.clear_highlight();
        actions.extend(self.core.show_detail_projects(&self.district_projects, None, false));
        actions.extend(self.core.show_overview_projects(&self.district_projects));
        actions
    }

    /// Refresh the full project list. Returns whether it succeeded.
    pub async fn load_projects(&mut self) -> bool {
        match self.api.list_projects().await {
            Ok(projects) => {
                self.projects = projects;
                true
            }
            Err(e) => {
                report_api_error(&*self.notifier, "Error loading projects", &e);
                false
            }
        }
    }

    // =============================================================
    // Cards and highlight
    // =============================================================

    /// Single click on a district project card: highlight it for editing, or
    /// release it if it was already active.
    ///
    /// The project is fetched unless it is already the current one. If the
    /// fetch fails the previous card stays active.
    pub async fn sidebar_click(&mut self, id: ProjectId) -> Vec<Action> {
        let previous = self.core.sync.active();
        match self.core.sync.card_clicked(id) {
            CardClick::Deactivate => {
                self.current = None;
                let mut actions = vec![Action::CardActivated(None), Action::HighlightChanged { project_id: None }];
                actions.extend(self.core.show_detail_projects(&self.district_projects, None, false));
                actions
            }
            CardClick::Activate(id) => {
                let cached = self.current.as_ref().filter(|p| p.id == id).cloned();
                let project = match cached {
                    Some(p) => p,
                    None => match self.api.fetch_project(id).await {
                        Ok(p) => p,
                        Err(e) => {
                            report_api_error(&*self.notifier, "Error selecting project", &e);
                            self.forget_if_missing(id, &e);
                            return self.core.sync.restore(previous);
                        }
                    },
                };
                let mut actions = self.core.sync.activate(id);
                actions.push(Action::HighlightChanged { project_id: Some(id) });
                actions.extend(self.core.show_detail_projects(slice::from_ref(&project), Some(id), true));
                self.current = Some(project);
                actions
            }
        }
    }

    /// Double click on a card: open the project in the projects tab.
    pub async fn sidebar_double_click(&mut self, id: ProjectId) -> Vec<Action> {
        let mut actions = self.open_project(id).await;
        actions.extend(self.core.switch_tab(Tab::Projects));
        actions
    }

    /// Load a project's details and show its drawings highlighted.
    pub async fn open_project(&mut self, id: ProjectId) -> Vec<Action> {
        let project = match self.api.fetch_project(id).await {
            Ok(p) => p,
            Err(e) => {
                report_api_error(&*self.notifier, "Error loading project details", &e);
                self.forget_if_missing(id, &e);
                return Vec::new();
            }
        };
        let mut actions = self.core.sync.activate(id);
        actions.push(Action::HighlightChanged { project_id: Some(id) });
        actions.extend(self.core.show_detail_projects(slice::from_ref(&project), Some(id), true));
        self.current = Some(project);
        actions
    }

    /// Click on the detail map. Picking another project's primitive makes it
    /// the current project.
    pub fn detail_click(&mut self, pt: Point) -> Vec<Action> {
        let before = self.core.sync.active();
        let actions = self.core.detail_click(pt);
        self.follow_card(before, actions)
    }

    /// Pointer down on the detail map; a drag also follows the card.
    pub fn detail_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let before = self.core.sync.active();
        let actions = self.core.detail_pointer_down(pt);
        self.follow_card(before, actions)
    }

    fn follow_card(&mut self, before: Option<ProjectId>, mut actions: Vec<Action>) -> Vec<Action> {
        let after = self.core.sync.active();
        if after == before {
            return actions;
        }
        if let Some(id) = after {
            if let Some(project) = self.district_projects.iter().find(|p| p.id == id) {
                self.current = Some(project.clone());
            }
            actions.push(Action::HighlightChanged { project_id: Some(id) });
        }
        actions
    }

    /// Drop a project the backend no longer has from the cached lists.
    fn forget_if_missing(&mut self, id: ProjectId, err: &ApiError) {
        if !err.is_not_found() {
            return;
        }
        log::info!("project {id} no longer exists");
        self.district_projects.retain(|p| p.id != id);
        self.projects.retain(|p| p.id != id);
    }

    fn clear_highlight(&mut self) -> Vec<Action> {
        let mut actions = self.core.sync.clear();
        if !actions.is_empty() {
            actions.push(Action::HighlightChanged { project_id: None });
        }
        actions
    }

    /// Select the current project's districts and show them on the detail map.
    pub async fn view_project_on_map(&mut self) -> Vec<Action> {
        let Some(project) = &self.current else {
            return Vec::new();
        };
        if project.districts.is_empty() {
            self.notifier.notify(Notice::error("This project has no districts assigned"));
            return Vec::new();
        }
        let districts = project.districts.clone();

        let mut actions = self.core.select_districts(&districts);
        if self.core.tab != Tab::Detail {
            actions.extend(self.core.switch_tab(Tab::Detail));
        }
        self.notifier
            .notify(Notice::info(format!("Showing districts: {}", districts.join(", "))));
        self.dispatch(actions).await
    }

    /// Drop the current project and every drawing on the maps.
    pub fn close_project_details(&mut self) -> Vec<Action> {
        self.current = None;
        let mut actions = self.clear_highlight();
        actions.extend(self.core.clear_drawings());
        actions
    }

    // =============================================================
    // Persistence and CRUD
    // =============================================================

    /// Replace the current project's drawings with the detail edit layer.
    pub async fn save_drawings(&mut self) -> Vec<Action> {
        let Some((id, name)) = self.current.as_ref().map(|p| (p.id, p.name.clone())) else {
            self.notifier
                .notify(Notice::error(PersistError::NoProject.to_string()));
            return Vec::new();
        };
        match persistence::save(&*self.api, Some(id), &self.core.detail.edit).await {
            Ok(count) => {
                self.notifier
                    .notify(Notice::success(format!("Saved {count} drawings to \"{name}\"")));
                self.reload_saved(id).await
            }
            Err(PersistError::Api(e)) => {
                report_api_error(&*self.notifier, "Error saving drawings", &e);
                Vec::new()
            }
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                Vec::new()
            }
        }
    }

    /// Refetch a saved project so the maps show the stored baseline.
    async fn reload_saved(&mut self, id: ProjectId) -> Vec<Action> {
        let project = match self.api.fetch_project(id).await {
            Ok(p) => p,
            Err(e) => {
                report_api_error(&*self.notifier, "Error reloading project", &e);
                return Vec::new();
            }
        };
        if let Some(cached) = self.district_projects.iter_mut().find(|p| p.id == id) {
            cached.clone_from(&project);
        }
        let actions = self.core.show_detail_projects(slice::from_ref(&project), Some(id), false);
        self.current = Some(project);
        actions
    }

    /// Validate and create a project, then open it in the projects tab.
    pub async fn create_project(&mut self, draft: ProjectDraft) -> Vec<Action> {
        let draft = match draft.validated() {
            Ok(d) => d,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return Vec::new();
            }
        };
        match self.api.create_project(&draft).await {
            Ok(project) => {
                self.notifier
                    .notify(Notice::success(format!("Project \"{}\" created", project.name)));
                let mut actions = self.core.switch_tab(Tab::Projects);
                self.load_projects().await;
                actions.extend(self.open_project(project.id).await);
                actions
            }
            Err(e) => {
                report_api_error(&*self.notifier, "Error creating project", &e);
                Vec::new()
            }
        }
    }

    /// Validate and update a project, then reopen it.
    pub async fn update_project(&mut self, id: ProjectId, draft: ProjectDraft) -> Vec<Action> {
        let draft = match draft.validated() {
            Ok(d) => d,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return Vec::new();
            }
        };
        match self.api.update_project(id, &draft).await {
            Ok(project) => {
                self.notifier
                    .notify(Notice::success(format!("Project \"{}\" updated", project.name)));
                self.load_projects().await;
                self.open_project(project.id).await
            }
            Err(e) => {
                report_api_error(&*self.notifier, "Error updating project", &e);
                Vec::new()
            }
        }
    }

    /// Delete the current project after the operator confirms.
    ///
    /// Ignored while another delete is in flight or when no project is open.
    pub async fn delete_current_project(&mut self) -> Vec<Action> {
        if self.deleting {
            return Vec::new();
        }
        let Some((id, name)) = self.current.as_ref().map(|p| (p.id, p.name.clone())) else {
            return Vec::new();
        };
        if !self
            .notifier
            .confirm(&format!("Permanently delete project \"{name}\"?"))
        {
            return Vec::new();
        }

        self.deleting = true;
        let actions = match self.api.delete_project(id).await {
            Ok(()) => {
                let actions = self.close_project_details();
                self.district_projects.retain(|p| p.id != id);
                self.load_projects().await;
                log::info!("deleted project {id}");
                self.notifier
                    .notify(Notice::success(format!("Project \"{name}\" deleted")));
                actions
            }
            Err(e) => {
                report_api_error(&*self.notifier, "Error deleting project", &e);
                Vec::new()
            }
        };
        self.deleting = false;
        actions
    }

    /// Status counts for the loaded district project list.
    #[must_use]
    pub fn district_stats(&self) -> Option<DistrictStats> {
        self.district_label
            .as_deref()
            .map(|label| DistrictStats::compute(label, &self.district_projects))
    }
}
