use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::annotations::{self, RenderOptions, RenderOutcome};
use crate::camera::{Point, Viewport};
use crate::config::EditConfig;
use crate::detail::DetailMapView;
use crate::doc::{DistrictCatalog, Project, ProjectId};
use crate::edit::{CoordinateReadout, EditSession};
use crate::geometry::Geometry;
use crate::hit;
use crate::input::{Key, Modifiers, Tab, ViewKind};
use crate::layer::{Primitive, PrimitiveId};
use crate::notify::Notice;
use crate::overview::OverviewMapView;
use crate::render;
use crate::selection::{DistrictSelectionModel, SelectionChanged};
use crate::sync::SelectionSync;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The district selection changed; `label` is its canonical text form.
    SelectionChanged { label: Option<String> },
    /// The highlighted project changed.
    HighlightChanged { project_id: Option<ProjectId> },
    SwitchTab(Tab),
    /// A view's viewport moved; the host should sync its tile layer.
    ViewportChanged(ViewKind),
    ScrollCardIntoView(ProjectId),
    /// Exactly this sidebar card (or none) is active.
    CardActivated(Option<ProjectId>),
    CoordinateReadout(CoordinateReadout),
    /// Show a primitive's hover label at a screen point of `view`.
    ShowTooltip { view: ViewKind, text: String, at: Point },
    HideTooltip(ViewKind),
    SetCursor { view: ViewKind, cursor: &'static str },
    RenderNeeded,
    /// The district project list must be refetched for `label`.
    LoadDistrictProjects { label: Option<String> },
    Notify(Notice),
}

/// Core engine state: all logic that doesn't depend on the canvas elements.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Default)]
pub struct EngineCore {
    pub catalog: DistrictCatalog,
    pub selection: DistrictSelectionModel,
    pub overview: OverviewMapView,
    pub detail: DetailMapView,
    pub edit: EditSession,
    pub sync: SelectionSync,
    pub tab: Tab,
    pub config: EditConfig,
    /// Primitive whose tooltip is showing, per view.
    overview_tip: Option<PrimitiveId>,
    detail_tip: Option<PrimitiveId>,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditConfig) -> Self {
        Self { edit: EditSession::new(config), config, ..Self::default() }
    }

    // --- Data inputs ---

    /// Install the district catalog and rebuild the overview.
    ///
    /// Selected names that no longer exist are dropped.
    pub fn load_catalog(&mut self, catalog: DistrictCatalog) -> Vec<Action> {
        self.catalog = catalog;
        self.overview.load(&self.catalog);
        let mut actions: Vec<Action> = self.drop_stale_tips();
        let kept: Vec<String> = self
            .selection
            .names()
            .iter()
            .filter(|n| self.catalog.contains(n))
            .cloned()
            .collect();
        if kept.len() == self.selection.len() {
            self.overview.restyle(&self.selection);
            actions.push(Action::RenderNeeded);
            return actions;
        }
        let changed = self.selection.replace_with(kept);
        self.overview.restyle(&self.selection);
        actions.extend(self.selection_changed(changed));
        actions
    }

    /// Update a view's size in CSS pixels.
    pub fn resize(&mut self, view: ViewKind, width: f64, height: f64) {
        match view {
            ViewKind::Overview => self.overview.viewport.resize(width, height),
            ViewKind::Detail => self.detail.viewport.resize(width, height),
        }
    }

    // --- Overview gestures ---

    /// Click on the overview: toggle the district, or clear on background.
    pub fn overview_click(&mut self, pt: Point) -> Vec<Action> {
        match self.overview.click(pt, &mut self.selection) {
            Some(changed) => self.selection_changed(changed),
            None => Vec::new(),
        }
    }

    /// Double click on the overview: select only that district and open the detail tab.
    pub fn overview_double_click(&mut self, pt: Point) -> Vec<Action> {
        let Some(changed) = self.overview.double_click(pt, &mut self.selection) else {
            return Vec::new();
        };
        let mut actions = self.selection_changed(changed);
        if self.tab != Tab::Detail {
            actions.extend(self.switch_tab(Tab::Detail));
        }
        actions
    }

    /// Pointer move on the overview: hover styling, cursor and tooltip.
    pub fn overview_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let (restyled, over) = self.overview.pointer_move(pt, &self.selection);
        let mut actions = Vec::new();
        if restyled {
            let cursor = if over { "pointer" } else { "default" };
            actions.push(Action::SetCursor { view: ViewKind::Overview, cursor });
            actions.push(Action::RenderNeeded);
        }
        let viewport = &self.overview.viewport;
        let under = hit::hit_test(&self.overview.drawings, viewport, pt)
            .and_then(|id| self.overview.drawings.get(&id))
            .or_else(|| hit::hit_test(&self.overview.layer, viewport, pt).and_then(|id| self.overview.layer.get(&id)));
        actions.extend(hover_tooltip(&mut self.overview_tip, ViewKind::Overview, under, viewport));
        actions
    }

    /// Toggle a district by name (sidebar pills, mini cards).
    pub fn toggle_district(&mut self, name: &str) -> Vec<Action> {
        if !self.catalog.contains(name) {
            log::warn!("toggle of unknown district `{name}` ignored");
            return Vec::new();
        }
        let changed = self.selection.toggle(name);
        self.overview.restyle(&self.selection);
        self.selection_changed(changed)
    }

    /// Replace the selection programmatically. Unknown names are dropped.
    pub fn select_districts<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<Action> {
        let known: Vec<&str> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| {
                let ok = self.catalog.contains(n);
                if !ok {
                    log::warn!("unknown district `{n}` dropped from selection");
                }
                ok
            })
            .collect();
        let changed = self.selection.replace_with(known);
        self.overview.restyle(&self.selection);
        self.selection_changed(changed)
    }

    fn selection_changed(&mut self, changed: SelectionChanged) -> Vec<Action> {
        let mut actions = vec![Action::SelectionChanged { label: changed.label.clone() }, Action::RenderNeeded];
        if self.tab == Tab::Detail {
            actions.extend(self.refresh_detail(changed.label));
        }
        actions
    }

    /// Refocus the detail view and ask for the district's projects.
    fn refresh_detail(&mut self, label: Option<String>) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.detail.focus_on(label.as_deref(), &self.catalog, self.config.fit_padding_px) {
            actions.push(Action::ViewportChanged(ViewKind::Detail));
        }
        actions.push(Action::LoadDistrictProjects { label });
        actions
    }

    // --- Tabs ---

    /// Show `tab`. Entering the detail tab refocuses it on the selection.
    pub fn switch_tab(&mut self, tab: Tab) -> Vec<Action> {
        self.tab = tab;
        let mut actions = vec![Action::SwitchTab(tab)];
        if tab == Tab::Detail {
            actions.extend(self.refresh_detail(self.selection.label()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Detail gestures ---

    /// Click on the detail map: activate the editable primitive under the
    /// pointer, or go idle on background.
    pub fn detail_click(&mut self, pt: Point) -> Vec<Action> {
        match hit::hit_test(&self.detail.edit, &self.detail.viewport, pt) {
            Some(id) => self.activate(id),
            None => {
                if self.edit.active.id().is_none() {
                    return Vec::new();
                }
                self.edit.deselect(&mut self.detail.edit);
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Pointer down on the detail map: start dragging a draggable primitive.
    pub fn detail_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let Some(id) = hit::hit_test(&self.detail.edit, &self.detail.viewport, pt) else {
            return Vec::new();
        };
        let at = self.detail.viewport.unproject(pt);
        let Some(readout) = self.edit.begin_drag(&mut self.detail.edit, id, at) else {
            return Vec::new();
        };
        let mut actions = vec![
            Action::CoordinateReadout(readout),
            Action::SetCursor { view: ViewKind::Detail, cursor: "grabbing" },
        ];
        actions.extend(self.sync_owner(id));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Pointer move on the detail map: drag, or update the hover cursor.
    pub fn detail_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        if self.edit.is_dragging() {
            let at = self.detail.viewport.unproject(pt);
            return match self.edit.drag_to(&mut self.detail.edit, at) {
                Some(readout) => self.moved(readout),
                None => Vec::new(),
            };
        }
        let under = hit::hit_test(&self.detail.edit, &self.detail.viewport, pt).and_then(|id| self.detail.edit.get(&id));
        let cursor = if under.is_some_and(|p| p.draggable) { "move" } else { "default" };
        let mut actions = vec![Action::SetCursor { view: ViewKind::Detail, cursor }];
        actions.extend(hover_tooltip(&mut self.detail_tip, ViewKind::Detail, under, &self.detail.viewport));
        actions
    }

    /// Pointer up on the detail map: end any drag.
    pub fn detail_pointer_up(&mut self, _pt: Point) -> Vec<Action> {
        if !self.edit.is_dragging() {
            return Vec::new();
        }
        self.edit.end_drag();
        vec![Action::SetCursor { view: ViewKind::Detail, cursor: "move" }, Action::RenderNeeded]
    }

    /// Keyboard input: arrows nudge the active primitive, Escape releases it.
    ///
    /// Ignored unless the detail tab is showing.
    pub fn key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.tab != Tab::Detail {
            return Vec::new();
        }
        if *key == Key::Escape {
            if self.edit.active.id().is_none() {
                return Vec::new();
            }
            self.edit.deselect(&mut self.detail.edit);
            return vec![Action::RenderNeeded];
        }
        match self.edit.nudge(&mut self.detail.edit, key, modifiers, self.tab) {
            Some(readout) => self.moved(readout),
            None => Vec::new(),
        }
    }

    /// The active primitive moved: report it and re-show its tooltip at the
    /// new position.
    fn moved(&mut self, readout: CoordinateReadout) -> Vec<Action> {
        let mut actions = vec![Action::CoordinateReadout(readout)];
        if let Some(p) = self.edit.active.id().and_then(|id| self.detail.edit.get(&id)) {
            if let Some(tip) = tooltip_action(ViewKind::Detail, p, &self.detail.viewport) {
                self.detail_tip = Some(p.id);
                actions.push(tip);
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// A shape finished by the host's draw tool joins the edit layer.
    pub fn add_drawn_shape(&mut self, geometry: Geometry) -> Vec<Action> {
        self.detail.add_drawn_shape(geometry);
        vec![Action::RenderNeeded]
    }

    fn activate(&mut self, id: PrimitiveId) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(readout) = self.edit.select(&mut self.detail.edit, id) {
            actions.push(Action::CoordinateReadout(readout));
        }
        actions.extend(self.sync_owner(id));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Activate the sidebar card of the project owning `id`.
    fn sync_owner(&mut self, id: PrimitiveId) -> Vec<Action> {
        match self.detail.edit.get(&id) {
            Some(p) => {
                let owner = p.owner.clone();
                self.sync.map_selected(&owner)
            }
            None => Vec::new(),
        }
    }

    // --- Annotation layers ---

    /// Render projects onto the detail edit layer (always editable).
    ///
    /// Clearing the layer also releases the active primitive.
    pub fn show_detail_projects(&mut self, projects: &[Project], highlight_id: Option<ProjectId>, fit: bool) -> Vec<Action> {
        self.edit.reset();
        let options = RenderOptions { clear: true, highlight_id, editable: true, fit_bounds: fit };
        let outcome = annotations::render(projects, &mut self.detail.edit, &mut self.detail.viewport, options, &self.config);
        let mut actions = self.drop_stale_tips();
        actions.extend(outcome_actions(outcome, ViewKind::Detail));
        actions
    }

    /// Render projects read-only onto the overview's drawing layer.
    pub fn show_overview_projects(&mut self, projects: &[Project]) -> Vec<Action> {
        let options = RenderOptions { clear: true, fit_bounds: false, ..RenderOptions::default() };
        let outcome =
            annotations::render(projects, &mut self.overview.drawings, &mut self.overview.viewport, options, &self.config);
        let mut actions = self.drop_stale_tips();
        actions.extend(outcome_actions(outcome, ViewKind::Overview));
        actions
    }

    /// Remove every drawing from both views.
    pub fn clear_drawings(&mut self) -> Vec<Action> {
        self.edit.reset();
        self.detail.edit.clear();
        self.overview.drawings.clear();
        let mut actions = self.drop_stale_tips();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Hide tooltips whose primitive was removed by a rebuild.
    fn drop_stale_tips(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let overview = &self.overview;
        if self
            .overview_tip
            .is_some_and(|id| overview.layer.get(&id).is_none() && overview.drawings.get(&id).is_none())
        {
            self.overview_tip = None;
            actions.push(Action::HideTooltip(ViewKind::Overview));
        }
        if self.detail_tip.is_some_and(|id| self.detail.edit.get(&id).is_none()) {
            self.detail_tip = None;
            actions.push(Action::HideTooltip(ViewKind::Detail));
        }
        actions
    }
}

/// Show the tooltip of the primitive under the pointer when the pointer
/// enters it, and hide it when the pointer leaves.
fn hover_tooltip(
    shown: &mut Option<PrimitiveId>,
    view: ViewKind,
    under: Option<&Primitive>,
    viewport: &Viewport,
) -> Option<Action> {
    let under = under.filter(|p| p.tooltip.is_some());
    let id = under.map(|p| p.id);
    if id == *shown {
        return None;
    }
    let was_shown = shown.is_some();
    *shown = id;
    match under {
        Some(p) => tooltip_action(view, p, viewport),
        None if was_shown => Some(Action::HideTooltip(view)),
        None => None,
    }
}

fn tooltip_action(view: ViewKind, primitive: &Primitive, viewport: &Viewport) -> Option<Action> {
    let tip = primitive.tooltip.as_ref()?;
    let at = viewport.project(primitive.shape.label_position()?);
    Some(Action::ShowTooltip { view, text: tip.text(), at })
}

fn outcome_actions(outcome: RenderOutcome, view: ViewKind) -> Vec<Action> {
    let mut actions = Vec::new();
    if outcome.viewport_changed {
        actions.push(Action::ViewportChanged(view));
    }
    actions.push(Action::RenderNeeded);
    actions
}

/// The full map engine. Wraps `EngineCore` and owns both canvas elements.
pub struct Engine {
    overview_canvas: HtmlCanvasElement,
    detail_canvas: HtmlCanvasElement,
    pub core: EngineCore,
    dpr: f64,
}

impl Engine {
    /// Create an engine bound to the overview and detail canvases.
    #[must_use]
    pub fn new(overview_canvas: HtmlCanvasElement, detail_canvas: HtmlCanvasElement, config: EditConfig) -> Self {
        Self { overview_canvas, detail_canvas, core: EngineCore::new(config), dpr: 1.0 }
    }

    /// Update one view's size in CSS pixels and the device pixel ratio.
    pub fn set_viewport(&mut self, view: ViewKind, width_css: f64, height_css: f64, dpr: f64) {
        self.dpr = dpr.max(1.0);
        self.core.resize(view, width_css, height_css);
        let canvas = match view {
            ViewKind::Overview => &self.overview_canvas,
            ViewKind::Detail => &self.detail_canvas,
        };
        canvas.set_width(device_px(width_css * self.dpr));
        canvas.set_height(device_px(height_css * self.dpr));
    }

    /// Draw both views.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a 2D context is unavailable or a canvas call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = context(&self.overview_canvas)?;
        let overview = &self.core.overview;
        render::draw(&ctx, &[&overview.layer, &overview.drawings], &overview.viewport, self.dpr)?;

        let ctx = context(&self.detail_canvas)?;
        let detail = &self.core.detail;
        render::draw(&ctx, &[&detail.focus, &detail.edit], &detail.viewport, self.dpr)
    }
}

fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    let Some(obj) = canvas.get_context("2d")? else {
        return Err(JsValue::from_str("canvas has no 2d context"));
    };
    obj.dyn_into::<CanvasRenderingContext2d>().map_err(JsValue::from)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(css: f64) -> u32 {
    css.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
