//! Active selection and coordinate editing on the detail view's edit layer.
//!
//! At most one primitive is active at a time. Activating a primitive always
//! reverts the previously active one first. Drags and arrow-key nudges move
//! the active primitive in memory only; nothing is persisted until an
//! explicit save.

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;

use crate::config::EditConfig;
use crate::consts::READOUT_DECIMALS;
use crate::geometry::LngLat;
use crate::input::{InputState, Key, Modifiers, Tab};
use crate::layer::{PrimitiveId, RenderedLayer};
use crate::style::PathStyle;

/// Which primitive, if any, is bound to keyboard editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveSelection {
    #[default]
    Idle,
    Selected(PrimitiveId),
}

impl ActiveSelection {
    #[must_use]
    pub fn id(self) -> Option<PrimitiveId> {
        match self {
            Self::Idle => None,
            Self::Selected(id) => Some(id),
        }
    }
}

/// Position shown in the coordinate readout panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateReadout {
    pub lat: f64,
    pub lng: f64,
}

impl CoordinateReadout {
    #[must_use]
    pub fn at(p: LngLat) -> Self {
        Self { lat: p.lat, lng: p.lng }
    }

    /// `(lat, lng)` formatted for the panel.
    #[must_use]
    pub fn text(&self) -> (String, String) {
        (
            format!("{:.prec$}", self.lat, prec = READOUT_DECIMALS),
            format!("{:.prec$}", self.lng, prec = READOUT_DECIMALS),
        )
    }
}

/// Editing state for one edit layer.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pub active: ActiveSelection,
    pub input: InputState,
    pub config: EditConfig,
}

impl EditSession {
    #[must_use]
    pub fn new(config: EditConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Make `id` the active primitive. The previous one is reverted first.
    ///
    /// Returns the readout for the new primitive, or `None` if it is not on
    /// the layer (the selection is then Idle).
    pub fn select(&mut self, layer: &mut RenderedLayer, id: PrimitiveId) -> Option<CoordinateReadout> {
        self.deselect(layer);
        let prim = layer.get_mut(&id)?;
        let marker = prim.shape.is_marker();
        prim.set_transient_style(PathStyle::active(marker));
        let anchor = prim.shape.anchor();
        layer.bring_to_front(&id);
        self.active = ActiveSelection::Selected(id);
        anchor.map(CoordinateReadout::at)
    }

    /// Revert the active primitive (if still present) and go Idle.
    pub fn deselect(&mut self, layer: &mut RenderedLayer) {
        if let ActiveSelection::Selected(prev) = self.active {
            if let Some(p) = layer.get_mut(&prev) {
                p.restore_style();
            }
        }
        self.active = ActiveSelection::Idle;
        self.input = InputState::Idle;
    }

    /// Forget all state without touching the layer (used after the layer was
    /// rebuilt and the old primitives are gone).
    pub fn reset(&mut self) {
        self.active = ActiveSelection::Idle;
        self.input = InputState::Idle;
    }

    /// Move the active primitive one step in the arrow key's direction.
    ///
    /// Ignored unless the detail tab is showing and a primitive is active.
    pub fn nudge(
        &mut self,
        layer: &mut RenderedLayer,
        key: &Key,
        modifiers: Modifiers,
        tab: Tab,
    ) -> Option<CoordinateReadout> {
        if tab != Tab::Detail {
            return None;
        }
        let id = self.active.id()?;
        let (dx, dy) = key.direction()?;
        let step = self.config.step(modifiers.shift);
        self.move_by(layer, id, dx * step, dy * step)
    }

    /// Pointer-down on a draggable primitive: activate it and start a drag.
    pub fn begin_drag(
        &mut self,
        layer: &mut RenderedLayer,
        id: PrimitiveId,
        at: LngLat,
    ) -> Option<CoordinateReadout> {
        if !layer.get(&id).is_some_and(|p| p.draggable) {
            return None;
        }
        let readout = self.select(layer, id);
        self.input = InputState::Dragging { id, last: at, moved: false };
        readout
    }

    /// Pointer-move while dragging: translate by the pointer delta.
    pub fn drag_to(&mut self, layer: &mut RenderedLayer, at: LngLat) -> Option<CoordinateReadout> {
        let InputState::Dragging { id, last, .. } = self.input else {
            return None;
        };
        self.input = InputState::Dragging { id, last: at, moved: true };
        self.move_by(layer, id, at.lng - last.lng, at.lat - last.lat)
    }

    /// Pointer-up: end any drag. Returns whether the primitive moved.
    pub fn end_drag(&mut self) -> bool {
        let moved = matches!(self.input, InputState::Dragging { moved: true, .. });
        self.input = InputState::Idle;
        moved
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.input, InputState::Dragging { .. })
    }

    fn move_by(
        &mut self,
        layer: &mut RenderedLayer,
        id: PrimitiveId,
        d_lng: f64,
        d_lat: f64,
    ) -> Option<CoordinateReadout> {
        let prim = layer.get_mut(&id)?;
        prim.translate(d_lng, d_lat);
        prim.shape.anchor().map(CoordinateReadout::at)
    }
}
