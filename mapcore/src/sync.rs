//! Sidebar card ↔ map highlight reconciliation.
//!
//! Tracks which project card is active. Sidebar clicks toggle it; clicks on
//! a project's primitive on the detail map activate its card without moving
//! the map.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::doc::ProjectId;
use crate::engine::Action;
use crate::layer::Owner;

/// Result of a sidebar card click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardClick {
    /// The card became active; its project should be shown highlighted.
    Activate(ProjectId),
    /// The already-active card was clicked again and is now inactive.
    Deactivate,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSync {
    active: Option<ProjectId>,
}

impl SelectionSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<ProjectId> {
        self.active
    }

    /// Toggle a card from the sidebar.
    pub fn card_clicked(&mut self, id: ProjectId) -> CardClick {
        if self.active == Some(id) {
            self.active = None;
            CardClick::Deactivate
        } else {
            self.active = Some(id);
            CardClick::Activate(id)
        }
    }

    /// Activate a card exclusively and bring it into view.
    pub fn activate(&mut self, id: ProjectId) -> Vec<Action> {
        self.active = Some(id);
        vec![Action::CardActivated(Some(id)), Action::ScrollCardIntoView(id)]
    }

    /// A primitive was picked on the map. Activates its project's card if it
    /// belongs to a different project than the active one.
    pub fn map_selected(&mut self, owner: &Owner) -> Vec<Action> {
        match owner {
            Owner::Project(id) if self.active != Some(*id) => self.activate(*id),
            _ => Vec::new(),
        }
    }

    /// Put back the card state from before a failed activation.
    pub fn restore(&mut self, previous: Option<ProjectId>) -> Vec<Action> {
        self.active = previous;
        vec![Action::CardActivated(previous)]
    }

    /// Deactivate every card.
    pub fn clear(&mut self) -> Vec<Action> {
        match self.active.take() {
            Some(_) => vec![Action::CardActivated(None)],
            None => Vec::new(),
        }
    }
}
