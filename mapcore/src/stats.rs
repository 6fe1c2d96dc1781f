//! Per-status project counts for the selected districts.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use crate::doc::{Project, ProjectStatus};
use crate::selection::split_label;

/// Summary card for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistrictStats {
    /// The label, or `"N districts selected"` for more than two districts.
    pub title: String,
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub completed: usize,
    pub archived: usize,
}

impl DistrictStats {
    /// Count `projects` by status under a title derived from `label`.
    #[must_use]
    pub fn compute(label: &str, projects: &[Project]) -> Self {
        let count = split_label(label).len();
        let title = if count > 2 { format!("{count} districts selected") } else { label.to_owned() };

        let mut stats = Self { title, total: projects.len(), ..Self::default() };
        for project in projects {
            match project.status {
                ProjectStatus::Active => stats.active += 1,
                ProjectStatus::Inactive => stats.inactive += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::Archived => stats.archived += 1,
                ProjectStatus::Other(_) => {}
            }
        }
        stats
    }
}
