//! District selection set and its label encoding.
//!
//! The overview map lets the operator pick any number of districts. The set
//! is pure UI state: created empty, mutated only through [`toggle`],
//! [`clear`], and [`replace_with`], and never persisted. Its canonical text
//! form is the label: `None` when empty, the bare name for one district, and
//! `"A, B, C"` otherwise. The label is also what backend lookups receive, so
//! consumers decompose it again with [`split_label`].
//!
//! [`toggle`]: DistrictSelectionModel::toggle
//! [`clear`]: DistrictSelectionModel::clear
//! [`replace_with`]: DistrictSelectionModel::replace_with

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

/// Separator used when joining several district names into one label.
pub const LABEL_SEPARATOR: &str = ", ";

/// Emitted by every mutation that actually changed the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// The label after the change.
    pub label: Option<String>,
}

/// Selected district names, kept in the order they were picked.
#[derive(Debug, Clone, Default)]
pub struct DistrictSelectionModel {
    names: Vec<String>,
}

impl DistrictSelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` if absent, remove it if present.
    pub fn toggle(&mut self, name: &str) -> SelectionChanged {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
        } else {
            self.names.push(name.to_owned());
        }
        self.changed()
    }

    /// Empty the set. Returns `None` when it was already empty.
    pub fn clear(&mut self) -> Option<SelectionChanged> {
        if self.names.is_empty() {
            return None;
        }
        self.names.clear();
        Some(self.changed())
    }

    /// Atomically replace the whole set. Duplicate names collapse to one.
    pub fn replace_with<I, S>(&mut self, names: I) -> SelectionChanged
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names.clear();
        for name in names {
            let name = name.as_ref();
            if !self.contains(name) {
                self.names.push(name.to_owned());
            }
        }
        self.changed()
    }

    /// Whether `name` is selected.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Selected names in pick order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `None` if empty, the single name, or the comma-joined names.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self.names.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            many => Some(many.join(LABEL_SEPARATOR)),
        }
    }

    fn changed(&self) -> SelectionChanged {
        SelectionChanged { label: self.label() }
    }
}

/// Decompose a label back into district names.
///
/// Splits on commas and trims each piece; a label without a comma is one
/// name. Empty pieces are dropped.
#[must_use]
pub fn split_label(label: &str) -> Vec<String> {
    label
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
