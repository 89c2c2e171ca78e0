//! Capabilities consumed from the host application.

use crate::identity::SelectionIdentity;
use formula_semantic_filter::Filter;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Invoked by the host after the selection changed outside the visual.
pub type SelectCallback = Box<dyn FnMut()>;

/// The host's selection manager.
///
/// Optional host capabilities are default methods that do nothing.
pub trait SelectionManager<I> {
    /// A copy of the current selection.
    fn selection_ids(&self) -> Vec<I>;

    /// Single select replaces the selection with `ids`; multi select toggles each of them.
    fn select(&mut self, ids: Vec<I>, multi_select: bool);

    fn clear(&mut self);

    fn has_selection(&self) -> bool {
        !self.selection_ids().is_empty()
    }

    fn apply_selection_filter(&mut self) {}

    fn show_context_menu(&mut self, _identity: Option<&I>, _position: ScreenPoint) {}

    /// Returns `false` when the host cannot report external selection changes.
    fn register_on_select_callback(&mut self, _callback: SelectCallback) -> bool {
        false
    }
}

/// Keeps the selection in process for hosts without a selection manager.
#[derive(Clone, Debug, Default)]
pub struct LocalSelectionManager<I> {
    ids: Vec<I>,
}

impl<I> LocalSelectionManager<I> {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<I: SelectionIdentity + Clone + PartialEq> LocalSelectionManager<I> {
    /// Drops entries whose kind (measure-only or scoped) differs from `kind_of`.
    fn retain_kind_of(&mut self, kind_of: &I) {
        let scoped = kind_of.has_identity();
        self.ids.retain(|id| id.has_identity() == scoped);
    }
}

impl<I: SelectionIdentity + Clone + PartialEq> SelectionManager<I> for LocalSelectionManager<I> {
    fn selection_ids(&self) -> Vec<I> {
        self.ids.clone()
    }

    fn select(&mut self, ids: Vec<I>, multi_select: bool) {
        if !multi_select {
            self.ids.clear();
            for id in ids {
                if !self.ids.contains(&id) {
                    self.ids.push(id);
                }
            }
            if let Some(last) = self.ids.last().cloned() {
                self.retain_kind_of(&last);
            }
            return;
        }

        for id in ids {
            match self.ids.iter().position(|existing| *existing == id) {
                Some(index) => {
                    self.ids.remove(index);
                }
                None => {
                    self.ids.push(id.clone());
                    self.retain_kind_of(&id);
                }
            }
        }
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterAction {
    Merge,
    Remove,
}

/// The host's filter write-back capability.
pub trait FilterHost {
    fn apply_json_filter(
        &mut self,
        filter: &Filter,
        object_name: &str,
        property_name: &str,
        action: FilterAction,
    );
}

/// The persisted visual property filters are written into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterObjectProperty {
    pub object_name: String,
    pub property_name: String,
}

impl Default for FilterObjectProperty {
    fn default() -> Self {
        Self {
            object_name: "general".to_string(),
            property_name: "filter".to_string(),
        }
    }
}
