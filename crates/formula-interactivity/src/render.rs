//! Rendering-only coordination for visuals that keep their own selection state.

use crate::behavior::SelectionScope;
use serde::{Deserialize, Serialize};

/// A behavior that owns its selection state and only needs to be told when to redraw.
pub trait RenderBehavior {
    fn bind_events(&mut self, scope: SelectionScope);

    fn render_selection(&mut self);

    fn has_selection(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSelectionServiceOptions {
    pub is_legend: bool,
    pub is_labels: bool,
}

impl RenderSelectionServiceOptions {
    pub fn scope(&self) -> SelectionScope {
        if self.is_legend {
            SelectionScope::Legend
        } else if self.is_labels {
            SelectionScope::Labels
        } else {
            SelectionScope::Primary
        }
    }
}

pub struct RenderBehaviorOptions {
    pub behavior: Box<dyn RenderBehavior>,
    pub render_selection_service_options: RenderSelectionServiceOptions,
}

#[derive(Default)]
pub struct RenderSelectionService {
    visual: Option<Box<dyn RenderBehavior>>,
    legend: Option<Box<dyn RenderBehavior>>,
    labels: Option<Box<dyn RenderBehavior>>,
}

impl RenderSelectionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, options: RenderBehaviorOptions) {
        let RenderBehaviorOptions {
            mut behavior,
            render_selection_service_options,
        } = options;
        let scope = render_selection_service_options.scope();
        behavior.bind_events(scope);
        let slot = match scope {
            SelectionScope::Primary => &mut self.visual,
            SelectionScope::Legend => &mut self.legend,
            SelectionScope::Labels => &mut self.labels,
        };
        *slot = Some(behavior);
    }

    /// Redraw labels, then legend, then the visual.
    pub fn render_selection(&mut self) {
        for behavior in [&mut self.labels, &mut self.legend, &mut self.visual]
            .into_iter()
            .flatten()
        {
            behavior.render_selection();
        }
    }

    pub fn has_selection(&self) -> bool {
        [&self.visual, &self.legend, &self.labels]
            .into_iter()
            .flatten()
            .any(|behavior| behavior.has_selection())
    }
}

pub fn create_render_selection_service() -> RenderSelectionService {
    RenderSelectionService::new()
}
