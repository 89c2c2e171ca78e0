//! Selection reconciliation shared by the identity and category services.
//!
//! A visual may bind up to three renderings of the same logical data: the primary rendering, its
//! legend and its data labels. [`InteractivityService`] owns the bound data points of each scope
//! and re-derives every `selected` flag from one selection set. Where that set lives and how a
//! data point is matched against it is supplied by a [`SelectionStrategy`].
//!
//! Reconciliation in normal mode counts matches in the primary and legend scopes. When nothing
//! matches while a selection exists (or existed before the pass), the selection is stale for the
//! bound data: it is cleared and the empty selection is sent to the host. Inverted mode only
//! reconciles the primary scope and never self-heals.

use crate::behavior::{BehaviorOptions, InteractiveBehavior, SelectionHandler, SelectionScope};
use crate::data_point::{data_has_selection, BaseDataPoint};
use crate::host::ScreenPoint;

/// Where the selection set lives and how data points match it.
pub trait SelectionStrategy<P> {
    fn is_data_point_selected(&self, data_point: &P) -> bool;

    fn has_selection(&self) -> bool;

    /// Toggle `data_points` against a snapshot of the current selection and update their flags.
    /// A single select (or an empty slice) starts from an empty selection.
    fn select(&mut self, data_points: &mut [P], multi_select: bool);

    /// Replace the selection with the data points already flagged as selected.
    fn take_selection_state_from_data_points(&mut self, data_points: &[P]);

    fn send_selection_to_host(&mut self);

    /// Empty the selection set without notifying the host.
    fn clear_selection(&mut self);

    fn handle_context_menu(&mut self, _data_point: &P, _position: ScreenPoint) {}

    fn apply_selection_filter(&mut self) {}
}

struct BoundScope<P> {
    data_points: Vec<P>,
    behavior: Box<dyn InteractiveBehavior<P>>,
}

impl<P> BoundScope<P> {
    fn render(&mut self, has_selection: bool) {
        self.behavior.render_selection(has_selection, &self.data_points);
    }
}

pub struct InteractivityService<P, S> {
    strategy: S,
    primary: Option<BoundScope<P>>,
    legend: Option<BoundScope<P>>,
    labels: Option<BoundScope<P>>,
    inverted_selection_mode: bool,
}

impl<P, S> std::fmt::Debug for InteractivityService<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractivityService")
            .field("primary", &self.primary.as_ref().map(|s| s.data_points.len()))
            .field("legend", &self.legend.as_ref().map(|s| s.data_points.len()))
            .field("labels", &self.labels.as_ref().map(|s| s.data_points.len()))
            .field("inverted_selection_mode", &self.inverted_selection_mode)
            .finish_non_exhaustive()
    }
}

impl<P, S> InteractivityService<P, S>
where
    P: BaseDataPoint,
    S: SelectionStrategy<P>,
{
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            primary: None,
            legend: None,
            labels: None,
            inverted_selection_mode: false,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Bind `options.data_points` to the scope named by the options, replacing any earlier
    /// binding of that scope, then reconcile.
    pub fn bind(&mut self, options: BehaviorOptions<P>) {
        let BehaviorOptions {
            mut behavior,
            data_points,
            interactivity_service_options,
        } = options;

        let had_selection = self.strategy.has_selection();
        if interactivity_service_options.override_selection_from_data {
            self.strategy
                .take_selection_state_from_data_points(&data_points);
        }

        let scope = interactivity_service_options.scope();
        behavior.bind_events(scope, &data_points);
        *self.slot_mut(scope) = Some(BoundScope {
            data_points,
            behavior,
        });

        self.sync_with_previous(had_selection);
    }

    pub fn data_points(&self, scope: SelectionScope) -> Option<&[P]> {
        self.slot(scope).as_ref().map(|bound| bound.data_points.as_slice())
    }

    pub fn is_bound(&self, scope: SelectionScope) -> bool {
        self.slot(scope).is_some()
    }

    pub fn has_selection(&self) -> bool {
        self.strategy.has_selection()
    }

    pub fn legend_has_selection(&self) -> bool {
        self.data_points(SelectionScope::Legend)
            .is_some_and(data_has_selection)
    }

    pub fn labels_has_selection(&self) -> bool {
        self.data_points(SelectionScope::Labels)
            .is_some_and(data_has_selection)
    }

    pub fn is_selection_mode_inverted(&self) -> bool {
        self.inverted_selection_mode
    }

    pub fn set_inverted_selection_mode(&mut self, inverted: bool) {
        self.inverted_selection_mode = inverted;
    }

    /// Deselect every bound data point, empty the selection set and re-render.
    pub fn clear_selection(&mut self) {
        self.strategy.clear_selection();
        for bound in self.scopes_mut() {
            for point in &mut bound.data_points {
                point.set_selected(false);
            }
        }
        self.render_all();
    }

    /// Flag `data_points` from the current selection. With highlights active an existing
    /// selection is dropped first.
    pub fn apply_selection_state_to_data(
        &mut self,
        data_points: &mut [P],
        has_highlights: bool,
    ) -> bool {
        if has_highlights && self.strategy.has_selection() {
            self.strategy.clear_selection();
        }
        for point in data_points.iter_mut() {
            let selected = self.strategy.is_data_point_selected(point);
            point.set_selected(selected);
        }
        self.strategy.has_selection()
    }

    /// Re-derive every bound flag from the current selection.
    pub fn sync_selection_state(&mut self) {
        let had_selection = self.strategy.has_selection();
        self.sync_with_previous(had_selection);
    }

    /// Reconcile with a selection changed elsewhere and re-render.
    pub fn restore_selection(&mut self) {
        self.sync_selection_state();
        self.render_all();
    }

    /// Select bound data points of `scope` by position. Unknown indices are skipped; an empty
    /// `indices` clears the selection.
    pub fn handle_selection_at(
        &mut self,
        scope: SelectionScope,
        indices: &[usize],
        multi_select: bool,
    ) where
        P: Clone,
    {
        let Some(bound) = self.slot(scope).as_ref() else {
            return;
        };
        let mut picked: Vec<P> = indices
            .iter()
            .filter_map(|&index| bound.data_points.get(index).cloned())
            .collect();
        self.handle_selection(Some(&mut picked), multi_select);
    }

    pub fn render_all(&mut self) {
        let has_selection = self.strategy.has_selection();
        let legend_has_selection = self.legend_has_selection();
        let labels_has_selection = self.labels_has_selection();

        if let Some(bound) = self.primary.as_mut() {
            bound.render(has_selection);
        }
        if let Some(bound) = self.legend.as_mut() {
            bound.render(legend_has_selection);
        }
        if let Some(bound) = self.labels.as_mut() {
            bound.render(labels_has_selection);
        }
    }

    /// Returns whether a stale selection was cleared and sent to the host.
    fn sync_with_previous(&mut self, had_selection: bool) -> bool {
        if self.inverted_selection_mode {
            self.sync_inverted();
            return false;
        }
        if self.primary.is_none() && self.legend.is_none() {
            return false;
        }

        let strategy = &self.strategy;
        let mut found_match = false;
        for bound in [self.primary.as_mut(), self.legend.as_mut()].into_iter().flatten() {
            found_match |= mark_selected(strategy, &mut bound.data_points);
        }
        if let Some(bound) = self.labels.as_mut() {
            mark_selected(strategy, &mut bound.data_points);
        }

        if !found_match && (had_selection || self.strategy.has_selection()) {
            log::debug!("selection matches no bound data point; clearing stale selection");
            self.strategy.clear_selection();
            for bound in self.scopes_mut() {
                for point in &mut bound.data_points {
                    point.set_selected(false);
                }
            }
            self.strategy.send_selection_to_host();
            return true;
        }
        false
    }

    fn sync_inverted(&mut self) {
        let strategy = &self.strategy;
        let Some(bound) = self.primary.as_mut() else {
            return;
        };
        if !strategy.has_selection() {
            for point in &mut bound.data_points {
                point.set_selected(false);
            }
            return;
        }
        mark_selected(strategy, &mut bound.data_points);
    }

    fn slot(&self, scope: SelectionScope) -> &Option<BoundScope<P>> {
        match scope {
            SelectionScope::Primary => &self.primary,
            SelectionScope::Legend => &self.legend,
            SelectionScope::Labels => &self.labels,
        }
    }

    fn slot_mut(&mut self, scope: SelectionScope) -> &mut Option<BoundScope<P>> {
        match scope {
            SelectionScope::Primary => &mut self.primary,
            SelectionScope::Legend => &mut self.legend,
            SelectionScope::Labels => &mut self.labels,
        }
    }

    fn scopes_mut(&mut self) -> impl Iterator<Item = &mut BoundScope<P>> {
        [
            self.primary.as_mut(),
            self.legend.as_mut(),
            self.labels.as_mut(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Flag each point by selection membership. Returns whether any point matched.
fn mark_selected<P, S>(strategy: &S, data_points: &mut [P]) -> bool
where
    P: BaseDataPoint,
    S: SelectionStrategy<P>,
{
    let mut found_match = false;
    for point in data_points.iter_mut() {
        let selected = strategy.is_data_point_selected(point);
        point.set_selected(selected);
        found_match |= selected;
    }
    found_match
}

impl<P, S> SelectionHandler<P> for InteractivityService<P, S>
where
    P: BaseDataPoint,
    S: SelectionStrategy<P>,
{
    fn handle_selection(&mut self, data_points: Option<&mut [P]>, multi_select: bool) {
        let Some(data_points) = data_points else {
            return;
        };
        self.strategy.select(data_points, multi_select);
        let had_selection = self.strategy.has_selection();
        if !self.sync_with_previous(had_selection) {
            self.strategy.send_selection_to_host();
        }
        self.render_all();
    }

    fn handle_clear_selection(&mut self) {
        self.clear_selection();
        self.strategy.send_selection_to_host();
    }

    fn handle_context_menu(&mut self, data_point: &P, position: ScreenPoint) {
        self.strategy.handle_context_menu(data_point, position);
    }

    fn apply_selection_filter(&mut self) {
        self.strategy.apply_selection_filter();
    }
}
