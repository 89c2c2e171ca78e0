//! Identity-based selection backed by the host's selection manager.

use crate::data_point::SelectableDataPoint;
use crate::host::{LocalSelectionManager, ScreenPoint, SelectionManager};
use crate::identity::{SelectionId, SelectionIdFactory, SelectionIdentity};
use crate::service::{InteractivityService, SelectionStrategy};
use formula_semantic_filter::{restore_selection_ids, AppliedFilter};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Keeps the authoritative selection in a [`SelectionManager`].
pub struct IdentitySelection<I> {
    manager: Box<dyn SelectionManager<I>>,
}

impl<I> IdentitySelection<I> {
    pub fn new(manager: Box<dyn SelectionManager<I>>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &dyn SelectionManager<I> {
        self.manager.as_ref()
    }

    pub fn manager_mut(&mut self) -> &mut dyn SelectionManager<I> {
        self.manager.as_mut()
    }
}

impl<P> SelectionStrategy<P> for IdentitySelection<P::Identity>
where
    P: SelectableDataPoint,
    P::Identity: Clone,
{
    fn is_data_point_selected(&self, data_point: &P) -> bool {
        let Some(identity) = data_point.identity() else {
            return false;
        };
        self.manager
            .selection_ids()
            .iter()
            .any(|selected| selected.includes(identity))
    }

    fn has_selection(&self) -> bool {
        self.manager.has_selection()
    }

    fn select(&mut self, data_points: &mut [P], multi_select: bool) {
        let original = self.manager.selection_ids();
        let starts_empty = !multi_select || data_points.is_empty();

        let mut toggles = Vec::new();
        for point in data_points.iter_mut() {
            let Some(identity) = point.identity().cloned() else {
                continue;
            };
            let should_select = !original.iter().any(|selected| selected.includes(&identity));
            point.set_selected(should_select);
            toggles.push((identity, should_select));
        }

        let base = if starts_empty { Vec::new() } else { original };
        let kind = toggles
            .iter()
            .rev()
            .find(|(_, should_select)| *should_select)
            .map(|(identity, _)| identity.has_identity());
        let mixes_kinds = kind.is_some_and(|kind| {
            base.iter()
                .chain(toggles.iter().filter(|(_, s)| *s).map(|(identity, _)| identity))
                .any(|identity| identity.has_identity() != kind)
        });

        if let Some(kind) = kind.filter(|_| mixes_kinds) {
            // Replace the host selection with one of a single identity kind.
            let (added, removed): (Vec<_>, Vec<_>) =
                toggles.into_iter().partition(|(_, should_select)| *should_select);
            let mut next: Vec<_> = base
                .into_iter()
                .filter(|selected| !removed.iter().any(|(identity, _)| selected.includes(identity)))
                .collect();
            next.extend(added.into_iter().map(|(identity, _)| identity));
            next.retain(|identity| identity.has_identity() == kind);
            log::debug!("dropping selected identities of the other kind");
            if next.is_empty() {
                self.manager.clear();
            } else {
                self.manager.select(next, false);
            }
            return;
        }

        if starts_empty {
            self.manager.clear();
        }
        // Deselected identities still go to the host in multi select, which toggles them off.
        let to_select: Vec<_> = toggles
            .into_iter()
            .filter(|(_, should_select)| *should_select || multi_select)
            .map(|(identity, _)| identity)
            .collect();
        self.manager.select(to_select, multi_select);
    }

    fn take_selection_state_from_data_points(&mut self, data_points: &[P]) {
        let ids: Vec<_> = data_points
            .iter()
            .filter(|point| point.is_selected())
            .filter_map(|point| point.identity().cloned())
            .collect();
        if ids.is_empty() {
            self.manager.clear();
        } else {
            self.manager.select(ids, false);
        }
    }

    fn send_selection_to_host(&mut self) {}

    fn clear_selection(&mut self) {
        self.manager.clear();
    }

    fn handle_context_menu(&mut self, data_point: &P, position: ScreenPoint) {
        self.manager.show_context_menu(data_point.identity(), position);
    }

    fn apply_selection_filter(&mut self) {
        self.manager.apply_selection_filter();
    }
}

pub type InteractivitySelectionService<P> =
    InteractivityService<P, IdentitySelection<<P as SelectableDataPoint>::Identity>>;

impl<P> InteractivityService<P, IdentitySelection<SelectionId>>
where
    P: SelectableDataPoint<Identity = SelectionId>,
{
    /// Replace the selection with the identities stored in a host filter and reconcile.
    pub fn select_from_filter(&mut self, filter: &AppliedFilter) {
        let ids = restore_selection_ids(filter, &SelectionIdFactory);
        let manager = self.strategy_mut().manager_mut();
        if ids.is_empty() {
            manager.clear();
        } else {
            manager.select(ids, false);
        }
        self.restore_selection();
    }
}

/// A service shared with the host's selection callback.
pub struct SharedInteractivityService<P, S>(Rc<RefCell<InteractivityService<P, S>>>);

impl<P, S> SharedInteractivityService<P, S> {
    pub fn new(service: InteractivityService<P, S>) -> Self {
        Self(Rc::new(RefCell::new(service)))
    }

    pub fn borrow(&self) -> Ref<'_, InteractivityService<P, S>> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, InteractivityService<P, S>> {
        self.0.borrow_mut()
    }
}

impl<P, S> Clone for SharedInteractivityService<P, S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<P, S> std::fmt::Debug for SharedInteractivityService<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedInteractivityService(..)")
    }
}

/// Create an identity-based service over `manager`, or over a [`LocalSelectionManager`] when the
/// host has none.
///
/// If the manager reports external selection changes, the service re-pulls the selection and
/// re-renders on each of them.
pub fn create_interactivity_selection_service<P>(
    manager: Option<Box<dyn SelectionManager<P::Identity>>>,
) -> SharedInteractivityService<P, IdentitySelection<P::Identity>>
where
    P: SelectableDataPoint + 'static,
    P::Identity: Clone + PartialEq + 'static,
{
    let manager = manager.unwrap_or_else(|| Box::new(LocalSelectionManager::new()));
    let service = SharedInteractivityService::new(InteractivityService::new(
        IdentitySelection::new(manager),
    ));

    let weak = Rc::downgrade(&service.0);
    let registered = service
        .borrow_mut()
        .strategy_mut()
        .manager_mut()
        .register_on_select_callback(Box::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match shared.try_borrow_mut() {
                Ok(mut service) => service.restore_selection(),
                Err(_) => log::debug!("selection callback fired while the service was busy"),
            };
        }));
    if !registered {
        log::debug!("host selection manager does not report external selection changes");
    }

    service
}
