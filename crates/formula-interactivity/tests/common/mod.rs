#![allow(dead_code)]

use formula_interactivity::{
    BaseDataPoint, FilterAction, FilterHost, InteractiveBehavior, LocalSelectionManager,
    ScreenPoint, SelectCallback, SelectionDataPoint, SelectionId, SelectionManager,
    SelectionScope,
};
use formula_semantic_filter::{ComparisonKind, ExprNode, Filter};
use std::cell::RefCell;
use std::rc::Rc;

/// Identity of the `Geo[Region] = region` row.
pub fn region_id(region: &str) -> SelectionId {
    SelectionId::with_scope(ExprNode::compare(
        ComparisonKind::Equal,
        ExprNode::column_ref("Geo", "Region"),
        ExprNode::constant(region),
    ))
}

pub fn region_points(regions: &[&str]) -> Vec<SelectionDataPoint> {
    regions
        .iter()
        .map(|region| SelectionDataPoint::new(region_id(region)))
        .collect()
}

pub fn flags<P: BaseDataPoint>(points: &[P]) -> Vec<bool> {
    points.iter().map(BaseDataPoint::is_selected).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum BehaviorEvent {
    Bound { scope: SelectionScope, len: usize },
    Rendered { has_selection: bool, selected: Vec<bool> },
}

pub type BehaviorLog = Rc<RefCell<Vec<BehaviorEvent>>>;

/// Records bind and render calls into a shared log.
pub struct MockBehavior {
    log: BehaviorLog,
}

impl MockBehavior {
    pub fn boxed<P: BaseDataPoint>() -> (Box<dyn InteractiveBehavior<P>>, BehaviorLog) {
        let log = BehaviorLog::default();
        let behavior = MockBehavior {
            log: Rc::clone(&log),
        };
        (Box::new(behavior), log)
    }
}

impl<P: BaseDataPoint> InteractiveBehavior<P> for MockBehavior {
    fn bind_events(&mut self, scope: SelectionScope, data_points: &[P]) {
        self.log.borrow_mut().push(BehaviorEvent::Bound {
            scope,
            len: data_points.len(),
        });
    }

    fn render_selection(&mut self, has_selection: bool, data_points: &[P]) {
        self.log.borrow_mut().push(BehaviorEvent::Rendered {
            has_selection,
            selected: flags(data_points),
        });
    }
}

pub fn renders(log: &BehaviorLog) -> Vec<BehaviorEvent> {
    log.borrow()
        .iter()
        .filter(|event| matches!(event, BehaviorEvent::Rendered { .. }))
        .cloned()
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum ManagerCall {
    Select { ids: Vec<SelectionId>, multi_select: bool },
    Clear,
    ApplySelectionFilter,
    ContextMenu { identity: Option<SelectionId>, position: ScreenPoint },
}

#[derive(Default)]
pub struct ManagerState {
    pub selection: LocalSelectionManager<SelectionId>,
    pub calls: Vec<ManagerCall>,
    pub callback: Option<SelectCallback>,
}

/// A host selection manager with local toggle semantics that records every call.
#[derive(Clone, Default)]
pub struct RecordingSelectionManager {
    pub state: Rc<RefCell<ManagerState>>,
}

impl RecordingSelectionManager {
    pub fn with_selection(ids: Vec<SelectionId>) -> Self {
        let manager = Self::default();
        manager.state.borrow_mut().selection.select(ids, false);
        manager
    }

    pub fn calls(&self) -> Vec<ManagerCall> {
        self.state.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<ManagerCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn ids(&self) -> Vec<SelectionId> {
        self.state.borrow().selection.selection_ids()
    }

    /// Change the selection as another visual would and notify the registered callback.
    pub fn select_externally(&self, ids: Vec<SelectionId>) {
        self.state.borrow_mut().selection.select(ids, false);
        let callback = self.state.borrow_mut().callback.take();
        if let Some(mut callback) = callback {
            callback();
            self.state.borrow_mut().callback = Some(callback);
        }
    }
}

impl SelectionManager<SelectionId> for RecordingSelectionManager {
    fn selection_ids(&self) -> Vec<SelectionId> {
        self.state.borrow().selection.selection_ids()
    }

    fn select(&mut self, ids: Vec<SelectionId>, multi_select: bool) {
        let mut state = self.state.borrow_mut();
        state.calls.push(ManagerCall::Select {
            ids: ids.clone(),
            multi_select,
        });
        state.selection.select(ids, multi_select);
    }

    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(ManagerCall::Clear);
        state.selection.clear();
    }

    fn apply_selection_filter(&mut self) {
        self.state
            .borrow_mut()
            .calls
            .push(ManagerCall::ApplySelectionFilter);
    }

    fn show_context_menu(&mut self, identity: Option<&SelectionId>, position: ScreenPoint) {
        self.state.borrow_mut().calls.push(ManagerCall::ContextMenu {
            identity: identity.cloned(),
            position,
        });
    }

    fn register_on_select_callback(&mut self, callback: SelectCallback) -> bool {
        self.state.borrow_mut().callback = Some(callback);
        true
    }
}

/// A host selection manager that toggles identities but never drops the other identity kind.
#[derive(Clone, Default)]
pub struct TogglingSelectionManager {
    pub ids: Rc<RefCell<Vec<SelectionId>>>,
}

impl SelectionManager<SelectionId> for TogglingSelectionManager {
    fn selection_ids(&self) -> Vec<SelectionId> {
        self.ids.borrow().clone()
    }

    fn select(&mut self, ids: Vec<SelectionId>, multi_select: bool) {
        let mut selected = self.ids.borrow_mut();
        if !multi_select {
            *selected = ids;
            return;
        }
        for id in ids {
            match selected.iter().position(|existing| *existing == id) {
                Some(index) => {
                    selected.remove(index);
                }
                None => selected.push(id),
            }
        }
    }

    fn clear(&mut self) {
        self.ids.borrow_mut().clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppliedJsonFilter {
    pub filter: Filter,
    pub object_name: String,
    pub property_name: String,
    pub action: FilterAction,
}

/// Records every filter write-back.
#[derive(Clone, Default)]
pub struct RecordingFilterHost {
    pub applied: Rc<RefCell<Vec<AppliedJsonFilter>>>,
}

impl RecordingFilterHost {
    pub fn take(&self) -> Vec<AppliedJsonFilter> {
        std::mem::take(&mut *self.applied.borrow_mut())
    }
}

impl FilterHost for RecordingFilterHost {
    fn apply_json_filter(
        &mut self,
        filter: &Filter,
        object_name: &str,
        property_name: &str,
        action: FilterAction,
    ) {
        self.applied.borrow_mut().push(AppliedJsonFilter {
            filter: filter.clone(),
            object_name: object_name.to_string(),
            property_name: property_name.to_string(),
            action,
        });
    }
}
