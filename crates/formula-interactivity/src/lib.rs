//! Selection state shared between a visual, its legend and its labels, kept in sync with the host.
//!
//! Two services share one reconciliation engine ([`InteractivityService`]):
//! - the identity-based service keeps the selection in the host's [`SelectionManager`] and matches
//!   data points through [`SelectionIdentity::includes`];
//! - the category-based service keeps selected category values locally and writes them back to
//!   the host as a basic filter.

mod behavior;
mod data_point;
mod filter_service;
mod host;
mod identity;
mod render;
mod selection_service;
mod service;

pub use crate::behavior::{
    dispatch_interaction, BaseBehavior, BehaviorOptions, InteractiveBehavior,
    InteractivityServiceOptions, PointerEvent, SelectionHandler, SelectionScope,
    DEFAULT_OPACITY, SELECTED_OPACITY,
};
pub use crate::data_point::{
    data_has_selection, BaseDataPoint, CategoryDataPoint, FilterDataPoint, SelectableDataPoint,
    SelectionDataPoint,
};
pub use crate::filter_service::{
    create_interactivity_filter_service, CategorySelection, FilterBehaviorOptions,
    InteractivityFilterService,
};
pub use crate::host::{
    FilterAction, FilterHost, FilterObjectProperty, LocalSelectionManager, ScreenPoint,
    SelectCallback, SelectionManager,
};
pub use crate::identity::{IdentityError, SelectionId, SelectionIdFactory, SelectionIdentity};
pub use crate::render::{
    create_render_selection_service, RenderBehavior, RenderBehaviorOptions,
    RenderSelectionService, RenderSelectionServiceOptions,
};
pub use crate::selection_service::{
    create_interactivity_selection_service, IdentitySelection, InteractivitySelectionService,
    SharedInteractivityService,
};
pub use crate::service::{InteractivityService, SelectionStrategy};
