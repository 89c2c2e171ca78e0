//! The seam between the services and the visual's rendering layer.

use crate::data_point::BaseDataPoint;
use crate::host::ScreenPoint;
use serde::{Deserialize, Serialize};

/// Which rendering of the shared data a binding targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionScope {
    Primary,
    Legend,
    Labels,
}

/// Implemented by the visual: hooks up input handling and redraws selection state.
pub trait InteractiveBehavior<P> {
    fn bind_events(&mut self, scope: SelectionScope, data_points: &[P]);

    fn render_selection(&mut self, has_selection: bool, data_points: &[P]);
}

/// Exposed by the services to behaviors.
pub trait SelectionHandler<P> {
    /// `None` is ignored. An empty slice clears the selection.
    fn handle_selection(&mut self, data_points: Option<&mut [P]>, multi_select: bool);

    fn handle_clear_selection(&mut self);

    fn handle_context_menu(&mut self, data_point: &P, position: ScreenPoint);

    fn apply_selection_filter(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractivityServiceOptions {
    pub is_legend: bool,
    pub is_labels: bool,
    pub override_selection_from_data: bool,
}

impl InteractivityServiceOptions {
    pub fn legend() -> Self {
        Self {
            is_legend: true,
            ..Self::default()
        }
    }

    pub fn labels() -> Self {
        Self {
            is_labels: true,
            ..Self::default()
        }
    }

    /// Legend wins over labels; neither means the primary rendering.
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

pub struct BehaviorOptions<P> {
    pub behavior: Box<dyn InteractiveBehavior<P>>,
    pub data_points: Vec<P>,
    pub interactivity_service_options: InteractivityServiceOptions,
}

impl<P> BehaviorOptions<P> {
    pub fn new(behavior: Box<dyn InteractiveBehavior<P>>, data_points: Vec<P>) -> Self {
        Self {
            behavior,
            data_points,
            interactivity_service_options: InteractivityServiceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InteractivityServiceOptions) -> Self {
        self.interactivity_service_options = options;
        self
    }
}

/// Pointer input on a rendered element, addressed by data point index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Click { index: usize, ctrl_key: bool },
    /// A click on the background outside every element.
    ClearCatcherClick { ctrl_key: bool },
    ContextMenu { index: usize, position: ScreenPoint },
}

/// Route a pointer event over `data_points` to `handler`.
///
/// Ctrl-click adds to the selection; a plain background click clears it. Events addressing a
/// missing index are dropped.
pub fn dispatch_interaction<P, H>(handler: &mut H, data_points: &mut [P], event: PointerEvent)
where
    H: SelectionHandler<P> + ?Sized,
{
    match event {
        PointerEvent::Click { index, ctrl_key } => {
            if let Some(point) = data_points.get_mut(index) {
                handler.handle_selection(Some(std::slice::from_mut(point)), ctrl_key);
            }
        }
        PointerEvent::ClearCatcherClick { ctrl_key: false } => handler.handle_clear_selection(),
        PointerEvent::ClearCatcherClick { ctrl_key: true } => {}
        PointerEvent::ContextMenu { index, position } => {
            if let Some(point) = data_points.get(index) {
                handler.handle_context_menu(point, position);
            }
        }
    }
}

pub const SELECTED_OPACITY: f64 = 0.5;
pub const DEFAULT_OPACITY: f64 = 1.0;

/// A behavior that styles element opacity by selection state.
///
/// Elements are addressed by index; `style` receives `(index, opacity)` for every element on each
/// render.
pub struct BaseBehavior {
    scope: Option<SelectionScope>,
    style: Box<dyn FnMut(usize, f64)>,
}

impl BaseBehavior {
    pub fn new(style: impl FnMut(usize, f64) + 'static) -> Self {
        Self {
            scope: None,
            style: Box::new(style),
        }
    }

    /// The scope this behavior was last bound to.
    pub fn scope(&self) -> Option<SelectionScope> {
        self.scope
    }
}

impl std::fmt::Debug for BaseBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseBehavior")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<P: BaseDataPoint> InteractiveBehavior<P> for BaseBehavior {
    fn bind_events(&mut self, scope: SelectionScope, _data_points: &[P]) {
        self.scope = Some(scope);
    }

    fn render_selection(&mut self, has_selection: bool, data_points: &[P]) {
        for (index, point) in data_points.iter().enumerate() {
            let opacity = if has_selection && point.is_selected() {
                SELECTED_OPACITY
            } else {
                DEFAULT_OPACITY
            };
            (self.style)(index, opacity);
        }
    }
}
