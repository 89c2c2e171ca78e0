//! Category-based selection written back to the host as a basic filter.

use crate::behavior::BehaviorOptions;
use crate::data_point::{CategoryDataPoint, FilterDataPoint};
use crate::host::{FilterAction, FilterHost, FilterObjectProperty};
use crate::service::{InteractivityService, SelectionStrategy};
use formula_semantic_filter::{
    extract_filter_column_target, BasicFilter, BasicFilterOperator, ColumnMetadata, Filter,
    FilterTarget, FilterValue, PrimitiveValue,
};

/// Keeps the selected category values locally. Categories match by strict equality.
pub struct CategorySelection {
    host: Box<dyn FilterHost>,
    selected_categories: Vec<PrimitiveValue>,
    filter_column_target: FilterTarget,
    filter_object_property: FilterObjectProperty,
}

impl CategorySelection {
    pub fn new(host: Box<dyn FilterHost>) -> Self {
        Self {
            host,
            selected_categories: Vec::new(),
            filter_column_target: FilterTarget::default(),
            filter_object_property: FilterObjectProperty::default(),
        }
    }

    pub fn with_filter_object_property(mut self, property: FilterObjectProperty) -> Self {
        self.filter_object_property = property;
        self
    }

    pub fn selected_categories(&self) -> &[PrimitiveValue] {
        &self.selected_categories
    }

    pub fn filter_column_target(&self) -> &FilterTarget {
        &self.filter_column_target
    }

    pub fn filter_object_property(&self) -> &FilterObjectProperty {
        &self.filter_object_property
    }

    fn add_category(&mut self, category: PrimitiveValue) {
        if !self.selected_categories.contains(&category) {
            self.selected_categories.push(category);
        }
    }

    fn remove_category(&mut self, category: &PrimitiveValue) {
        self.selected_categories.retain(|selected| selected != category);
    }

    /// The filter describing the current selection.
    pub fn current_filter(&self) -> Filter {
        let values = self
            .selected_categories
            .iter()
            .cloned()
            .map(FilterValue::Scalar)
            .collect();
        Filter::Basic(BasicFilter::new(
            Some(self.filter_column_target.clone()),
            BasicFilterOperator::In,
            values,
        ))
    }
}

impl<P: CategoryDataPoint> SelectionStrategy<P> for CategorySelection {
    fn is_data_point_selected(&self, data_point: &P) -> bool {
        data_point
            .category()
            .is_some_and(|category| self.selected_categories.contains(category))
    }

    fn has_selection(&self) -> bool {
        !self.selected_categories.is_empty()
    }

    fn select(&mut self, data_points: &mut [P], multi_select: bool) {
        let original = self.selected_categories.clone();
        if !multi_select || data_points.is_empty() {
            self.selected_categories.clear();
        }

        for point in data_points.iter_mut() {
            let Some(category) = point.category().cloned() else {
                continue;
            };
            if original.contains(&category) {
                point.set_selected(false);
                self.remove_category(&category);
            } else {
                point.set_selected(true);
                self.add_category(category);
            }
        }
    }

    fn take_selection_state_from_data_points(&mut self, data_points: &[P]) {
        self.selected_categories.clear();
        for point in data_points.iter().filter(|point| point.is_selected()) {
            if let Some(category) = point.category() {
                self.add_category(category.clone());
            }
        }
    }

    fn send_selection_to_host(&mut self) {
        let filter = self.current_filter();
        let action = if self.selected_categories.is_empty() {
            FilterAction::Remove
        } else {
            FilterAction::Merge
        };
        log::debug!(
            "writing category filter ({action:?}, {} values) to {}.{}",
            self.selected_categories.len(),
            self.filter_object_property.object_name,
            self.filter_object_property.property_name
        );
        self.host.apply_json_filter(
            &filter,
            &self.filter_object_property.object_name,
            &self.filter_object_property.property_name,
            action,
        );
    }

    fn clear_selection(&mut self) {
        self.selected_categories.clear();
    }
}

pub struct FilterBehaviorOptions<P> {
    pub base: BehaviorOptions<P>,
    /// Metadata of the category column the visual filters on.
    pub category: ColumnMetadata,
    /// Filters currently applied by the host to this visual.
    pub json_filters: Vec<Filter>,
}

pub type InteractivityFilterService<P = FilterDataPoint> =
    InteractivityService<P, CategorySelection>;

impl<P: CategoryDataPoint> InteractivityService<P, CategorySelection> {
    /// Bind category data points. The filter target is derived from the column metadata and the
    /// selection is primed from the values of already-applied basic filters.
    pub fn bind_category(&mut self, options: FilterBehaviorOptions<P>) {
        let FilterBehaviorOptions {
            base,
            category: column,
            json_filters,
        } = options;

        let strategy = self.strategy_mut();
        strategy.filter_column_target = extract_filter_column_target(&column);
        strategy.selected_categories.clear();
        for filter in json_filters.iter().filter_map(Filter::as_basic) {
            for value in &filter.values {
                match value.as_scalar() {
                    Some(category) => strategy.add_category(category.clone()),
                    None => log::debug!("ignoring multi-column filter value {value:?}"),
                }
            }
        }

        self.bind(base);
    }
}

pub fn create_interactivity_filter_service<P: CategoryDataPoint>(
    host: Box<dyn FilterHost>,
) -> InteractivityFilterService<P> {
    InteractivityService::new(CategorySelection::new(host))
}
