use crate::identity::{SelectionId, SelectionIdentity};
use formula_semantic_filter::PrimitiveValue;

/// A rendered element carrying a selection flag.
///
/// Only the interactivity services write the flag; behaviors read it when rendering.
pub trait BaseDataPoint {
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);
}

/// A data point selected through an identity token.
pub trait SelectableDataPoint: BaseDataPoint {
    type Identity: SelectionIdentity;

    /// `None` makes the point inert for selection.
    fn identity(&self) -> Option<&Self::Identity>;

    /// A finer-grained identity, carried through but never used for matching.
    fn specific_identity(&self) -> Option<&Self::Identity> {
        None
    }
}

/// A data point selected through the raw value of its category.
pub trait CategoryDataPoint: BaseDataPoint {
    fn category(&self) -> Option<&PrimitiveValue>;
}

pub fn data_has_selection<P: BaseDataPoint>(data_points: &[P]) -> bool {
    data_points.iter().any(BaseDataPoint::is_selected)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionDataPoint<I = SelectionId> {
    pub selected: bool,
    pub identity: Option<I>,
    pub specific_identity: Option<I>,
}

impl<I> SelectionDataPoint<I> {
    pub fn new(identity: I) -> Self {
        Self {
            selected: false,
            identity: Some(identity),
            specific_identity: None,
        }
    }

    /// A point with no identity.
    pub fn anonymous() -> Self {
        Self {
            selected: false,
            identity: None,
            specific_identity: None,
        }
    }
}

impl<I> BaseDataPoint for SelectionDataPoint<I> {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

impl<I: SelectionIdentity> SelectableDataPoint for SelectionDataPoint<I> {
    type Identity = I;

    fn identity(&self) -> Option<&I> {
        self.identity.as_ref()
    }

    fn specific_identity(&self) -> Option<&I> {
        self.specific_identity.as_ref()
    }
}

/// A data point of a visual that filters by category value.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterDataPoint {
    pub selected: bool,
    pub category: Option<PrimitiveValue>,
    pub identity: Option<SelectionId>,
}

impl FilterDataPoint {
    pub fn new(category: impl Into<PrimitiveValue>) -> Self {
        Self {
            selected: false,
            category: Some(category.into()),
            identity: None,
        }
    }
}

impl BaseDataPoint for FilterDataPoint {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

impl CategoryDataPoint for FilterDataPoint {
    fn category(&self) -> Option<&PrimitiveValue> {
        self.category.as_ref()
    }
}

impl SelectableDataPoint for FilterDataPoint {
    type Identity = SelectionId;

    fn identity(&self) -> Option<&SelectionId> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_has_selection_checks_any_flag() {
        let mut points = vec![FilterDataPoint::new("a"), FilterDataPoint::new("b")];
        assert!(!data_has_selection(&points));
        points[1].set_selected(true);
        assert!(data_has_selection(&points));
        assert!(!data_has_selection::<FilterDataPoint>(&[]));
    }
}
