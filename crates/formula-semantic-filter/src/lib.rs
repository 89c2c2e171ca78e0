mod descriptor;
mod error;
mod expr;
mod target;
mod translator;
mod value;

pub use crate::descriptor::{
    AdvancedFilter, AdvancedFilterCondition, BasicFilter, BasicFilterOperator, ConditionOperator,
    Filter, FilterTarget, FilterType, LogicalOperator, ADVANCED_FILTER_SCHEMA,
    BASIC_FILTER_SCHEMA,
};
pub use crate::error::{FilterError, FilterResult};
pub use crate::expr::{AppliedFilter, ComparisonKind, ExprKind, ExprNode, WhereItem};
pub use crate::target::{extract_filter_column_target, ColumnMetadata};
pub use crate::translator::{
    basic_filter_operator_for_kind, condition_operator_for_comparison, get_condition,
    get_conditions, get_value, logical_operator_for_kind, restore_filter, restore_selection_ids,
    IdentityFactory,
};
pub use crate::value::{FilterValue, Literal, PrimitiveValue};
