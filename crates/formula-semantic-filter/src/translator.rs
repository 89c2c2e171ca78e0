//! Translation from the host's stored semantic filter back to filter descriptors and selection
//! identities.
//!
//! The stored condition is a boolean tree. Membership conditions (`In`, or `In` wrapped in
//! `Not`/`And`) restore to a [`BasicFilter`]; everything else is flattened into a list of
//! `(value, operator)` conditions and restored as an [`AdvancedFilter`].
//!
//! Comparison-less `Contains`/`Compare`/`StartsWith`/`Not` nodes are *composite*: their children
//! are translated recursively and then rewritten with the parent's operator. This is how the host
//! encodes negations (`Not(Compare(...))` is "is not") and blanks (a `null` constant compared with
//! `Is` is "is blank").

use crate::descriptor::{
    AdvancedFilter, AdvancedFilterCondition, BasicFilter, BasicFilterOperator, ConditionOperator,
    Filter, LogicalOperator,
};
use crate::error::{FilterError, FilterResult};
use crate::expr::{AppliedFilter, ComparisonKind, ExprKind, ExprNode};
use crate::value::{FilterValue, Literal};
use std::fmt;

/// Builds host selection identities from scope expressions.
///
/// Supplied by the caller so translation never reaches for a global host object.
pub trait IdentityFactory {
    type Identity;
    type Error: fmt::Display;

    fn create_identity(&self, scope_expr: ExprNode) -> Result<Self::Identity, Self::Error>;
}

/// Restore a filter descriptor from the first where-item of `filter`.
///
/// Returns `None` when there is no first condition to restore.
pub fn restore_filter(filter: &AppliedFilter) -> Option<Filter> {
    let expr = filter.first_condition()?;
    if let ExprKind::Unknown(code) = expr.kind {
        log::debug!("restoring filter with unrecognised expression kind {code}");
    }

    let membership_rows = expr
        .values
        .as_ref()
        .or_else(|| expr.arg.as_deref().and_then(|arg| arg.values.as_ref()));

    match (basic_filter_operator_for_kind(expr.kind), membership_rows) {
        (Some(operator), Some(rows)) => Some(Filter::Basic(restore_basic_filter(operator, rows))),
        _ => Some(Filter::Advanced(restore_advanced_filter(expr))),
    }
}

fn restore_basic_filter(operator: BasicFilterOperator, rows: &[Vec<ExprNode>]) -> BasicFilter {
    let values = rows
        .iter()
        .map(|row| {
            FilterValue::Tuple(
                row.iter()
                    .map(|cell| get_value(cell).as_value().cloned())
                    .collect(),
            )
        })
        .collect();
    BasicFilter::new(None, operator, values)
}

fn restore_advanced_filter(expr: &ExprNode) -> AdvancedFilter {
    match logical_operator_for_kind(expr.kind) {
        Some(logical_operator) => {
            let operands = [expr.left.as_deref(), expr.right.as_deref()];
            let conditions = get_conditions(operands.into_iter().flatten());
            AdvancedFilter::new(None, logical_operator, conditions)
        }
        None => AdvancedFilter::new(None, LogicalOperator::And, get_conditions([expr])),
    }
}

/// Operator a composite node imposes on its children, keyed by the node's own kind.
fn composite_operator(kind: ExprKind) -> Option<ConditionOperator> {
    match kind {
        ExprKind::Contains => Some(ConditionOperator::Contains),
        ExprKind::Compare => Some(ConditionOperator::Is),
        ExprKind::StartsWith => Some(ConditionOperator::StartsWith),
        ExprKind::Not => Some(ConditionOperator::DoesNotContain),
        _ => None,
    }
}

fn is_composite(expr: &ExprNode) -> Option<ConditionOperator> {
    let has_operands = (expr.left.is_some() && expr.right.is_some()) || expr.arg.is_some();
    if has_operands && expr.comparison.is_none() {
        composite_operator(expr.kind)
    } else {
        None
    }
}

/// Flatten `exprs` into advanced filter conditions.
pub fn get_conditions<'a>(
    exprs: impl IntoIterator<Item = &'a ExprNode>,
) -> Vec<AdvancedFilterCondition> {
    let mut conditions = Vec::new();
    for expr in exprs {
        match is_composite(expr) {
            Some(parent) => conditions.extend(composite_conditions(expr, parent)),
            None => conditions.push(get_condition(expr)),
        }
    }
    conditions
}

fn composite_conditions(
    expr: &ExprNode,
    parent: ConditionOperator,
) -> Vec<AdvancedFilterCondition> {
    // A null value is a stored blank; only undefined values are dropped.
    let mut inner: Vec<_> = get_conditions(expr.children())
        .into_iter()
        .filter(|condition| !condition.value.is_undefined())
        .collect();

    for condition in &mut inner {
        if condition.operator == ConditionOperator::None {
            condition.operator = parent;
        }
        if condition.value.is_null() {
            condition.operator = match condition.operator {
                ConditionOperator::Is => ConditionOperator::IsBlank,
                ConditionOperator::DoesNotContain => ConditionOperator::IsNotBlank,
                other => other,
            };
        }
    }

    if parent == ConditionOperator::DoesNotContain {
        if let Some(negated) = uniform_operator(&inner).and_then(negate_operator) {
            for condition in &mut inner {
                condition.operator = negated;
            }
        }
    }

    inner
}

fn uniform_operator(conditions: &[AdvancedFilterCondition]) -> Option<ConditionOperator> {
    let first = conditions.first()?.operator;
    conditions
        .iter()
        .all(|condition| condition.operator == first)
        .then_some(first)
}

/// Negated form of an operator shared by every child of a `Not` node.
fn negate_operator(operator: ConditionOperator) -> Option<ConditionOperator> {
    match operator {
        ConditionOperator::StartsWith => Some(ConditionOperator::DoesNotStartWith),
        ConditionOperator::Contains => Some(ConditionOperator::DoesNotContain),
        ConditionOperator::Is => Some(ConditionOperator::IsNot),
        ConditionOperator::IsBlank => Some(ConditionOperator::IsNotBlank),
        _ => None,
    }
}

pub fn get_condition(expr: &ExprNode) -> AdvancedFilterCondition {
    AdvancedFilterCondition {
        value: get_value(expr),
        operator: condition_operator_for_comparison(expr.comparison),
    }
}

/// The literal carried by `expr`: its own value for constants and `Contains` nodes, otherwise the
/// first defined value found depth-first through left, right and arg.
pub fn get_value(expr: &ExprNode) -> Literal {
    if matches!(expr.kind, ExprKind::Constant | ExprKind::Contains) {
        return expr.value.clone();
    }
    expr.children()
        .map(get_value)
        .find(|value| !value.is_undefined())
        .unwrap_or_default()
}

pub fn condition_operator_for_comparison(comparison: Option<ComparisonKind>) -> ConditionOperator {
    match comparison {
        Some(ComparisonKind::Equal | ComparisonKind::Is) => ConditionOperator::Is,
        Some(ComparisonKind::GreaterThan) => ConditionOperator::GreaterThan,
        Some(ComparisonKind::GreaterThanOrEqual) => ConditionOperator::GreaterThanOrEqual,
        Some(ComparisonKind::LessThan) => ConditionOperator::LessThan,
        Some(ComparisonKind::LessThanOrEqual) => ConditionOperator::LessThanOrEqual,
        Some(ComparisonKind::Contains) => ConditionOperator::Contains,
        Some(ComparisonKind::DoesNotContain) => ConditionOperator::DoesNotContain,
        Some(ComparisonKind::StartsWith) => ConditionOperator::StartsWith,
        Some(ComparisonKind::Unknown(code)) => {
            log::debug!("unrecognised comparison kind {code}");
            ConditionOperator::None
        }
        None => ConditionOperator::None,
    }
}

pub fn basic_filter_operator_for_kind(kind: ExprKind) -> Option<BasicFilterOperator> {
    match kind {
        ExprKind::In => Some(BasicFilterOperator::In),
        ExprKind::And => Some(BasicFilterOperator::All),
        ExprKind::Not => Some(BasicFilterOperator::NotIn),
        _ => None,
    }
}

pub fn logical_operator_for_kind(kind: ExprKind) -> Option<LogicalOperator> {
    match kind {
        ExprKind::And => Some(LogicalOperator::And),
        ExprKind::Or => Some(LogicalOperator::Or),
        _ => None,
    }
}

/// Rebuild selection identities from the membership rows of a stored filter.
///
/// Each row becomes an AND of `column = value` comparisons handed to `factory`. Any failure
/// yields an empty list: the host's filter shape is not under our control.
pub fn restore_selection_ids<F: IdentityFactory>(
    filter: &AppliedFilter,
    factory: &F,
) -> Vec<F::Identity> {
    let has_rows = filter
        .first_condition()
        .is_some_and(|condition| condition.values.is_some());
    if !has_rows {
        return Vec::new();
    }

    match try_restore_selection_ids(filter, factory) {
        Ok(ids) => ids,
        Err(err) => {
            log::debug!("discarding selection ids restored from filter: {err}");
            Vec::new()
        }
    }
}

fn try_restore_selection_ids<F: IdentityFactory>(
    filter: &AppliedFilter,
    factory: &F,
) -> FilterResult<Vec<F::Identity>> {
    let mut ids = Vec::new();
    for condition in filter.where_items.iter().filter_map(|item| item.condition.as_ref()) {
        let Some(rows) = condition.values.as_ref() else {
            continue;
        };
        for row in rows {
            let scope_expr = row_scope_expr(&condition.args, row)?;
            let id = factory
                .create_identity(scope_expr)
                .map_err(|err| FilterError::Identity(err.to_string()))?;
            ids.push(id);
        }
    }
    Ok(ids)
}

fn row_scope_expr(columns: &[ExprNode], row: &[ExprNode]) -> FilterResult<ExprNode> {
    let mut scope: Option<ExprNode> = None;
    for (index, column) in columns.iter().enumerate() {
        let value = row.get(index).ok_or(FilterError::MissingTupleValue {
            index,
            arity: columns.len(),
        })?;
        let equality = ExprNode::compare(ComparisonKind::Equal, column.clone(), value.clone());
        scope = Some(match scope {
            Some(prev) => ExprNode::and(prev, equality),
            None => equality,
        });
    }
    scope.ok_or(FilterError::EmptyScope)
}
