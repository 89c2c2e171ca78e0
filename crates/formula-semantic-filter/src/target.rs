use crate::descriptor::FilterTarget;
use crate::expr::{ExprKind, ExprNode};
use serde::{Deserialize, Serialize};

/// Descriptive metadata of a bound category column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<ExprNode>,
    /// Scope expressions identifying the column's rows, in host order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identity_exprs: Vec<ExprNode>,
}

/// Derive the `(table, column)` a category filter must target.
///
/// Plain columns read `expr.source.entity` and `expr.ref`. Hierarchy levels name the level as
/// the column; their table comes from the wrapped entity, except for host-generated date
/// hierarchies (a property variation source), whose table is the source entity of the last
/// identity expression.
pub fn extract_filter_column_target(column: &ColumnMetadata) -> FilterTarget {
    let Some(expr) = column.expr.as_ref() else {
        return FilterTarget::default();
    };

    if expr.kind == ExprKind::HierarchyLevel {
        let hierarchy_source = expr.arg.as_deref().and_then(|hierarchy| hierarchy.arg.as_deref());
        let table = match hierarchy_source {
            Some(source) if source.kind == ExprKind::PropertyVariationSource => column
                .identity_exprs
                .last()
                .and_then(|identity| identity.source.as_deref())
                .and_then(|source| source.entity.clone()),
            Some(source) => source.entity.clone(),
            None => None,
        };
        return FilterTarget {
            table,
            column: expr.level.clone(),
        };
    }

    FilterTarget {
        table: expr.source.as_deref().and_then(|source| source.entity.clone()),
        column: expr.reference.clone(),
    }
}
