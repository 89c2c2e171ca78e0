#![allow(dead_code)]

use formula_semantic_filter::{
    AppliedFilter, ColumnMetadata, ComparisonKind, ExprKind, ExprNode, IdentityFactory, Literal,
};
use std::cell::Cell;

pub fn sales_amount() -> ExprNode {
    ExprNode::column_ref("Sales", "Amount")
}

pub fn single(condition: ExprNode) -> AppliedFilter {
    AppliedFilter::new([condition])
}

/// `Sales[Amount] <comparison> value`
pub fn amount_compare(comparison: ComparisonKind, value: impl Into<Literal>) -> ExprNode {
    ExprNode::compare(comparison, sales_amount(), ExprNode::constant(value))
}

/// `Sales[Amount] IN { rows... }` over single-column rows.
pub fn amount_in(rows: &[f64]) -> ExprNode {
    ExprNode::in_values(
        vec![sales_amount()],
        rows.iter().map(|v| vec![ExprNode::constant(*v)]).collect(),
    )
}

/// A comparison-less composite node (`Contains`/`StartsWith`) over `Sales[Amount]`.
pub fn composite(kind: ExprKind, value: impl Into<Literal>) -> ExprNode {
    ExprNode::binary(kind, sales_amount(), ExprNode::constant(value))
}

/// Column metadata for `table[column]`.
pub fn column_metadata(table: &str, column: &str) -> ColumnMetadata {
    ColumnMetadata {
        expr: Some(ExprNode::column_ref(table, column)),
        identity_exprs: Vec::new(),
    }
}

/// Hands the scope expression back as the identity and counts calls.
#[derive(Default)]
pub struct ScopeExprFactory {
    pub calls: Cell<usize>,
}

impl IdentityFactory for ScopeExprFactory {
    type Identity = ExprNode;
    type Error = String;

    fn create_identity(&self, scope_expr: ExprNode) -> Result<ExprNode, String> {
        self.calls.set(self.calls.get() + 1);
        Ok(scope_expr)
    }
}

/// Fails on every call after the first `succeed` ones.
pub struct FlakyFactory {
    pub succeed: usize,
    pub calls: Cell<usize>,
}

impl IdentityFactory for FlakyFactory {
    type Identity = ExprNode;
    type Error = String;

    fn create_identity(&self, scope_expr: ExprNode) -> Result<ExprNode, String> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call < self.succeed {
            Ok(scope_expr)
        } else {
            Err(format!("identity call {call} rejected"))
        }
    }
}
