//! Selection identity tokens.

use formula_semantic_filter::{ExprKind, ExprNode, IdentityFactory};

/// Operations the services need from an identity token.
pub trait SelectionIdentity {
    /// Whether `self` subsumes `other`. A selected identity marks every data point it includes.
    fn includes(&self, other: &Self) -> bool;

    /// `true` for identities that carry scope data, `false` for measure-only identities.
    fn has_identity(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("unsupported scope expression kind {0:?}")]
    UnsupportedScopeExpr(ExprKind),
}

/// A selection identity: scope expressions identifying rows plus the measures selected on them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionId {
    pub data: Vec<ExprNode>,
    pub measures: Vec<String>,
}

impl SelectionId {
    pub fn with_scope(scope_expr: ExprNode) -> Self {
        Self {
            data: vec![scope_expr],
            measures: Vec::new(),
        }
    }

    pub fn with_measure(measure: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            measures: vec![measure.into()],
        }
    }

    pub fn and_measure(mut self, measure: impl Into<String>) -> Self {
        self.measures.push(measure.into());
        self
    }

    pub fn and_scope(mut self, scope_expr: ExprNode) -> Self {
        self.data.push(scope_expr);
        self
    }
}

impl SelectionIdentity for SelectionId {
    fn includes(&self, other: &Self) -> bool {
        if self.data.is_empty() {
            return self.measures == other.measures;
        }
        if other.data.is_empty() {
            return false;
        }
        self.data.iter().all(|scope| other.data.contains(scope))
    }

    fn has_identity(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Builds [`SelectionId`]s from the equality chains produced by filter restoration.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionIdFactory;

impl IdentityFactory for SelectionIdFactory {
    type Identity = SelectionId;
    type Error = IdentityError;

    fn create_identity(&self, scope_expr: ExprNode) -> Result<SelectionId, IdentityError> {
        match scope_expr.kind {
            ExprKind::Compare | ExprKind::And => Ok(SelectionId::with_scope(scope_expr)),
            other => Err(IdentityError::UnsupportedScopeExpr(other)),
        }
    }
}
