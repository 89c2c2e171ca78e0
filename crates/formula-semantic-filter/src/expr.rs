//! The host's serialized semantic query expressions.
//!
//! A stored filter is a tree of loosely shaped nodes: every node carries a numeric `_kind` tag and
//! only the fields meaningful for that kind. [`ExprNode`] keeps that shape (all structural fields
//! optional) so translation can stay defensive about what the host actually sent, while the tags
//! themselves are closed enums ([`ExprKind`], [`ComparisonKind`]) with an `Unknown` escape hatch
//! for codes this crate does not recognise.

use crate::error::{FilterError, FilterResult};
use crate::value::Literal;
use serde::{Deserialize, Serialize};

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident = $code:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "u8", into = "u8")]
        pub enum $name {
            $($variant,)*
            /// A code outside the known vocabulary, preserved for round-tripping.
            Unknown(u8),
        }

        impl From<u8> for $name {
            fn from(code: u8) -> Self {
                match code {
                    $($code => $name::$variant,)*
                    other => $name::Unknown(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(kind: $name) -> u8 {
                match kind {
                    $($name::$variant => $code,)*
                    $name::Unknown(other) => other,
                }
            }
        }
    };
}

coded_enum! {
    /// Semantic query expression kinds, numbered as the host numbers them.
    pub enum ExprKind {
        Entity = 0,
        SubqueryRef = 1,
        ColumnRef = 2,
        MeasureRef = 3,
        Aggregation = 4,
        PropertyVariationSource = 5,
        Hierarchy = 6,
        HierarchyLevel = 7,
        And = 8,
        Between = 9,
        In = 10,
        Or = 11,
        Contains = 12,
        Compare = 13,
        StartsWith = 14,
        Exists = 15,
        Not = 16,
        Constant = 17,
        DateSpan = 18,
        DateAdd = 19,
        Now = 20,
        AnyValue = 21,
        DefaultValue = 22,
        Arithmetic = 23,
        FillRule = 24,
        ResourcePackageItem = 25,
        ScopedEval = 26,
        WithRef = 27,
        Percentile = 28,
        SelectRef = 29,
        TransformTableRef = 30,
        TransformOutputRoleRef = 31,
        ThemeDataColor = 32,
        GroupRef = 33,
        Floor = 34,
        RoleRef = 35,
        Discretize = 36,
        NamedQueryRef = 37,
        Member = 38,
        FilteredEval = 39,
        Conditional = 40,
    }
}

coded_enum! {
    /// Comparison sub-kinds carried by `Compare` nodes.
    pub enum ComparisonKind {
        Equal = 0,
        GreaterThan = 1,
        GreaterThanOrEqual = 2,
        LessThan = 3,
        LessThanOrEqual = 4,
        Contains = 12,
        Is = 13,
        StartsWith = 14,
        DoesNotContain = 16,
    }
}

/// One node of a semantic query expression tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExprNode {
    #[serde(rename = "_kind")]
    pub kind: ExprKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<ExprNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<ExprNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Box<ExprNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonKind>,
    #[serde(default, skip_serializing_if = "Literal::is_undefined")]
    pub value: Literal,
    /// Membership rows of an `In` node: one tuple of constant nodes per row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<ExprNode>>>,
    /// The columns an `In` node compares against, positionally matching each row in `values`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ExprNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Box<ExprNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl ExprNode {
    /// A node of `kind` with every structural field empty.
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            left: None,
            right: None,
            arg: None,
            comparison: None,
            value: Literal::Undefined,
            values: None,
            args: Vec::new(),
            source: None,
            entity: None,
            reference: None,
            level: None,
            hierarchy: None,
            property: None,
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        let mut node = Self::new(ExprKind::Entity);
        node.entity = Some(name.into());
        node
    }

    /// `table[column]`
    pub fn column_ref(table: impl Into<String>, column: impl Into<String>) -> Self {
        let mut node = Self::new(ExprKind::ColumnRef);
        node.source = Some(Box::new(Self::entity(table)));
        node.reference = Some(column.into());
        node
    }

    pub fn constant(value: impl Into<Literal>) -> Self {
        let mut node = Self::new(ExprKind::Constant);
        node.value = value.into();
        node
    }

    pub fn compare(comparison: ComparisonKind, left: ExprNode, right: ExprNode) -> Self {
        let mut node = Self::new(ExprKind::Compare);
        node.comparison = Some(comparison);
        node.left = Some(Box::new(left));
        node.right = Some(Box::new(right));
        node
    }

    pub fn binary(kind: ExprKind, left: ExprNode, right: ExprNode) -> Self {
        let mut node = Self::new(kind);
        node.left = Some(Box::new(left));
        node.right = Some(Box::new(right));
        node
    }

    pub fn and(left: ExprNode, right: ExprNode) -> Self {
        Self::binary(ExprKind::And, left, right)
    }

    pub fn or(left: ExprNode, right: ExprNode) -> Self {
        Self::binary(ExprKind::Or, left, right)
    }

    pub fn not(arg: ExprNode) -> Self {
        let mut node = Self::new(ExprKind::Not);
        node.arg = Some(Box::new(arg));
        node
    }

    /// `(args...) IN { rows... }`
    pub fn in_values(args: Vec<ExprNode>, values: Vec<Vec<ExprNode>>) -> Self {
        let mut node = Self::new(ExprKind::In);
        node.args = args;
        node.values = Some(values);
        node
    }

    /// Left, right and arg children in that order, skipping absent ones.
    pub fn children(&self) -> impl Iterator<Item = &ExprNode> {
        [&self.left, &self.right, &self.arg]
            .into_iter()
            .filter_map(|child| child.as_deref())
    }
}

/// One `where` clause of an applied filter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WhereItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ExprNode>,
}

/// The host's persisted ("semantic") filter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilter {
    #[serde(default)]
    pub where_items: Vec<WhereItem>,
}

impl AppliedFilter {
    pub fn new(conditions: impl IntoIterator<Item = ExprNode>) -> Self {
        Self {
            where_items: conditions
                .into_iter()
                .map(|condition| WhereItem {
                    condition: Some(condition),
                })
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> FilterResult<Self> {
        serde_json::from_str(json).map_err(FilterError::from)
    }

    /// The condition of the first where-item, which is the only one filter restoration reads.
    pub fn first_condition(&self) -> Option<&ExprNode> {
        self.where_items.first()?.condition.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn kinds_use_host_numbering() {
        assert_eq!(ExprKind::from(7), ExprKind::HierarchyLevel);
        assert_eq!(ExprKind::from(16), ExprKind::Not);
        assert_eq!(ExprKind::from(40), ExprKind::Conditional);
        assert_eq!(ExprKind::from(99), ExprKind::Unknown(99));
        assert_eq!(u8::from(ExprKind::Constant), 17);

        assert_eq!(ComparisonKind::from(13), ComparisonKind::Is);
        assert_eq!(ComparisonKind::from(5), ComparisonKind::Unknown(5));
        assert_eq!(u8::from(ComparisonKind::DoesNotContain), 16);
    }

    #[test]
    fn parses_host_condition_json() {
        let json = r#"{
            "whereItems": [{
                "condition": {
                    "_kind": 13,
                    "comparison": 1,
                    "left": {
                        "_kind": 2,
                        "source": { "_kind": 0, "entity": "Sales" },
                        "ref": "Amount"
                    },
                    "right": { "_kind": 17, "value": 10 }
                }
            }]
        }"#;

        let filter = AppliedFilter::from_json_str(json).unwrap();
        let expected = ExprNode::compare(
            ComparisonKind::GreaterThan,
            ExprNode::column_ref("Sales", "Amount"),
            ExprNode::constant(10.0),
        );
        assert_eq!(filter.first_condition(), Some(&expected));
        assert_eq!(
            filter.first_condition().and_then(|c| c.right.as_ref()).map(|r| r.value.clone()),
            Some(Literal::Value(PrimitiveValue::Number(10.0)))
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = AppliedFilter::from_json_str("{\"whereItems\": 3}").unwrap_err();
        assert!(matches!(err, FilterError::InvalidJson(_)));
    }

    #[test]
    fn children_skip_missing_slots() {
        let node = ExprNode::not(ExprNode::constant(1.0));
        let kinds: Vec<_> = node.children().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ExprKind::Constant]);
    }
}
