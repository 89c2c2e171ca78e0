//! Declarative filter descriptors, in the JSON layout the host accepts for filter write-back.

use crate::error::{FilterError, FilterResult};
use crate::value::{FilterValue, Literal};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const BASIC_FILTER_SCHEMA: &str = "http://powerbi.com/product/schema#basic";
pub const ADVANCED_FILTER_SCHEMA: &str = "http://powerbi.com/product/schema#advanced";

/// The `(table, column)` a filter applies to. Either half may be unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTarget {
    pub table: Option<String>,
    pub column: Option<String>,
}

impl FilterTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: Some(column.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterType {
    Advanced,
    Basic,
}

impl FilterType {
    pub fn code(self) -> u8 {
        match self {
            FilterType::Advanced => 0,
            FilterType::Basic => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FilterType::Advanced),
            1 => Some(FilterType::Basic),
            _ => None,
        }
    }
}

impl Serialize for FilterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for FilterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        FilterType::from_code(code)
            .ok_or_else(|| D::Error::custom(format!("unknown filterType {code}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasicFilterOperator {
    In,
    NotIn,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    None,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Contains,
    DoesNotContain,
    StartsWith,
    DoesNotStartWith,
    Is,
    IsNot,
    IsBlank,
    IsNotBlank,
}

/// One `(value, operator)` pair of an advanced filter.
///
/// `value` keeps the undefined/null split from the source expression: a null value together with
/// `Is`/`IsNot` style operators is how blanks are stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilterCondition {
    #[serde(default, skip_serializing_if = "Literal::is_undefined")]
    pub value: Literal,
    pub operator: ConditionOperator,
}

impl AdvancedFilterCondition {
    pub fn new(value: impl Into<Literal>, operator: ConditionOperator) -> Self {
        Self {
            value: value.into(),
            operator,
        }
    }
}

fn basic_schema() -> String {
    BASIC_FILTER_SCHEMA.to_string()
}

fn advanced_schema() -> String {
    ADVANCED_FILTER_SCHEMA.to_string()
}

/// A membership filter over a literal value list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFilter {
    #[serde(rename = "$schema", default = "basic_schema")]
    pub schema: String,
    #[serde(default)]
    pub target: Option<FilterTarget>,
    pub filter_type: FilterType,
    pub operator: BasicFilterOperator,
    #[serde(default)]
    pub values: Vec<FilterValue>,
}

impl BasicFilter {
    pub fn new(
        target: Option<FilterTarget>,
        operator: BasicFilterOperator,
        values: Vec<FilterValue>,
    ) -> Self {
        Self {
            schema: basic_schema(),
            target,
            filter_type: FilterType::Basic,
            operator,
            values,
        }
    }
}

/// A boolean combination of per-column conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    #[serde(rename = "$schema", default = "advanced_schema")]
    pub schema: String,
    #[serde(default)]
    pub target: Option<FilterTarget>,
    pub filter_type: FilterType,
    pub logical_operator: LogicalOperator,
    #[serde(default)]
    pub conditions: Vec<AdvancedFilterCondition>,
}

impl AdvancedFilter {
    pub fn new(
        target: Option<FilterTarget>,
        logical_operator: LogicalOperator,
        conditions: Vec<AdvancedFilterCondition>,
    ) -> Self {
        Self {
            schema: advanced_schema(),
            target,
            filter_type: FilterType::Advanced,
            logical_operator,
            conditions,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Basic(BasicFilter),
    Advanced(AdvancedFilter),
}

impl Filter {
    pub fn filter_type(&self) -> FilterType {
        match self {
            Filter::Basic(_) => FilterType::Basic,
            Filter::Advanced(_) => FilterType::Advanced,
        }
    }

    pub fn target(&self) -> Option<&FilterTarget> {
        match self {
            Filter::Basic(f) => f.target.as_ref(),
            Filter::Advanced(f) => f.target.as_ref(),
        }
    }

    pub fn as_basic(&self) -> Option<&BasicFilter> {
        match self {
            Filter::Basic(f) => Some(f),
            Filter::Advanced(_) => None,
        }
    }

    pub fn as_advanced(&self) -> Option<&AdvancedFilter> {
        match self {
            Filter::Advanced(f) => Some(f),
            Filter::Basic(_) => None,
        }
    }

    pub fn from_json_str(json: &str) -> FilterResult<Self> {
        serde_json::from_str(json).map_err(FilterError::from)
    }

    pub fn to_json_value(&self) -> FilterResult<serde_json::Value> {
        serde_json::to_value(self).map_err(FilterError::from)
    }
}

impl From<BasicFilter> for Filter {
    fn from(filter: BasicFilter) -> Self {
        Filter::Basic(filter)
    }
}

impl From<AdvancedFilter> for Filter {
    fn from(filter: AdvancedFilter) -> Self {
        Filter::Advanced(filter)
    }
}

impl<'de> Deserialize<'de> for Filter {
    /// Dispatches on `filterType` so a malformed basic filter is reported as such instead of as a
    /// failed untagged match.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let code = raw
            .get("filterType")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| D::Error::missing_field("filterType"))?;
        match u8::try_from(code).ok().and_then(FilterType::from_code) {
            Some(FilterType::Basic) => serde_json::from_value(raw)
                .map(Filter::Basic)
                .map_err(D::Error::custom),
            Some(FilterType::Advanced) => serde_json::from_value(raw)
                .map(Filter::Advanced)
                .map_err(D::Error::custom),
            None => Err(D::Error::custom(format!("unknown filterType {code}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn basic_filter_uses_host_layout() {
        let filter = Filter::from(BasicFilter::new(
            Some(FilterTarget::new("Sales", "Region")),
            BasicFilterOperator::In,
            vec![FilterValue::Scalar(PrimitiveValue::from("East"))],
        ));

        assert_eq!(
            filter.to_json_value().unwrap(),
            json!({
                "$schema": BASIC_FILTER_SCHEMA,
                "target": { "table": "Sales", "column": "Region" },
                "filterType": 1,
                "operator": "In",
                "values": ["East"],
            })
        );
    }

    #[test]
    fn advanced_filter_keeps_null_condition_values() {
        let json = r#"{
            "$schema": "http://powerbi.com/product/schema#advanced",
            "target": null,
            "filterType": 0,
            "logicalOperator": "Or",
            "conditions": [
                { "value": null, "operator": "IsBlank" },
                { "value": 3, "operator": "LessThan" }
            ]
        }"#;

        let filter = Filter::from_json_str(json).unwrap();
        let advanced = filter.as_advanced().unwrap();
        assert_eq!(advanced.logical_operator, LogicalOperator::Or);
        assert_eq!(
            advanced.conditions,
            vec![
                AdvancedFilterCondition::new(Literal::Null, ConditionOperator::IsBlank),
                AdvancedFilterCondition::new(3.0, ConditionOperator::LessThan),
            ]
        );
    }

    #[test]
    fn unknown_filter_type_is_rejected() {
        let err = Filter::from_json_str(r#"{ "filterType": 7 }"#).unwrap_err();
        assert!(matches!(err, FilterError::InvalidJson(_)));
    }
}
