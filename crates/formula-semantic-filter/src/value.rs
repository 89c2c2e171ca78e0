use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A scalar value as it appears in host filters and category columns.
///
/// Equality is strict: values of different variants never compare equal and
/// `Number(NaN)` is not equal to itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveValue {
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Text(s) => f.write_str(s),
            PrimitiveValue::Number(n) => write!(f, "{n}"),
            PrimitiveValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for PrimitiveValue {
    fn from(value: f64) -> Self {
        PrimitiveValue::Number(value)
    }
}

impl From<i32> for PrimitiveValue {
    fn from(value: i32) -> Self {
        PrimitiveValue::Number(f64::from(value))
    }
}

impl From<bool> for PrimitiveValue {
    fn from(value: bool) -> Self {
        PrimitiveValue::Boolean(value)
    }
}

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::Text(value)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Text(value.to_string())
    }
}

/// The `value` slot of an expression node or an advanced filter condition.
///
/// The host distinguishes a missing value from an explicit `null`: `null` is
/// how a blank is stored, so it must survive translation.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Literal {
    #[default]
    Undefined,
    Null,
    Value(PrimitiveValue),
}

impl Literal {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Literal::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub fn as_value(&self) -> Option<&PrimitiveValue> {
        match self {
            Literal::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<PrimitiveValue> for Literal {
    fn from(value: PrimitiveValue) -> Self {
        Literal::Value(value)
    }
}

impl From<Option<PrimitiveValue>> for Literal {
    fn from(value: Option<PrimitiveValue>) -> Self {
        value.map_or(Literal::Null, Literal::Value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Value(PrimitiveValue::Number(value))
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Value(PrimitiveValue::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Value(PrimitiveValue::Boolean(value))
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Callers skip undefined fields; a bare undefined degrades to null.
            Literal::Undefined | Literal::Null => serializer.serialize_none(),
            Literal::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Literal {
    /// Only reached when the field is present, so the absent case is covered by
    /// `#[serde(default)]` on the containing field.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<PrimitiveValue>::deserialize(deserializer).map(Literal::from)
    }
}

/// One entry of a basic filter's `values` list.
///
/// Single-column filters carry scalars; filters restored from a multi-column
/// membership expression carry one tuple per row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(PrimitiveValue),
    Tuple(Vec<Option<PrimitiveValue>>),
}

impl FilterValue {
    pub fn tuple<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PrimitiveValue>,
    {
        FilterValue::Tuple(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Returns the scalar carried by this entry. One-element tuples unwrap to
    /// their only member.
    pub fn as_scalar(&self) -> Option<&PrimitiveValue> {
        match self {
            FilterValue::Scalar(v) => Some(v),
            FilterValue::Tuple(values) if values.len() == 1 => values[0].as_ref(),
            FilterValue::Tuple(_) => None,
        }
    }
}

impl From<PrimitiveValue> for FilterValue {
    fn from(value: PrimitiveValue) -> Self {
        FilterValue::Scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Deserialize, Serialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "Literal::is_undefined")]
        value: Literal,
    }

    #[test]
    fn literal_keeps_null_apart_from_missing() {
        let missing: Holder = serde_json::from_str("{}").unwrap();
        let null: Holder = serde_json::from_str(r#"{"value": null}"#).unwrap();
        let number: Holder = serde_json::from_str(r#"{"value": 5}"#).unwrap();

        assert_eq!(missing.value, Literal::Undefined);
        assert_eq!(null.value, Literal::Null);
        assert_eq!(number.value, Literal::from(5.0));

        assert_eq!(serde_json::to_string(&missing).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&null).unwrap(), r#"{"value":null}"#);
    }

    #[test]
    fn filter_values_accept_scalars_and_tuples() {
        let values: Vec<FilterValue> = serde_json::from_str(r#"["East", [1000], true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FilterValue::Scalar(PrimitiveValue::from("East")),
                FilterValue::tuple([1000.0]),
                FilterValue::Scalar(PrimitiveValue::Boolean(true)),
            ]
        );
        assert_eq!(values[1].as_scalar(), Some(&PrimitiveValue::Number(1000.0)));
    }
}
