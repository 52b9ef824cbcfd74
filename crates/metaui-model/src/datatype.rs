//! Data types of meta attributes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Horizontal alignment hint derived from a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    /// Let the data type decide.
    Default,
}

/// Data type of an attribute value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataType {
    #[default]
    String,
    /// Long, possibly multi-line text.
    Text,
    Number {
        #[serde(default)]
        precision: Option<u32>,
    },
    Integer,
    Boolean,
    Date,
    DateTime,
    /// CSS-like color string.
    Color,
    Url,
    Image,
    Json,
    /// Fixed set of keys with display labels.
    Enum { values: IndexMap<String, String> },
}

impl DataType {
    /// Alignment used when a widget does not configure one.
    pub fn default_align(&self) -> Align {
        match self {
            DataType::Number { .. } | DataType::Integer => Align::Right,
            DataType::Boolean | DataType::Color => Align::Center,
            _ => Align::Left,
        }
    }

    /// Widget type used to display values of this type.
    pub fn default_display_widget(&self) -> &'static str {
        match self {
            DataType::Text => "Text",
            DataType::Image => "Image",
            DataType::Color => "ColorIndicator",
            _ => "Display",
        }
    }

    /// Widget type used to edit values of this type.
    pub fn default_editor_widget(&self) -> &'static str {
        match self {
            DataType::Number { .. } | DataType::Integer => "InputNumber",
            DataType::Boolean => "InputCheckBox",
            DataType::Date | DataType::DateTime => "InputDate",
            DataType::Enum { .. } => "InputSelect",
            DataType::Text | DataType::Json => "InputText",
            _ => "Input",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Number { .. } | DataType::Integer)
    }

    /// Check whether a value is acceptable for this type.
    ///
    /// `null` is always valid; numeric strings are valid numbers.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            DataType::Number { .. } => as_f64(value).is_some(),
            DataType::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            DataType::Boolean => matches!(value, Value::Bool(_))
                || matches!(value.as_str(), Some("0" | "1" | "true" | "false")),
            DataType::Enum { values } => value_to_string(value)
                .map(|key| values.contains_key(&key))
                .unwrap_or(false),
            DataType::Json => true,
            _ => !value.is_object() && !value.is_array(),
        }
    }

    /// Human readable representation of a value.
    pub fn format_value(&self, value: &Value) -> String {
        match (self, value) {
            (_, Value::Null) => String::new(),
            (DataType::Number { precision: Some(p) }, v) => match as_f64(v) {
                Some(n) => format!("{:.*}", *p as usize, n),
                None => value_to_string(v).unwrap_or_default(),
            },
            (DataType::Enum { values }, v) => {
                let key = value_to_string(v).unwrap_or_default();
                values.get(&key).cloned().unwrap_or(key)
            }
            (DataType::Boolean, v) => match v {
                Value::Bool(true) => "Yes".to_string(),
                Value::Bool(false) => "No".to_string(),
                other => value_to_string(other).unwrap_or_default(),
            },
            (_, v) => value_to_string(v).unwrap_or_default(),
        }
    }
}

/// Scalar value as string; `None` for objects and arrays.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric interpretation of a value, accepting numeric strings.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_align() {
        assert_eq!(DataType::Integer.default_align(), Align::Right);
        assert_eq!(DataType::Number { precision: Some(2) }.default_align(), Align::Right);
        assert_eq!(DataType::Boolean.default_align(), Align::Center);
        assert_eq!(DataType::String.default_align(), Align::Left);
    }

    #[test]
    fn test_accepts() {
        assert!(DataType::Integer.accepts(&json!(4)));
        assert!(DataType::Integer.accepts(&json!("42")));
        assert!(!DataType::Integer.accepts(&json!("4.5")));
        assert!(DataType::Number { precision: None }.accepts(&json!("4.5")));
        assert!(!DataType::String.accepts(&json!({"a": 1})));
        assert!(DataType::String.accepts(&Value::Null));

        let status = DataType::Enum {
            values: IndexMap::from([("10".to_string(), "Open".to_string())]),
        };
        assert!(status.accepts(&json!(10)));
        assert!(!status.accepts(&json!(20)));
    }

    #[test]
    fn test_format_value() {
        let price = DataType::Number { precision: Some(2) };
        assert_eq!(price.format_value(&json!(3)), "3.00");
        assert_eq!(DataType::Boolean.format_value(&json!(true)), "Yes");
        assert_eq!(DataType::String.format_value(&Value::Null), "");
    }

    #[test]
    fn test_deserialize_tagged() {
        let dt: DataType = serde_json::from_str(r#"{"type": "number", "precision": 2}"#).unwrap();
        assert_eq!(dt, DataType::Number { precision: Some(2) });
        let dt: DataType = serde_json::from_str(r#"{"type": "date_time"}"#).unwrap();
        assert_eq!(dt, DataType::DateTime);
    }
}
