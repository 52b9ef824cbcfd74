//! UXON - the JSON-based configuration objects widgets are defined with.
//!
//! A [`UxonObject`] is an ordered JSON object. Property order is preserved so
//! exported definitions read like the ones that were imported.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Errors raised while reading UXON.
#[derive(Debug)]
pub enum UxonError {
    /// The text is not valid JSON.
    Parse {
        /// Description from the JSON parser.
        message: String,
    },

    /// A JSON object was expected.
    NotAnObject {
        /// What was found instead.
        found: &'static str,
        /// Property holding the value, if any.
        property: Option<String>,
    },

    /// A required property is missing.
    MissingProperty {
        property: String,
    },

    /// A property has a value of the wrong type or an unknown property was given.
    InvalidProperty {
        property: String,
        message: String,
    },
}

impl fmt::Display for UxonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UxonError::Parse { message } => write!(f, "Invalid UXON: {}", message),
            UxonError::NotAnObject { found, property } => match property {
                Some(p) => write!(f, "UXON property '{}' must be an object, found {}", p, found),
                None => write!(f, "UXON must be an object, found {}", found),
            },
            UxonError::MissingProperty { property } => {
                write!(f, "Missing UXON property '{}'", property)
            }
            UxonError::InvalidProperty { property, message } => {
                write!(f, "Invalid UXON property '{}': {}", property, message)
            }
        }
    }
}

impl std::error::Error for UxonError {}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered key-value configuration tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UxonObject(Map<String, Value>);

impl UxonObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, UxonError> {
        let value: Value = serde_json::from_str(json).map_err(|e| UxonError::Parse {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, UxonError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(UxonError::NotAnObject {
                found: kind_of(&other),
                property: None,
            }),
        }
    }

    /// Serialize a typed configuration into UXON.
    pub fn from_serializable<T: Serialize>(config: &T) -> Result<Self, UxonError> {
        let value = serde_json::to_value(config).map_err(|e| UxonError::Parse {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Deserialize into a typed configuration.
    ///
    /// Errors name the offending property when serde reports one.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, UxonError> {
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| {
            let message = e.to_string();
            let property = property_from_message(&message).unwrap_or_else(|| "<root>".to_string());
            UxonError::InvalidProperty { property, message }
        })
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.0.get(property)
    }

    pub fn get_str(&self, property: &str) -> Option<&str> {
        self.0.get(property).and_then(Value::as_str)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(property.into(), value.into());
        self
    }

    pub fn remove(&mut self, property: &str) -> Option<Value> {
        self.0.shift_remove(property)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `widget_type` discriminator.
    pub fn widget_type(&self) -> Option<&str> {
        self.get_str("widget_type")
    }

    /// Remove the given properties and return them as a new object, in the
    /// order they appear in this one.
    pub fn split_off(&mut self, properties: &[&str]) -> UxonObject {
        let keys: Vec<String> = self
            .0
            .keys()
            .filter(|k| properties.contains(&k.as_str()))
            .cloned()
            .collect();
        let mut out = Map::new();
        for key in keys {
            if let Some(v) = self.0.shift_remove(&key) {
                out.insert(key, v);
            }
        }
        UxonObject(out)
    }

    /// Remove an array of objects (e.g. child widgets). Missing is empty.
    pub fn take_array(&mut self, property: &str) -> Result<Vec<UxonObject>, UxonError> {
        match self.0.shift_remove(property) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(UxonObject(map)),
                    other => Err(UxonError::NotAnObject {
                        found: kind_of(&other),
                        property: Some(property.to_string()),
                    }),
                })
                .collect(),
            Some(other) => Err(UxonError::InvalidProperty {
                property: property.to_string(),
                message: format!("expected an array, found {}", kind_of(&other)),
            }),
        }
    }

    /// Remove a nested object.
    pub fn take_object(&mut self, property: &str) -> Result<Option<UxonObject>, UxonError> {
        match self.0.shift_remove(property) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(UxonObject(map))),
            Some(other) => Err(UxonError::NotAnObject {
                found: kind_of(&other),
                property: Some(property.to_string()),
            }),
        }
    }

    /// Copy properties of `other` over this object.
    pub fn merge(&mut self, other: UxonObject) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for UxonObject {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// serde reports unknown/missing fields as "unknown field `x`" / "missing field `x`".
fn property_from_message(message: &str) -> Option<String> {
    let start = message.find('`')? + 1;
    let end = message[start..].find('`')? + start;
    Some(message[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        #[allow(dead_code)]
        caption: String,
    }

    #[test]
    fn test_order_preserved() {
        let uxon = UxonObject::from_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let names: Vec<&str> = uxon.property_names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(uxon.to_json(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            UxonObject::from_json("[1, 2]"),
            Err(UxonError::NotAnObject { found: "array", .. })
        ));
        assert!(matches!(UxonObject::from_json("{"), Err(UxonError::Parse { .. })));
    }

    #[test]
    fn test_split_off_and_take_array() {
        let mut uxon = UxonObject::from_json(
            r#"{"widget_type": "Form", "caption": "Edit", "widgets": [{"widget_type": "Input"}]}"#,
        )
        .unwrap();
        let common = uxon.split_off(&["caption", "id"]);
        assert_eq!(common.get_str("caption"), Some("Edit"));
        assert!(!uxon.contains("caption"));

        let children = uxon.take_array("widgets").unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].widget_type(), Some("Input"));
        assert!(uxon.take_array("widgets").unwrap().is_empty());

        let mut bad = UxonObject::new();
        bad.insert("widgets", json!([1]));
        assert!(bad.take_array("widgets").is_err());
    }

    #[test]
    fn test_deserialize_reports_property() {
        let uxon = UxonObject::from_json(r#"{"caption": "x", "colour": "red"}"#).unwrap();
        match uxon.deserialize_into::<Sample>() {
            Err(UxonError::InvalidProperty { property, .. }) => assert_eq!(property, "colour"),
            other => panic!("unexpected {:?}", other),
        }
        let missing = UxonObject::new().deserialize_into::<Sample>();
        assert!(matches!(missing, Err(UxonError::InvalidProperty { property, .. }) if property == "caption"));
    }
}
