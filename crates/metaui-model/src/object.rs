//! Meta-objects, their attributes and relations.

use crate::aggregator::Aggregator;
use crate::datatype::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of a relation as seen from the object declaring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// N:1 - every row of this object points to at most one related row.
    Forward,
    /// 1:N - a row of this object has any number of related rows.
    Reverse,
}

/// A relation from one meta-object to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaRelation {
    pub alias: String,
    /// Alias of the object on the other end.
    pub right_object: String,
    pub kind: RelationKind,
    /// Attribute of this object holding the key.
    pub left_key: String,
    /// Attribute of the related object the key points to.
    pub right_key: String,
}

impl MetaRelation {
    pub fn is_reverse(&self) -> bool {
        self.kind == RelationKind::Reverse
    }
}

/// An attribute of a meta-object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaAttribute {
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Aggregator applied when the attribute is read over a reverse relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_aggregator: Option<Aggregator>,
    /// Position in generated default editors; attributes without one are left out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_display_order: Option<i32>,
}

fn default_true() -> bool {
    true
}

impl MetaAttribute {
    pub fn new(alias: impl Into<String>, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
            data_type,
            editable: true,
            required: false,
            hidden: false,
            default_value: None,
            default_aggregator: None,
            default_display_order: None,
        }
    }
}

/// A business object of the meta-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaObject {
    /// Fully qualified alias, e.g. `shop.ORDER`.
    alias: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uid_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label_attribute: Option<String>,
    #[serde(default, with = "keyed_list")]
    attributes: IndexMap<String, MetaAttribute>,
    #[serde(default, with = "keyed_relations")]
    relations: IndexMap<String, MetaRelation>,
}

impl MetaObject {
    pub fn new(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
            uid_attribute: None,
            label_attribute: None,
            attributes: IndexMap::new(),
            relations: IndexMap::new(),
        }
    }

    /// Set the UID attribute.
    pub fn with_uid(mut self, alias: impl Into<String>) -> Self {
        self.uid_attribute = Some(alias.into());
        self
    }

    /// Set the label attribute.
    pub fn with_label(mut self, alias: impl Into<String>) -> Self {
        self.label_attribute = Some(alias.into());
        self
    }

    /// Add an attribute, replacing one with the same alias.
    pub fn with_attribute(mut self, attribute: MetaAttribute) -> Self {
        self.attributes.insert(attribute.alias.clone(), attribute);
        self
    }

    /// Add a relation, replacing one with the same alias.
    pub fn with_relation(mut self, relation: MetaRelation) -> Self {
        self.relations.insert(relation.alias.clone(), relation);
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uid_attribute(&self) -> Option<&str> {
        self.uid_attribute.as_deref()
    }

    pub fn label_attribute(&self) -> Option<&str> {
        self.label_attribute.as_deref()
    }

    /// Direct attribute of this object (no relation path).
    pub fn attribute(&self, alias: &str) -> Option<&MetaAttribute> {
        self.attributes.get(alias)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &MetaAttribute> {
        self.attributes.values()
    }

    pub fn relation(&self, alias: &str) -> Option<&MetaRelation> {
        self.relations.get(alias)
    }

    pub fn relations(&self) -> impl Iterator<Item = &MetaRelation> {
        self.relations.values()
    }

    /// Check if this object is the given one.
    pub fn is(&self, alias: &str) -> bool {
        self.alias == alias
    }

    /// Editable attributes with a display order, sorted by it.
    pub fn default_editor_attributes(&self) -> Vec<&MetaAttribute> {
        let mut attrs: Vec<&MetaAttribute> = self
            .attributes
            .values()
            .filter(|a| a.editable && !a.hidden && a.default_display_order.is_some())
            .collect();
        attrs.sort_by_key(|a| a.default_display_order);
        attrs
    }
}

/// Serialize keyed maps as plain lists so model files read naturally.
mod keyed_list {
    use super::MetaAttribute;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &IndexMap<String, MetaAttribute>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, MetaAttribute>, D::Error> {
        let list = Vec::<MetaAttribute>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|a| (a.alias.clone(), a)).collect())
    }
}

mod keyed_relations {
    use super::MetaRelation;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &IndexMap<String, MetaRelation>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, MetaRelation>, D::Error> {
        let list = Vec::<MetaRelation>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|r| (r.alias.clone(), r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_editor_attributes_sorted() {
        let mut name = MetaAttribute::new("NAME", "Name", DataType::String);
        name.default_display_order = Some(2);
        let mut city = MetaAttribute::new("CITY", "City", DataType::String);
        city.default_display_order = Some(1);
        let mut uid = MetaAttribute::new("UID", "Id", DataType::Integer);
        uid.editable = false;
        uid.default_display_order = Some(0);

        let object = MetaObject::new("shop.CUSTOMER", "Customer")
            .with_attribute(uid)
            .with_attribute(name)
            .with_attribute(city)
            .with_attribute(MetaAttribute::new("NOTE", "Note", DataType::Text));

        let aliases: Vec<&str> = object
            .default_editor_attributes()
            .iter()
            .map(|a| a.alias.as_str())
            .collect();
        assert_eq!(aliases, vec!["CITY", "NAME"]);
    }

    #[test]
    fn test_deserialize_lists_into_keyed_maps() {
        let object: MetaObject = serde_json::from_str(
            r#"{
                "alias": "shop.ORDER",
                "name": "Order",
                "attributes": [{ "alias": "UID", "name": "Id", "data_type": { "type": "integer" } }],
                "relations": [{
                    "alias": "CUSTOMER", "right_object": "shop.CUSTOMER",
                    "kind": "forward", "left_key": "CUSTOMER", "right_key": "UID"
                }]
            }"#,
        )
        .unwrap();
        assert!(object.attribute("UID").is_some());
        assert!(object.attribute("UID").unwrap().editable);
        assert!(!object.relation("CUSTOMER").unwrap().is_reverse());
    }
}
