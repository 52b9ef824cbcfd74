//! Widget ids and their mapping to page nodes.
//!
//! Ids come from the `id` property of a widget definition. Widgets without one
//! get a generated id `<type>_<n>` that is unique within the page. Explicit
//! ids of a definition are reserved before its widgets are built, so a
//! generated id never takes an id defined further down.

use crate::page::NodeId;
use metaui_core::alloc::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A page-unique, human readable widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WidgetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for WidgetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Bidirectional widget id <-> node id mapping.
#[derive(Debug, Default)]
pub struct WidgetIdRegistry {
    id_to_node: HashMap<WidgetId, NodeId>,
    node_to_id: HashMap<NodeId, WidgetId>,
    counters: HashMap<String, usize>,
    reserved: HashSet<WidgetId>,
}

impl WidgetIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping. Returns `false` if the id is already taken.
    pub fn register(&mut self, widget_id: WidgetId, node_id: NodeId) -> bool {
        if self.id_to_node.contains_key(&widget_id) {
            return false;
        }
        self.reserved.remove(&widget_id);
        self.id_to_node.insert(widget_id.clone(), node_id);
        self.node_to_id.insert(node_id, widget_id);
        true
    }

    /// Keep `widget_id` out of generated ids until it is registered.
    pub fn reserve(&mut self, widget_id: WidgetId) {
        if !self.id_to_node.contains_key(&widget_id) {
            self.reserved.insert(widget_id);
        }
    }

    /// Next free generated id for a widget type.
    pub fn generate(&mut self, widget_type: &str) -> WidgetId {
        let prefix = widget_type.to_ascii_lowercase();
        let counter = self.counters.entry(prefix.clone()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = WidgetId(format!("{}_{}", prefix, counter));
            if !self.id_to_node.contains_key(&candidate) && !self.reserved.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn get_node(&self, widget_id: &str) -> Option<NodeId> {
        self.id_to_node.get(&WidgetId::from(widget_id)).copied()
    }

    pub fn get_widget_id(&self, node_id: NodeId) -> Option<&WidgetId> {
        self.node_to_id.get(&node_id)
    }

    pub fn contains(&self, widget_id: &str) -> bool {
        self.id_to_node.contains_key(&WidgetId::from(widget_id))
    }

    /// Forget the mapping of a removed node.
    pub fn unregister_node(&mut self, node_id: NodeId) {
        if let Some(widget_id) = self.node_to_id.remove(&node_id) {
            self.id_to_node.remove(&widget_id);
        }
    }

    pub fn len(&self) -> usize {
        self.id_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_node.is_empty()
    }
}
