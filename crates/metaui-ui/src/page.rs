//! Page: the arena owning a widget tree.
//!
//! Widgets never own each other. The page stores every widget in a node
//! together with its parent and ordered children, so parent pointers and child
//! lists are always updated in one place. Nodes live as long as the page.

use crate::error::{WidgetError, WidgetResult};
use crate::event::{EventListener, WidgetEvent};
use crate::widget::Widget;
use crate::widget_id::{WidgetId, WidgetIdRegistry};
use indexmap::IndexMap;
use metaui_core::Config;
use metaui_core::profiling::profile_function;
use metaui_model::{MetaModel, MetaObject, UxonObject, Value};
use std::fmt;
use std::sync::Arc;

/// Node identifier in the page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// UXON property a child was defined under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSlot {
    pub property: &'static str,
    /// A single object rather than an array.
    pub single: bool,
}

impl ChildSlot {
    pub const WIDGETS: ChildSlot = ChildSlot::many("widgets");

    pub const fn many(property: &'static str) -> Self {
        Self {
            property,
            single: false,
        }
    }

    pub const fn one(property: &'static str) -> Self {
        Self {
            property,
            single: true,
        }
    }
}

/// A widget and its place in the tree.
pub struct WidgetNode {
    pub widget: Box<dyn Widget>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub slot: ChildSlot,
}

/// A widget tree together with the services it is bound to.
pub struct Page {
    model: Arc<dyn MetaModel>,
    config: Config,
    nodes: IndexMap<NodeId, WidgetNode>,
    root: Option<NodeId>,
    next_id: usize,
    ids: WidgetIdRegistry,
    events: Vec<WidgetEvent>,
    listeners: Vec<EventListener>,
}

impl Page {
    pub fn new(model: Arc<dyn MetaModel>, config: Config) -> Self {
        Self {
            model,
            config,
            nodes: IndexMap::new(),
            root: None,
            next_id: 0,
            ids: WidgetIdRegistry::new(),
            events: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Keep an explicit id free for a widget that is added later.
    pub fn reserve_id(&mut self, widget_id: impl Into<WidgetId>) {
        self.ids.reserve(widget_id.into());
    }

    /// Build a page from a UXON definition with the core widget types.
    pub fn from_uxon(
        model: Arc<dyn MetaModel>,
        config: Config,
        uxon: UxonObject,
    ) -> WidgetResult<Self> {
        crate::factory::WidgetFactory::default().build_page(model, config, uxon)
    }

    pub fn model(&self) -> &dyn MetaModel {
        &*self.model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Add a widget under `parent` in the default `widgets` slot. Without a
    /// parent the widget becomes the root.
    pub fn add_widget(
        &mut self,
        parent: Option<NodeId>,
        widget: Box<dyn Widget>,
    ) -> WidgetResult<NodeId> {
        self.add_widget_in(parent, ChildSlot::WIDGETS, widget)
    }

    /// Add a widget under `parent` in the given slot.
    pub fn add_widget_in(
        &mut self,
        parent: Option<NodeId>,
        slot: ChildSlot,
        mut widget: Box<dyn Widget>,
    ) -> WidgetResult<NodeId> {
        match parent {
            Some(parent_id) => {
                let parent_node = self.node(parent_id)?;
                if !parent_node.widget.accepts_children() {
                    return Err(WidgetError::ChildrenNotAccepted {
                        parent: parent_node.widget.id().to_string(),
                        child: widget.widget_type().to_string(),
                    });
                }
            }
            None if self.root.is_some() => return Err(WidgetError::RootExists),
            None => {}
        }

        let node_id = NodeId(self.next_id);
        if widget.id().is_empty() {
            let generated = self.ids.generate(widget.widget_type());
            widget.core_mut().set_id(generated);
        }
        if !self.ids.register(widget.id().clone(), node_id) {
            return Err(WidgetError::DuplicateId {
                id: widget.id().to_string(),
            });
        }
        self.next_id += 1;

        tracing::trace!(
            "Adding {} '{}' as {} under {:?}",
            widget.widget_type(),
            widget.id(),
            node_id,
            parent
        );
        self.nodes.insert(
            node_id,
            WidgetNode {
                widget,
                parent,
                children: Vec::new(),
                slot,
            },
        );
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                    parent_node.children.push(node_id);
                }
            }
            None => self.root = Some(node_id),
        }
        Ok(node_id)
    }

    /// Add a child and let the parent adopt orphans if it does so.
    pub fn add_child(&mut self, parent: NodeId, widget: Box<dyn Widget>) -> WidgetResult<NodeId> {
        let node = self.add_widget(Some(parent), widget)?;
        if self.node(parent)?.widget.adopts_orphans() {
            self.adopt_orphans(parent)?;
        }
        Ok(node)
    }

    /// Detach a subtree and drop it. Returns the number of removed widgets.
    pub fn remove_child(&mut self, node: NodeId) -> WidgetResult<usize> {
        let subtree = self.iter_subtree(node)?;
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent
            && let Some(parent_node) = self.nodes.get_mut(&parent)
        {
            parent_node.children.retain(|c| *c != node);
        }
        for id in &subtree {
            self.nodes.shift_remove(id);
            self.ids.unregister_node(*id);
        }
        if self.root == Some(node) {
            self.root = None;
        }
        tracing::debug!("Removed {} widgets starting at {}", subtree.len(), node);
        Ok(subtree.len())
    }

    /// Move a widget to another parent, at `index` or at the end.
    pub fn move_widget(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: Option<usize>,
    ) -> WidgetResult<()> {
        let same_parent = self.node(node)?.parent == Some(new_parent);
        let slot = if same_parent {
            self.node(node)?.slot
        } else {
            ChildSlot::WIDGETS
        };
        self.move_widget_in(node, new_parent, index, slot)
    }

    pub(crate) fn move_widget_in(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: Option<usize>,
        slot: ChildSlot,
    ) -> WidgetResult<()> {
        let from = self.node(node)?.parent;
        let target = self.node(new_parent)?;

        if from.is_none() {
            return Err(WidgetError::InvalidReparent {
                node,
                target: new_parent,
                reason: "the root cannot be moved",
            });
        }
        if node == new_parent || self.is_ancestor(node, new_parent) {
            return Err(WidgetError::InvalidReparent {
                node,
                target: new_parent,
                reason: "the target lies inside the moved subtree",
            });
        }
        if !target.widget.accepts_children() {
            return Err(WidgetError::ChildrenNotAccepted {
                parent: target.widget.id().to_string(),
                child: self.node(node)?.widget.id().to_string(),
            });
        }

        if let Some(old_parent) = from.and_then(|p| self.nodes.get_mut(&p)) {
            old_parent.children.retain(|c| *c != node);
        }
        if let Some(target) = self.nodes.get_mut(&new_parent) {
            let position = index
                .unwrap_or(target.children.len())
                .min(target.children.len());
            target.children.insert(position, node);
        }
        if let Some(moved) = self.nodes.get_mut(&node) {
            moved.parent = Some(new_parent);
            moved.slot = slot;
        }

        self.dispatch(WidgetEvent::Reparented {
            node,
            from,
            to: new_parent,
        });
        Ok(())
    }

    /// Change the position of a node among its siblings.
    pub(crate) fn reorder_child(&mut self, node: NodeId, index: usize) -> WidgetResult<()> {
        let parent = self.node(node)?.parent.ok_or(WidgetError::InvalidReparent {
            node,
            target: node,
            reason: "the root has no siblings",
        })?;
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|c| *c != node);
            let position = index.min(parent_node.children.len());
            parent_node.children.insert(position, node);
        }
        Ok(())
    }

    /// Move the siblings of a container-filling child into its orphan
    /// container. Returns the number of moved widgets.
    pub fn adopt_orphans(&mut self, container: NodeId) -> WidgetResult<usize> {
        let children = self.children(container)?.to_vec();
        let filler = children.iter().find_map(|c| {
            self.nodes
                .get(c)
                .and_then(|n| n.widget.as_fills_container())
                .map(|f| (*c, f.orphan_container_type()))
        });
        let Some((filler, orphan_type)) = filler else {
            return Ok(0);
        };

        let orphans: Vec<NodeId> = children
            .into_iter()
            .filter(|c| *c != filler)
            .filter(|c| {
                self.nodes
                    .get(c)
                    .is_some_and(|n| n.slot.property == ChildSlot::WIDGETS.property)
            })
            .collect();
        if orphans.is_empty() {
            return Ok(0);
        }

        let target = self
            .children(filler)?
            .iter()
            .copied()
            .find(|c| {
                self.nodes
                    .get(c)
                    .is_some_and(|n| n.widget.widget_type() == orphan_type)
            })
            .ok_or_else(|| WidgetError::MissingChild {
                widget: self.nodes.get(&filler).map_or_else(String::new, |n| n.widget.id().to_string()),
                child: orphan_type.to_string(),
            })?;

        for orphan in &orphans {
            tracing::debug!("Moving orphan {} into {} {}", orphan, orphan_type, target);
            self.move_widget_in(*orphan, target, None, ChildSlot::WIDGETS)?;
        }
        Ok(orphans.len())
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub(crate) fn node(&self, node: NodeId) -> WidgetResult<&WidgetNode> {
        self.nodes.get(&node).ok_or(WidgetError::UnknownNode(node))
    }

    /// Nodes plus the services, borrowed separately so widgets can be
    /// mutated while the model is in use.
    pub(crate) fn split_mut(
        &mut self,
    ) -> (&mut IndexMap<NodeId, WidgetNode>, &dyn MetaModel, &Config) {
        (&mut self.nodes, &*self.model, &self.config)
    }

    pub fn get(&self, node: NodeId) -> Option<&dyn Widget> {
        self.nodes.get(&node).map(|n| &*n.widget)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut dyn Widget> {
        self.nodes.get_mut(&node).map(|n| &mut *n.widget)
    }

    /// Typed access to a widget.
    pub fn widget<T: Widget>(&self, node: NodeId) -> Option<&T> {
        self.get(node).and_then(|w| w.downcast_ref::<T>())
    }

    pub fn widget_mut<T: Widget>(&mut self, node: NodeId) -> Option<&mut T> {
        self.get_mut(node).and_then(|w| w.downcast_mut::<T>())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> WidgetResult<&[NodeId]> {
        Ok(&self.node(node)?.children)
    }

    pub fn slot(&self, node: NodeId) -> Option<ChildSlot> {
        self.nodes.get(&node).map(|n| n.slot)
    }

    pub fn find_by_id(&self, widget_id: &str) -> Option<NodeId> {
        self.ids.get_node(widget_id)
    }

    pub fn widget_id(&self, node: NodeId) -> Option<&WidgetId> {
        self.ids.get_widget_id(node)
    }

    /// Depth-first pre-order listing of a subtree, `node` first.
    pub fn iter_subtree(&self, node: NodeId) -> WidgetResult<Vec<NodeId>> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let current = self.node(id)?;
            order.push(id);
            stack.extend(current.children.iter().rev().copied());
        }
        Ok(order)
    }

    /// First node of the subtree whose widget has the given type.
    pub fn find_in_subtree(&self, node: NodeId, widget_type: &str) -> WidgetResult<Option<NodeId>> {
        Ok(self.iter_subtree(node)?.into_iter().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|n| n.widget.widget_type().eq_ignore_ascii_case(widget_type))
        }))
    }

    pub fn widget_count(&self) -> usize {
        self.nodes.len()
    }

    /// Alias of the meta-object a widget is bound to, inherited from the
    /// nearest ancestor that sets one.
    pub fn meta_object_alias(&self, node: NodeId) -> Option<&str> {
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.nodes.get(&id)?;
            if let Some(alias) = n.widget.core().object_alias.as_deref() {
                return Some(alias);
            }
            current = n.parent;
        }
        None
    }

    pub fn meta_object(&self, node: NodeId) -> WidgetResult<Option<Arc<MetaObject>>> {
        match self.meta_object_alias(node) {
            Some(alias) => Ok(Some(self.model.object(alias)?)),
            None => Ok(None),
        }
    }

    /// Caption to show: the configured one, else the name of the bound attribute.
    pub fn caption(&self, node: NodeId) -> Option<String> {
        let widget = self.get(node)?;
        if let Some(caption) = &widget.core().caption {
            return Some(caption.clone());
        }
        if !self.config.auto_caption {
            return None;
        }
        let path = widget.as_value()?.binding().expression()?.as_attribute()?;
        let object = self.meta_object_alias(node)?;
        self.model
            .resolve_attribute(object, path)
            .ok()
            .map(|resolved| resolved.attribute.name)
    }

    /// Export a subtree as UXON: common properties, type-specific properties
    /// and children grouped by the property they were defined under.
    pub fn export_uxon(&self, node: NodeId) -> WidgetResult<UxonObject> {
        profile_function!();
        let current = self.node(node)?;
        let widget = &current.widget;

        let mut uxon = UxonObject::new();
        uxon.insert("widget_type", widget.widget_type());
        uxon.merge(UxonObject::from_serializable(&widget.core().to_common())?);
        uxon.merge(widget.export_config()?);

        let mut slots: IndexMap<&'static str, (bool, Vec<Value>)> = IndexMap::new();
        for child in &current.children {
            let slot = self.node(*child)?.slot;
            let exported = self.export_uxon(*child)?.into_value();
            slots
                .entry(slot.property)
                .or_insert_with(|| (slot.single, Vec::new()))
                .1
                .push(exported);
        }
        for (property, (single, mut values)) in slots {
            if single && values.len() == 1 {
                uxon.insert(property, values.remove(0));
            } else {
                uxon.insert(property, Value::Array(values));
            }
        }
        Ok(uxon)
    }

    /// Register a listener called for every event from now on.
    pub fn on_event(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn dispatch(&mut self, event: WidgetEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[WidgetEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.events)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("root", &self.root)
            .field("widgets", &self.nodes.len())
            .field("events", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Container, Display};
    use metaui_test_utils::shared_shop_model;

    fn page() -> Page {
        Page::new(shared_shop_model(), Config::default())
    }

    #[test]
    fn test_add_widgets_keeps_links_consistent() {
        let mut page = page();
        let root = page.add_widget(None, Box::new(Container::new("Panel"))).unwrap();
        let a = page.add_widget(Some(root), Box::new(Display::bound("NUMBER"))).unwrap();
        let b = page.add_widget(Some(root), Box::new(Display::bound("DATE"))).unwrap();

        assert_eq!(page.root(), Some(root));
        assert_eq!(page.children(root).unwrap(), &[a, b]);
        assert_eq!(page.parent(a), Some(root));
        assert_eq!(page.widget_id(a).map(WidgetId::as_str), Some("display_1"));
        assert!(matches!(
            page.add_widget(None, Box::new(Container::new("Panel"))),
            Err(WidgetError::RootExists)
        ));
        assert!(matches!(
            page.add_widget(Some(a), Box::new(Display::bound("DATE"))),
            Err(WidgetError::ChildrenNotAccepted { .. })
        ));
    }

    #[test]
    fn test_move_rejects_cycles_and_root() {
        let mut page = page();
        let root = page.add_widget(None, Box::new(Container::new("Panel"))).unwrap();
        let outer = page.add_widget(Some(root), Box::new(Container::new("Panel"))).unwrap();
        let inner = page.add_widget(Some(outer), Box::new(Container::new("Panel"))).unwrap();

        assert!(matches!(
            page.move_widget(outer, inner, None),
            Err(WidgetError::InvalidReparent { .. })
        ));
        assert!(matches!(
            page.move_widget(root, inner, None),
            Err(WidgetError::InvalidReparent { .. })
        ));

        page.move_widget(inner, root, Some(0)).unwrap();
        assert_eq!(page.children(root).unwrap(), &[inner, outer]);
        assert!(page.children(outer).unwrap().is_empty());
        assert_eq!(
            page.events(),
            &[WidgetEvent::Reparented {
                node: inner,
                from: Some(outer),
                to: root
            }]
        );
    }

    #[test]
    fn test_remove_child_drops_subtree() {
        let mut page = page();
        let root = page.add_widget(None, Box::new(Container::new("Panel"))).unwrap();
        let group = page.add_widget(Some(root), Box::new(Container::new("WidgetGroup"))).unwrap();
        page.add_widget(Some(group), Box::new(Display::bound("NUMBER"))).unwrap();
        page.add_widget(Some(group), Box::new(Display::bound("DATE"))).unwrap();

        assert_eq!(page.remove_child(group).unwrap(), 3);
        assert_eq!(page.widget_count(), 1);
        assert!(page.children(root).unwrap().is_empty());
        assert!(page.find_by_id("display_1").is_none());
    }

    #[test]
    fn test_meta_object_is_inherited() {
        let mut page = page();
        let mut panel = Container::new("Panel");
        panel.core_mut().object_alias = Some("shop.ORDER".into());
        let root = page.add_widget(None, Box::new(panel)).unwrap();
        let child = page.add_widget(Some(root), Box::new(Display::bound("NUMBER"))).unwrap();

        assert_eq!(page.meta_object_alias(child), Some("shop.ORDER"));
        assert_eq!(page.caption(child).as_deref(), Some("Number"));
    }
}
