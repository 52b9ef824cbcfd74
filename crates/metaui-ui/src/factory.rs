//! Building widget trees from UXON.
//!
//! The explicit ids of a definition are reserved first. Then for every
//! definition the factory:
//! 1. looks up `widget_type` in the registry
//! 2. splits off the common properties and removes the child slots
//! 3. lets the type's constructor import the rest (unknown properties fail)
//! 4. adds the widget to the page and builds its children in slot order
//! 5. runs the type's finish hook and, for widgets that adopt orphans,
//!    moves the siblings of a container-filling child into it
//!
//! Any error fails the whole build.

use crate::context::{ContextProvider, NavigationSource};
use crate::error::{WidgetError, WidgetResult};
use crate::page::{ChildSlot, NodeId, Page};
use crate::registry::WidgetTypeRegistry;
use crate::widget::CommonConfig;
use metaui_core::Config;
use metaui_core::profiling::profile_function;
use metaui_model::{MetaModel, UxonObject, Value};
use std::sync::Arc;

pub struct WidgetFactory {
    registry: WidgetTypeRegistry,
    navigation: Option<Arc<dyn NavigationSource>>,
    contexts: Vec<Arc<dyn ContextProvider>>,
}

impl WidgetFactory {
    pub fn new(registry: WidgetTypeRegistry) -> Self {
        Self {
            registry,
            navigation: None,
            contexts: Vec::new(),
        }
    }

    pub fn with_navigation(mut self, navigation: Arc<dyn NavigationSource>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.contexts.push(provider);
        self
    }

    pub fn registry(&self) -> &WidgetTypeRegistry {
        &self.registry
    }

    pub fn navigation(&self) -> Option<&dyn NavigationSource> {
        self.navigation.as_deref()
    }

    pub fn context_providers(&self) -> &[Arc<dyn ContextProvider>] {
        &self.contexts
    }

    /// Build a page whose root is defined by `uxon`.
    pub fn build_page(
        &self,
        model: Arc<dyn MetaModel>,
        config: Config,
        uxon: UxonObject,
    ) -> WidgetResult<Page> {
        profile_function!();
        let mut page = Page::new(model, config);
        let root = self.build(&mut page, None, ChildSlot::WIDGETS, uxon)?;
        tracing::debug!(
            "Built page with {} widgets, root {}",
            page.widget_count(),
            root
        );
        Ok(page)
    }

    /// Build a widget and its children under `parent`.
    pub fn build(
        &self,
        page: &mut Page,
        parent: Option<NodeId>,
        slot: ChildSlot,
        uxon: UxonObject,
    ) -> WidgetResult<NodeId> {
        let mut ids = Vec::new();
        if uxon.widget_type().is_some()
            && let Some(id) = uxon.get_str("id")
        {
            ids.push(id);
        }
        for property in uxon.property_names() {
            if let Some(value) = uxon.get(property) {
                collect_widget_ids(value, &mut ids);
            }
        }
        let ids: Vec<String> = ids.into_iter().map(str::to_string).collect();
        for id in ids {
            page.reserve_id(id);
        }
        self.build_node(page, parent, slot, uxon)
    }

    fn build_node(
        &self,
        page: &mut Page,
        parent: Option<NodeId>,
        slot: ChildSlot,
        mut uxon: UxonObject,
    ) -> WidgetResult<NodeId> {
        let widget_type = uxon
            .remove("widget_type")
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or(WidgetError::MissingWidgetType)?;
        let descriptor = self
            .registry
            .get(&widget_type)
            .ok_or_else(|| WidgetError::UnknownWidgetType {
                widget_type: widget_type.clone(),
            })?;

        let common: CommonConfig = uxon
            .split_off(CommonConfig::PROPERTIES)
            .deserialize_into()
            .map_err(|e| WidgetError::from_uxon(descriptor.name, e))?;

        let mut children = Vec::new();
        for child_slot in descriptor.slots {
            let taken = match child_slot.single {
                true => uxon
                    .take_object(child_slot.property)
                    .map(|o| o.into_iter().collect::<Vec<_>>()),
                false => uxon.take_array(child_slot.property),
            };
            let items = taken.map_err(|e| WidgetError::from_uxon(descriptor.name, e))?;
            children.extend(items.into_iter().map(|item| (*child_slot, item)));
        }

        let widget = (descriptor.build)(descriptor.name, common, uxon)?;
        let node = page.add_widget_in(parent, slot, widget)?;

        for (child_slot, item) in children {
            self.build_node(page, Some(node), child_slot, item)?;
        }
        if let Some(finish) = descriptor.finish {
            finish(self, page, node)?;
        }
        if page.node(node)?.widget.adopts_orphans() {
            page.adopt_orphans(node)?;
        }
        Ok(node)
    }

    /// Build a widget from a JSON definition.
    pub fn build_json(
        &self,
        page: &mut Page,
        parent: Option<NodeId>,
        slot: ChildSlot,
        json: &str,
    ) -> WidgetResult<NodeId> {
        self.build(page, parent, slot, UxonObject::from_json(json)?)
    }
}

/// Ids of the widget definitions nested in `value`.
fn collect_widget_ids<'a>(value: &'a Value, ids: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if map.contains_key("widget_type")
                && let Some(Value::String(id)) = map.get("id")
            {
                ids.push(id);
            }
            for nested in map.values() {
                collect_widget_ids(nested, ids);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_widget_ids(item, ids);
            }
        }
        _ => {}
    }
}

impl Default for WidgetFactory {
    fn default() -> Self {
        Self::new(WidgetTypeRegistry::with_core_widgets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaui_test_utils::shared_shop_model;

    fn build(json: &str) -> WidgetResult<Page> {
        WidgetFactory::default().build_page(
            shared_shop_model(),
            Config::default(),
            UxonObject::from_json(json).unwrap(),
        )
    }

    #[test]
    fn test_build_nested_definition() {
        let page = build(
            r#"{
                "widget_type": "panel",
                "object_alias": "shop.ORDER",
                "widgets": [
                    {"widget_type": "Input", "attribute_alias": "NUMBER", "id": "number"},
                    {"widget_type": "Display", "attribute_alias": "CUSTOMER__NAME"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(page.widget_count(), 3);
        let root = page.root().unwrap();
        assert_eq!(page.get(root).unwrap().widget_type(), "Panel");
        assert_eq!(page.parent(page.find_by_id("number").unwrap()), Some(root));
    }

    #[test]
    fn test_errors_fail_the_build() {
        assert!(matches!(
            build(r#"{"widget_type": "Carousel"}"#),
            Err(WidgetError::UnknownWidgetType { .. })
        ));
        assert!(matches!(build(r#"{"caption": "x"}"#), Err(WidgetError::MissingWidgetType)));
        match build(r#"{"widget_type": "Panel", "widgets": [{"widget_type": "Input", "colour": "red"}]}"#) {
            Err(WidgetError::InvalidProperty {
                widget_type,
                property,
                ..
            }) => {
                assert_eq!(widget_type, "Input");
                assert_eq!(property, "colour");
            }
            other => panic!("unexpected {:?}", other.map(|p| p.widget_count())),
        }
        assert!(matches!(
            build(r#"{"widget_type": "Panel", "widgets": [{"widget_type": "Input", "id": "a"}, {"widget_type": "Input", "id": "a"}]}"#),
            Err(WidgetError::DuplicateId { .. })
        ));
    }
}
