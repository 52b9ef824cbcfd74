//! Widget type registry used by the factory.
//!
//! Each widget type name maps to a descriptor with its constructor, the UXON
//! properties holding its children and an optional hook run once the
//! children are built. Lookup is case-insensitive.

use crate::error::WidgetResult;
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Widget};
use indexmap::IndexMap;
use metaui_model::UxonObject;

/// Broad grouping of widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetFamily {
    Value,
    Container,
    Data,
    Action,
    Composite,
}

/// Build a widget from its common properties and the remaining type-specific UXON.
pub type BuildFn = fn(&'static str, CommonConfig, UxonObject) -> WidgetResult<Box<dyn Widget>>;

/// Called after a widget and its children were added to the page.
pub type FinishFn = fn(&WidgetFactory, &mut Page, NodeId) -> WidgetResult<()>;

pub struct WidgetTypeDescriptor {
    /// Canonical type name, as exported.
    pub name: &'static str,
    pub family: WidgetFamily,
    pub build: BuildFn,
    /// Properties holding child widget definitions.
    pub slots: &'static [ChildSlot],
    pub finish: Option<FinishFn>,
}

impl WidgetTypeDescriptor {
    pub fn new(name: &'static str, family: WidgetFamily, build: BuildFn) -> Self {
        Self {
            name,
            family,
            build,
            slots: &[],
            finish: None,
        }
    }

    pub fn with_slots(mut self, slots: &'static [ChildSlot]) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_finish(mut self, f: FinishFn) -> Self {
        self.finish = Some(f);
        self
    }
}

/// Registry mapping widget type names to descriptors.
pub struct WidgetTypeRegistry {
    descriptors: IndexMap<String, WidgetTypeDescriptor>,
}

impl WidgetTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    /// Registry with every widget type of this crate.
    pub fn with_core_widgets() -> Self {
        let mut registry = Self::new();
        crate::widgets::register_core_widgets(&mut registry);
        registry
    }

    /// Register a descriptor, replacing one with the same name.
    pub fn register(&mut self, descriptor: WidgetTypeDescriptor) {
        tracing::trace!("Registering widget type {}", descriptor.name);
        self.descriptors
            .insert(descriptor.name.to_ascii_lowercase(), descriptor);
    }

    pub fn get(&self, widget_type: &str) -> Option<&WidgetTypeDescriptor> {
        self.descriptors.get(&widget_type.to_ascii_lowercase())
    }

    pub fn contains(&self, widget_type: &str) -> bool {
        self.get(widget_type).is_some()
    }

    /// Canonical names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.values().map(|d| d.name)
    }

    pub fn family_of(&self, widget_type: &str) -> Option<WidgetFamily> {
        self.get(widget_type).map(|d| d.family)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for WidgetTypeRegistry {
    fn default() -> Self {
        Self::with_core_widgets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = WidgetTypeRegistry::default();
        assert_eq!(registry.get("datatable").map(|d| d.name), Some("DataTable"));
        assert_eq!(registry.family_of("INPUTSELECT"), Some(WidgetFamily::Value));
        assert!(!registry.contains("Carousel"));
    }

    #[test]
    fn test_core_widgets_are_registered() {
        let registry = WidgetTypeRegistry::default();
        for name in [
            "Value", "Display", "Text", "Html", "Markdown", "Image", "Video", "ColorIndicator",
            "ProgressBar", "DiffText", "Input", "InputText", "InputNumber", "InputHidden",
            "InputCheckBox", "InputDate", "InputSelect", "InputComboTable", "Filter", "Container",
            "Panel", "Form", "WidgetGroup", "SplitHorizontal", "SplitVertical", "SplitPanel",
            "WidgetGrid", "Tab", "Tabs", "Data", "DataTable", "DataList", "DataCards", "Tree",
            "Scheduler", "Gantt", "PivotTable", "Chart", "DataConfigurator", "Button",
            "DialogButton", "MenuButton", "WizardButton", "Tile", "Dialog", "Popup", "Wizard",
            "WizardStep", "NavTiles", "ContextBar",
        ] {
            assert!(registry.contains(name), "{} is not registered", name);
        }
        assert!(registry.names().all(|n| registry.contains(n)));
    }
}
