//! The widget trait, the state every widget shares and its capabilities.
//!
//! # Architecture
//!
//! A widget is a plain struct holding a [`WidgetCore`] and its typed
//! configuration. What else it can do is exposed through capability traits
//! instead of a type hierarchy:
//! - [`HasValue`] - bound to an attribute, expression or literal
//! - [`HasColor`] - has a color, possibly derived from its value
//! - [`FillsContainer`] - takes up its whole container, siblings are moved away
//! - [`TriggersAction`] - runs an action when pressed
//! - [`HasDataColumns`] - shows many rows of its own meta-object
//!
//! The [`Page`](crate::page::Page) owns widgets and their tree structure;
//! widgets never reference each other directly.

pub mod capability;
pub mod value;

pub use capability::*;
pub use value::{ValueBinding, ValueState};

use crate::error::WidgetResult;
use crate::flags::WidgetFlags;
use crate::traversal::SheetContext;
use crate::widget_id::WidgetId;
use metaui_model::{DataSheet, UxonObject};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// How prominently a widget is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Normal,
    Promoted,
    Optional,
    Hidden,
}

impl Visibility {
    fn is_normal(&self) -> bool {
        *self == Visibility::Normal
    }
}

/// The data-sheet pass a traversal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Preparing a sheet to be read.
    Read,
    /// Preparing a sheet for prefill, or prefilling from it.
    Prefill,
}

/// How a traversal should proceed for a widget's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Recurse into all children.
    Normal,
    /// The widget handles its subtree itself.
    Skip,
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Properties every widget type understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_alias: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub hide_caption: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "Visibility::is_normal")]
    pub visibility: Visibility,
}

impl CommonConfig {
    /// UXON property names handled here rather than by the widget type.
    pub const PROPERTIES: &'static [&'static str] = &[
        "id",
        "caption",
        "hint",
        "object_alias",
        "hidden",
        "disabled",
        "hide_caption",
        "readonly",
        "required",
        "visibility",
    ];
}

/// State shared by all widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetCore {
    id: WidgetId,
    widget_type: &'static str,
    pub caption: Option<String>,
    pub hint: Option<String>,
    /// Meta-object the widget is bound to. Inherited from the parent when `None`.
    pub object_alias: Option<String>,
    pub flags: WidgetFlags,
    pub visibility: Visibility,
}

impl WidgetCore {
    pub fn new(widget_type: &'static str) -> Self {
        Self {
            id: WidgetId::default(),
            widget_type,
            caption: None,
            hint: None,
            object_alias: None,
            flags: WidgetFlags::NONE,
            visibility: Visibility::Normal,
        }
    }

    pub fn from_common(widget_type: &'static str, common: CommonConfig) -> Self {
        let mut flags = WidgetFlags::NONE;
        flags.set(WidgetFlags::HIDDEN, common.hidden);
        flags.set(WidgetFlags::DISABLED, common.disabled);
        flags.set(WidgetFlags::HIDE_CAPTION, common.hide_caption);
        flags.set(WidgetFlags::READONLY, common.readonly);
        flags.set(WidgetFlags::REQUIRED, common.required);

        Self {
            id: common.id.map(WidgetId::from).unwrap_or_default(),
            widget_type,
            caption: common.caption,
            hint: common.hint,
            object_alias: common.object_alias,
            flags,
            visibility: common.visibility,
        }
    }

    pub fn to_common(&self) -> CommonConfig {
        CommonConfig {
            id: (!self.id.is_empty()).then(|| self.id.to_string()),
            caption: self.caption.clone(),
            hint: self.hint.clone(),
            object_alias: self.object_alias.clone(),
            hidden: self.flags.contains(WidgetFlags::HIDDEN),
            disabled: self.flags.contains(WidgetFlags::DISABLED),
            hide_caption: self.flags.contains(WidgetFlags::HIDE_CAPTION),
            readonly: self.flags.contains(WidgetFlags::READONLY),
            required: self.flags.contains(WidgetFlags::REQUIRED),
            visibility: self.visibility,
        }
    }

    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: WidgetId) {
        self.id = id;
    }

    pub fn widget_type(&self) -> &'static str {
        self.widget_type
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_hidden(&self) -> bool {
        !self.flags.is_visible() || self.visibility == Visibility::Hidden
    }

    pub fn is_disabled(&self) -> bool {
        self.flags.contains(WidgetFlags::DISABLED)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.flags.set(WidgetFlags::HIDDEN, hidden);
    }
}

/// Base trait for all widgets.
///
/// The sheet hooks only cover what a widget contributes beyond its value
/// binding: the page adds the column of every [`HasValue`] widget and fills
/// its value itself, then calls the hook.
pub trait Widget: Any {
    fn core(&self) -> &WidgetCore;

    fn core_mut(&mut self) -> &mut WidgetCore;

    fn widget_type(&self) -> &'static str {
        self.core().widget_type()
    }

    fn id(&self) -> &WidgetId {
        self.core().id()
    }

    /// Type-specific UXON properties. Common properties and children are
    /// exported by the page.
    fn export_config(&self) -> WidgetResult<UxonObject>;

    fn accepts_children(&self) -> bool {
        false
    }

    /// Whether siblings of a container-filling child are moved into that child.
    fn adopts_orphans(&self) -> bool {
        false
    }

    fn traversal(&self, _phase: Phase) -> Traversal {
        Traversal::Normal
    }

    fn prepare_data_sheet_to_read(
        &self,
        _ctx: &SheetContext<'_>,
        _sheet: &mut DataSheet,
    ) -> WidgetResult<()> {
        Ok(())
    }

    fn prepare_data_sheet_to_prefill(
        &self,
        _ctx: &SheetContext<'_>,
        _sheet: &mut DataSheet,
    ) -> WidgetResult<()> {
        Ok(())
    }

    fn prefill(&mut self, _ctx: &SheetContext<'_>, _sheet: &DataSheet) -> WidgetResult<()> {
        Ok(())
    }

    // Capability queries

    fn as_value(&self) -> Option<&dyn HasValue> {
        None
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn HasValue> {
        None
    }

    fn as_color(&self) -> Option<&dyn HasColor> {
        None
    }

    fn as_fills_container(&self) -> Option<&dyn FillsContainer> {
        None
    }

    fn as_action_trigger(&self) -> Option<&dyn TriggersAction> {
        None
    }

    fn as_data(&self) -> Option<&dyn HasDataColumns> {
        None
    }
}

impl dyn Widget {
    /// Typed access to a concrete widget.
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    pub fn is<T: Widget>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_config_round_trip() {
        let common = CommonConfig {
            id: Some("name".into()),
            caption: Some("Name".into()),
            readonly: true,
            visibility: Visibility::Promoted,
            ..Default::default()
        };
        let core = WidgetCore::from_common("Input", common.clone());
        assert!(core.flags.contains(WidgetFlags::READONLY));
        assert!(!core.flags.is_editable());
        assert_eq!(core.id().as_str(), "name");
        assert_eq!(core.to_common(), common);
    }

    #[test]
    fn test_hidden_by_flag_or_visibility() {
        let mut core = WidgetCore::new("Display");
        assert!(!core.is_hidden());
        core.visibility = Visibility::Hidden;
        assert!(core.is_hidden());
        core.visibility = Visibility::Normal;
        core.set_hidden(true);
        assert!(core.is_hidden());
    }

    #[test]
    fn test_common_config_skips_defaults() {
        let json = serde_json::to_string(&CommonConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
