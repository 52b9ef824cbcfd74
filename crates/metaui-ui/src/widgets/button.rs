//! Buttons and tiles.

use super::{export_config, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::page::ChildSlot;
use crate::widget::{CommonConfig, TriggersAction, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPES: [&str; 5] = ["Button", "DialogButton", "MenuButton", "WizardButton", "Tile"];

/// Action a tile runs when it only names a page.
pub const GO_TO_PAGE_ACTION: &str = "GoToPage";

pub(crate) const SLOTS: &[ChildSlot] = &[ChildSlot::one("dialog"), ChildSlot::many("buttons")];

/// Where a wizard button leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepNavigation {
    Next,
    Previous,
    Step(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
    /// Close the surrounding dialog once the action succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_dialog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_widget_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard_navigation: Option<StepNavigation>,
    /// Page opened by a tile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_alias: Option<String>,
    /// Short status text shown on the button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Button {
    core: WidgetCore,
    config: ButtonConfig,
}

impl Button {
    pub fn new(core: WidgetCore, config: ButtonConfig) -> WidgetResult<Self> {
        let widget_type = core.widget_type();
        if config.wizard_navigation.is_some() && widget_type != "WizardButton" {
            return Err(WidgetError::invalid_property(
                widget_type,
                "wizard_navigation",
                "only wizard buttons navigate between steps",
            ));
        }
        if config.page_alias.is_some() && widget_type != "Tile" {
            return Err(WidgetError::invalid_property(
                widget_type,
                "page_alias",
                "only tiles open pages",
            ));
        }
        Ok(Self { core, config })
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn icon(&self) -> Option<&str> {
        self.config.icon.as_deref()
    }

    pub fn page_alias(&self) -> Option<&str> {
        self.config.page_alias.as_deref()
    }

    /// Step a wizard button leads to, `Next` unless configured.
    pub fn wizard_navigation(&self) -> Option<StepNavigation> {
        match self.core.widget_type() {
            "WizardButton" => Some(self.config.wizard_navigation.unwrap_or(StepNavigation::Next)),
            _ => None,
        }
    }
}

impl Widget for Button {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        export_config(&self.config)
    }

    fn accepts_children(&self) -> bool {
        matches!(self.core.widget_type(), "DialogButton" | "MenuButton")
    }

    fn as_action_trigger(&self) -> Option<&dyn TriggersAction> {
        Some(self)
    }
}

impl TriggersAction for Button {
    fn action_alias(&self) -> Option<&str> {
        match (&self.config.action_alias, &self.config.page_alias) {
            (Some(action), _) => Some(action.as_str()),
            (None, Some(_)) => Some(GO_TO_PAGE_ACTION),
            (None, None) => None,
        }
    }

    fn closes_dialog(&self) -> bool {
        self.config
            .close_dialog
            .unwrap_or(self.core.widget_type() == "DialogButton")
    }

    fn input_widget_id(&self) -> Option<&str> {
        self.config.input_widget_id.as_deref()
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    let config: ButtonConfig = import_config(widget_type, &uxon)?;
    Ok(Box::new(Button::new(
        WidgetCore::from_common(widget_type, common),
        config,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(widget_type: &'static str, config: ButtonConfig) -> WidgetResult<Button> {
        Button::new(WidgetCore::new(widget_type), config)
    }

    #[test]
    fn test_defaults_by_type() {
        let dialog_button = button("DialogButton", ButtonConfig::default()).unwrap();
        assert!(dialog_button.closes_dialog());
        assert!(dialog_button.accepts_children());

        let plain = button("Button", ButtonConfig::default()).unwrap();
        assert!(!plain.closes_dialog());
        assert_eq!(plain.wizard_navigation(), None);

        let wizard = button("WizardButton", ButtonConfig::default()).unwrap();
        assert_eq!(wizard.wizard_navigation(), Some(StepNavigation::Next));
    }

    #[test]
    fn test_tile_goes_to_page() {
        let tile = button(
            "Tile",
            ButtonConfig {
                page_alias: Some("shop.orders".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(tile.action_alias(), Some(GO_TO_PAGE_ACTION));
        assert!(
            button(
                "Button",
                ButtonConfig {
                    page_alias: Some("shop.orders".into()),
                    ..Default::default()
                }
            )
            .is_err()
        );
    }

    #[test]
    fn test_step_navigation_uxon() {
        let config: ButtonConfig =
            UxonObject::from_json(r#"{"wizard_navigation": {"step": 2}}"#).unwrap().deserialize_into().unwrap();
        assert_eq!(config.wizard_navigation, Some(StepNavigation::Step(2)));
        let config: ButtonConfig =
            UxonObject::from_json(r#"{"wizard_navigation": "previous"}"#).unwrap().deserialize_into().unwrap();
        assert_eq!(config.wizard_navigation, Some(StepNavigation::Previous));
    }
}
