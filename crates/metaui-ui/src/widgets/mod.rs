//! Widget types shipped with the crate and their registration.

pub mod button;
pub mod configurator;
pub mod container;
pub mod context_bar;
pub mod data;
pub mod dialog;
pub mod diff_text;
pub mod display;
pub mod filter;
pub mod input;
pub mod nav_tiles;
pub mod tabs;
pub mod wizard;

pub use button::{Button, ButtonConfig, StepNavigation};
pub use configurator::DataConfigurator;
pub use container::{Container, ContainerConfig};
pub use context_bar::ContextBar;
pub use data::{Data, DataColumn, DataConfig, DataLayout};
pub use dialog::{Dialog, DialogConfig};
pub use diff_text::{DiffLine, DiffText};
pub use display::{Display, DisplayConfig};
pub use filter::{Filter, FilterConfig};
pub use input::{Input, InputConfig};
pub use nav_tiles::NavTiles;
pub use tabs::{TabPosition, Tabs};
pub use wizard::{Wizard, WizardStep};

use crate::error::{WidgetError, WidgetResult};
use crate::page::ChildSlot;
use crate::registry::{WidgetFamily, WidgetTypeDescriptor, WidgetTypeRegistry};
use crate::widget::ValueBinding;
use metaui_model::expression::is_attribute_path;
use metaui_model::{Aggregator, UxonObject, Value};
use serde::Serialize;
use serde::de::DeserializeOwned;

const WIDGETS_AND_BUTTONS: &[ChildSlot] = &[ChildSlot::WIDGETS, ChildSlot::many("buttons")];

/// Register every widget type of this crate.
pub fn register_core_widgets(registry: &mut WidgetTypeRegistry) {
    for name in display::WIDGET_TYPES {
        registry.register(WidgetTypeDescriptor::new(name, WidgetFamily::Value, display::build));
    }
    registry.register(WidgetTypeDescriptor::new(
        diff_text::WIDGET_TYPE,
        WidgetFamily::Value,
        diff_text::build,
    ));
    for name in input::WIDGET_TYPES {
        registry.register(WidgetTypeDescriptor::new(name, WidgetFamily::Value, input::build));
    }
    registry.register(WidgetTypeDescriptor::new(
        filter::WIDGET_TYPE,
        WidgetFamily::Value,
        filter::build,
    ));

    for name in container::WIDGET_TYPES {
        registry.register(
            WidgetTypeDescriptor::new(name, WidgetFamily::Container, container::build)
                .with_slots(WIDGETS_AND_BUTTONS),
        );
    }
    registry.register(
        WidgetTypeDescriptor::new(tabs::WIDGET_TYPE, WidgetFamily::Container, tabs::build)
            .with_slots(tabs::SLOTS)
            .with_finish(tabs::finish),
    );

    for name in data::WIDGET_TYPES {
        registry.register(
            WidgetTypeDescriptor::new(name, WidgetFamily::Data, data::build)
                .with_slots(data::SLOTS)
                .with_finish(data::finish),
        );
    }
    registry.register(
        WidgetTypeDescriptor::new(
            configurator::WIDGET_TYPE,
            WidgetFamily::Container,
            configurator::build,
        )
        .with_slots(configurator::SLOTS),
    );

    for name in button::WIDGET_TYPES {
        registry.register(
            WidgetTypeDescriptor::new(name, WidgetFamily::Action, button::build)
                .with_slots(button::SLOTS),
        );
    }

    for name in dialog::WIDGET_TYPES {
        registry.register(
            WidgetTypeDescriptor::new(name, WidgetFamily::Composite, dialog::build)
                .with_slots(WIDGETS_AND_BUTTONS)
                .with_finish(dialog::finish),
        );
    }
    registry.register(
        WidgetTypeDescriptor::new(wizard::WIDGET_TYPE, WidgetFamily::Composite, wizard::build)
            .with_slots(wizard::SLOTS)
            .with_finish(wizard::finish),
    );
    registry.register(
        WidgetTypeDescriptor::new(
            wizard::STEP_WIDGET_TYPE,
            WidgetFamily::Container,
            wizard::build_step,
        )
        .with_slots(WIDGETS_AND_BUTTONS),
    );
    registry.register(
        WidgetTypeDescriptor::new(
            nav_tiles::WIDGET_TYPE,
            WidgetFamily::Composite,
            nav_tiles::build,
        )
        .with_slots(nav_tiles::SLOTS)
        .with_finish(nav_tiles::finish),
    );
    registry.register(
        WidgetTypeDescriptor::new(
            context_bar::WIDGET_TYPE,
            WidgetFamily::Composite,
            context_bar::build,
        )
        .with_slots(context_bar::SLOTS)
        .with_finish(context_bar::finish),
    );
}

/// Import a typed configuration, naming the widget type in errors.
pub(crate) fn import_config<T: DeserializeOwned>(
    widget_type: &str,
    uxon: &UxonObject,
) -> WidgetResult<T> {
    uxon.deserialize_into()
        .map_err(|e| WidgetError::from_uxon(widget_type, e))
}

pub(crate) fn export_config<T: Serialize>(config: &T) -> WidgetResult<UxonObject> {
    Ok(UxonObject::from_serializable(config)?)
}

/// Value binding from the `attribute_alias`, `value` and `aggregator` properties.
pub(crate) fn import_binding(
    widget_type: &str,
    attribute_alias: Option<&str>,
    value: Option<&Value>,
    aggregator: Option<Aggregator>,
) -> WidgetResult<ValueBinding> {
    ValueBinding::new(attribute_alias, value, aggregator).map_err(|e| {
        let property = match attribute_alias {
            Some(alias) if !is_attribute_path(alias) => "attribute_alias",
            _ => "value",
        };
        WidgetError::invalid_property(widget_type, property, e.to_string())
    })
}

/// Minimal UXON definition of a generated child.
pub(crate) fn definition(widget_type: &str) -> UxonObject {
    let mut uxon = UxonObject::new();
    uxon.insert("widget_type", widget_type);
    uxon
}
