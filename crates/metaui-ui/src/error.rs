//! Errors raised while building widget trees and walking them over data sheets.

use crate::page::NodeId;
use metaui_model::{ModelError, UxonError};
use std::fmt;

/// Errors that can occur in the widget layer.
#[derive(Debug)]
pub enum WidgetError {
    /// No widget type is registered under this name.
    UnknownWidgetType { widget_type: String },

    /// A UXON widget definition has no `widget_type`.
    MissingWidgetType,

    /// A property has an invalid value or is not known to the widget type.
    InvalidProperty {
        widget_type: String,
        property: String,
        message: String,
    },

    /// A widget requires a child it does not have.
    MissingChild { widget: String, child: String },

    /// The node does not exist on the page.
    UnknownNode(NodeId),

    /// Two widgets were given the same id.
    DuplicateId { id: String },

    /// The page already has a root widget.
    RootExists,

    /// The widget cannot hold children.
    ChildrenNotAccepted { parent: String, child: String },

    /// A move would detach the root or create a cycle.
    InvalidReparent {
        node: NodeId,
        target: NodeId,
        reason: &'static str,
    },

    /// The widget is bound to something the meta-model cannot resolve.
    Configuration { widget: String, message: String },

    /// The current value of a widget is rejected.
    InvalidValue { widget: String, message: String },

    /// Error from the meta-model.
    Model(ModelError),

    /// Malformed UXON.
    Uxon(UxonError),
}

impl WidgetError {
    pub(crate) fn configuration(widget: impl Into<String>, message: impl Into<String>) -> Self {
        WidgetError::Configuration {
            widget: widget.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(widget: impl Into<String>, message: impl Into<String>) -> Self {
        WidgetError::InvalidValue {
            widget: widget.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_property(
        widget_type: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        WidgetError::InvalidProperty {
            widget_type: widget_type.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Attach the widget type to a UXON error raised while importing its config.
    pub(crate) fn from_uxon(widget_type: &str, error: UxonError) -> Self {
        match error {
            UxonError::InvalidProperty { property, message } => {
                WidgetError::invalid_property(widget_type, property, message)
            }
            UxonError::MissingProperty { property } => {
                WidgetError::invalid_property(widget_type, property, "required property is missing")
            }
            other => WidgetError::Uxon(other),
        }
    }
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::UnknownWidgetType { widget_type } => {
                write!(f, "Unknown widget type '{}'", widget_type)
            }
            WidgetError::MissingWidgetType => write!(f, "Widget definition has no widget_type"),
            WidgetError::InvalidProperty {
                widget_type,
                property,
                message,
            } => write!(
                f,
                "Invalid property '{}' of {}: {}",
                property, widget_type, message
            ),
            WidgetError::MissingChild { widget, child } => {
                write!(f, "Widget '{}' requires a {} child", widget, child)
            }
            WidgetError::UnknownNode(node) => write!(f, "Node {} is not part of the page", node),
            WidgetError::DuplicateId { id } => write!(f, "Widget id '{}' is used twice", id),
            WidgetError::RootExists => write!(f, "The page already has a root widget"),
            WidgetError::ChildrenNotAccepted { parent, child } => {
                write!(f, "Widget '{}' cannot hold child '{}'", parent, child)
            }
            WidgetError::InvalidReparent {
                node,
                target,
                reason,
            } => write!(f, "Cannot move node {} to {}: {}", node, target, reason),
            WidgetError::Configuration { widget, message } => {
                write!(f, "Configuration error in widget '{}': {}", widget, message)
            }
            WidgetError::InvalidValue { widget, message } => {
                write!(f, "Invalid value in widget '{}': {}", widget, message)
            }
            WidgetError::Model(e) => write!(f, "Meta-model error: {}", e),
            WidgetError::Uxon(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Model(e) => Some(e),
            WidgetError::Uxon(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for WidgetError {
    fn from(error: ModelError) -> Self {
        WidgetError::Model(error)
    }
}

impl From<UxonError> for WidgetError {
    fn from(error: UxonError) -> Self {
        WidgetError::Uxon(error)
    }
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
