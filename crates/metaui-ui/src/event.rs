//! Events dispatched by a page.

use crate::page::NodeId;
use crate::widget_id::WidgetId;
use metaui_model::{CellPointer, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A widget's value was prefilled from a data sheet.
    ValueChanged {
        node: NodeId,
        widget_id: WidgetId,
        old: Option<Value>,
        new: Value,
        /// The cell the value was taken from.
        source: CellPointer,
    },

    /// A widget was moved to another parent.
    Reparented {
        node: NodeId,
        from: Option<NodeId>,
        to: NodeId,
    },
}

impl WidgetEvent {
    pub fn node(&self) -> NodeId {
        match self {
            WidgetEvent::ValueChanged { node, .. } | WidgetEvent::Reparented { node, .. } => *node,
        }
    }
}

/// Callback invoked synchronously for every dispatched event.
pub type EventListener = Box<dyn FnMut(&WidgetEvent)>;
