//! metaui - widget pages driven by a meta-model
//!
//! This is the facade crate. It re-exports the sub-crates and offers a
//! [`MetaUiBuilder`] that wires a meta-model, runtime configuration and the
//! widget factory together.
//!
//! # Features
//!
//! - `ui` (default): the widget layer, [`ui`]
//! - `profiling`: puffin scopes around traversal and page building
//!
//! # Example
//!
//! ```rust
//! use metaui::prelude::*;
//!
//! let app = MetaUiBuilder::new()
//!     .with_model_json(r#"{
//!         "objects": [{
//!             "alias": "crm.CONTACT",
//!             "name": "Contact",
//!             "attributes": [{ "alias": "EMAIL", "name": "Email" }]
//!         }]
//!     }"#)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let page = app
//!     .page_from_json(r#"{
//!         "widget_type": "Form",
//!         "object_alias": "crm.CONTACT",
//!         "widgets": [{ "widget_type": "InputText", "attribute_alias": "EMAIL" }]
//!     }"#)
//!     .unwrap();
//! assert_eq!(page.widget_count(), 2);
//! ```

pub use metaui_core as core;
pub use metaui_model as model;

#[cfg(feature = "ui")]
pub use metaui_ui as ui;

#[cfg(feature = "ui")]
mod app;

#[cfg(feature = "ui")]
pub use app::{MetaUi, MetaUiBuilder};

pub mod prelude {
    pub use metaui_core::{Config, ProfilingMode};
    pub use metaui_model::{
        Aggregator, DataSheet, Expression, MetaModel, ModelError, ModelRegistry, UxonObject,
    };

    #[cfg(feature = "ui")]
    pub use crate::{MetaUi, MetaUiBuilder};

    #[cfg(feature = "ui")]
    pub use metaui_ui::{
        ContextProvider, FillsContainer, HasColor, HasDataColumns, HasValue, NavigationSource,
        NodeId, Page, TriggersAction, Widget, WidgetError, WidgetEvent, WidgetFactory,
        WidgetResult,
    };
}
