//! metaui UI - declarative widgets bound to a meta-model
//!
//! This crate builds widget trees from UXON definitions and walks them over
//! data sheets:
//! - Widget trees owned by a [`Page`] arena
//! - A case-insensitive [`WidgetTypeRegistry`] used by the [`WidgetFactory`]
//! - Capability traits instead of a widget class hierarchy
//! - Sheet preparation (read and prefill) and prefill over the tree
//!
//! ## Quick Start
//!
//! ```rust
//! use metaui_core::Config;
//! use metaui_model::{DataSheet, MetaModel, ModelRegistry, UxonObject};
//! use metaui_ui::Page;
//! use std::sync::Arc;
//!
//! let model: Arc<dyn MetaModel> = Arc::new(ModelRegistry::from_json(r#"{
//!     "objects": [{
//!         "alias": "shop.CUSTOMER",
//!         "name": "Customer",
//!         "attributes": [
//!             { "alias": "NAME", "name": "Name" },
//!             { "alias": "CITY", "name": "City" }
//!         ]
//!     }]
//! }"#).unwrap());
//!
//! let page = Page::from_uxon(model, Config::default(), UxonObject::from_json(r#"{
//!     "widget_type": "Form",
//!     "object_alias": "shop.CUSTOMER",
//!     "widgets": [
//!         { "widget_type": "Input", "attribute_alias": "NAME" },
//!         { "widget_type": "Display", "attribute_alias": "CITY" }
//!     ]
//! }"#).unwrap()).unwrap();
//!
//! let root = page.root().unwrap();
//! let sheet = page.prepare_data_sheet_to_read(root, DataSheet::new("shop.CUSTOMER")).unwrap();
//! assert_eq!(sheet.column_names(), vec!["NAME", "CITY"]);
//! ```

pub mod binding;
pub mod context;
pub mod error;
pub mod event;
pub mod factory;
pub mod flags;
pub mod page;
pub mod registry;
pub mod traversal;
pub mod widget;
pub mod widget_id;
pub mod widgets;

pub use binding::bind_to_sheet;
pub use context::{ContextDescription, ContextProvider, NavItem, NavigationSource};
pub use error::{WidgetError, WidgetResult};
pub use event::{EventListener, WidgetEvent};
pub use factory::WidgetFactory;
pub use flags::WidgetFlags;
pub use page::{ChildSlot, NodeId, Page, WidgetNode};
pub use registry::{WidgetFamily, WidgetTypeDescriptor, WidgetTypeRegistry};
pub use traversal::{SheetContext, add_expression_column};
pub use widget::{
    CommonConfig, FillsContainer, HasColor, HasDataColumns, HasValue, Phase, Traversal,
    TriggersAction, ValueBinding, ValueState, Visibility, Widget, WidgetCore,
};
pub use widget_id::{WidgetId, WidgetIdRegistry};
