//! metaui Model - the collaborators widgets are bound to
//!
//! This crate provides the minimal in-process form of everything the widget
//! layer calls into:
//! - Meta-objects, attributes, relations and data types ([`MetaModel`])
//! - Attribute/literal/formula expressions ([`Expression`])
//! - Tabular data sheets with filters, sorters and aggregation ([`DataSheet`])
//! - UXON configuration objects ([`UxonObject`])
//!
//! ## Quick Start
//!
//! ```rust
//! use metaui_model::{DataSheet, Expression, MetaModel, ModelRegistry};
//!
//! let model = ModelRegistry::from_json(r#"{
//!     "objects": [{
//!         "alias": "shop.CUSTOMER",
//!         "name": "Customer",
//!         "uid_attribute": "UID",
//!         "attributes": [
//!             { "alias": "UID", "name": "Id", "data_type": { "type": "integer" } },
//!             { "alias": "NAME", "name": "Name", "data_type": { "type": "string" } }
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let customer = model.object("shop.CUSTOMER").unwrap();
//! let mut sheet = DataSheet::new(customer.alias());
//! assert!(sheet.add_column(Expression::attribute("NAME")));
//! assert!(!sheet.add_column(Expression::attribute("NAME")));
//! ```

pub mod aggregator;
pub mod datatype;
pub mod error;
pub mod expression;
pub mod model;
pub mod object;
pub mod sheet;
pub mod uxon;

pub use aggregator::Aggregator;
pub use datatype::{Align, DataType};
pub use error::{ModelError, ModelResult};
pub use expression::Expression;
pub use model::{MetaModel, ModelRegistry, RelationPath, ResolvedAttribute, RELATION_SEPARATOR};
pub use object::{MetaAttribute, MetaObject, MetaRelation, RelationKind};
pub use sheet::{
    CellPointer, Comparator, Condition, ConditionGroup, DataSheet, GroupOperator, SheetColumn,
    SortDirection, Sorter,
};
pub use uxon::{UxonError, UxonObject};

/// Cell and property values are plain JSON values.
pub use serde_json::Value;
