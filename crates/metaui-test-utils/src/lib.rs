//! Test utilities for the metaui widget layer.
//!
//! This crate provides a small shop meta-model and helpers for building data
//! sheets, shared by the tests and benchmarks of the other crates.
//!
//! # Overview
//!
//! - [`shop_model`] - four related objects: `shop.ORDER`, `shop.CUSTOMER`,
//!   `shop.ORDER_POS` and `shop.PRODUCT`
//! - [`SheetBuilder`] - fluent construction of data sheets with rows
//!
//! # Example
//!
//! ```rust
//! use metaui_test_utils::{SheetBuilder, shop_model};
//! use metaui_model::MetaModel;
//!
//! let model = shop_model();
//! assert!(model.has_object("shop.ORDER"));
//!
//! let sheet = SheetBuilder::new("shop.ORDER")
//!     .row([("NUMBER", "A-1".into()), ("CUSTOMER__NAME", "Ada".into())])
//!     .build();
//! assert_eq!(sheet.rows_count(), 1);
//! ```

pub mod sheets;
pub mod shop;

pub use sheets::SheetBuilder;
pub use shop::{shared_shop_model, shop_model};
