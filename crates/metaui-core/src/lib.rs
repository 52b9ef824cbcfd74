//! metaui Core
//!
//! This crate contains the ambient functionality shared by the metaui crates:
//! hash collections, logging bootstrap, runtime configuration and profiling hooks.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;

pub use config::{Config, ProfilingMode};
