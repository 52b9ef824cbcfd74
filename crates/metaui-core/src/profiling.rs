//! Profiling hooks based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the macros expand to nothing, so
//! traversal code can stay instrumented unconditionally.

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_function {
    () => {};
    ($data:expr) => {};
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {};
    ($name:expr, $data:expr) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::{profile_function, profile_scope};

use crate::config::ProfilingMode;

/// Turn scope collection on or off.
pub fn set_mode(mode: ProfilingMode) {
    #[cfg(feature = "profiling")]
    puffin::set_scopes_on(mode == ProfilingMode::On);

    #[cfg(not(feature = "profiling"))]
    if mode == ProfilingMode::On {
        tracing::warn!("Profiling requested but metaui-core was built without the `profiling` feature");
    }
}

/// Mark the end of one request's worth of work.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}
