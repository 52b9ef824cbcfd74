//! Services injected into the factory for widgets that generate their
//! children: navigation for tiles, contexts for the context bar.

use crate::error::WidgetResult;

/// A page reachable from the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub page_alias: String,
    pub caption: String,
    pub hint: Option<String>,
    pub icon: Option<String>,
}

impl NavItem {
    pub fn new(page_alias: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            page_alias: page_alias.into(),
            caption: caption.into(),
            hint: None,
            icon: None,
        }
    }
}

/// Source of the navigation menu.
pub trait NavigationSource {
    /// Pages below `parent_page`, or the top level for `None`.
    fn menu_items(&self, parent_page: Option<&str>) -> Vec<NavItem>;
}

/// What a context shows in the context bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextDescription {
    pub caption: String,
    pub hint: Option<String>,
    pub icon: Option<String>,
    /// Short status text, e.g. a counter.
    pub indicator: Option<String>,
    pub action_alias: Option<String>,
}

/// A context (user favorites, notifications, ...) shown in the context bar.
pub trait ContextProvider {
    fn alias(&self) -> &str;

    /// Describe the context. Errors are logged and the context is left out.
    fn describe(&self) -> WidgetResult<ContextDescription>;
}
