//! Wiring of meta-model, configuration and widget factory.

use metaui_core::{Config, profiling};
use metaui_model::{MetaModel, ModelError, ModelRegistry, ModelResult, UxonObject};
use metaui_ui::{
    ContextProvider, NavigationSource, Page, WidgetError, WidgetFactory, WidgetResult,
    WidgetTypeDescriptor, WidgetTypeRegistry,
};
use std::path::Path;
use std::sync::Arc;

/// Builder for a [`MetaUi`].
///
/// Defaults:
/// - Config: [`Config::default`]
/// - Widget types: the core widgets
/// - No navigation source and no context providers
///
/// A meta-model must be supplied before [`MetaUiBuilder::build`].
pub struct MetaUiBuilder {
    model: Option<Arc<dyn MetaModel>>,
    config: Config,
    registry: WidgetTypeRegistry,
    navigation: Option<Arc<dyn NavigationSource>>,
    contexts: Vec<Arc<dyn ContextProvider>>,
}

impl Default for MetaUiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaUiBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            config: Config::default(),
            registry: WidgetTypeRegistry::with_core_widgets(),
            navigation: None,
            contexts: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn MetaModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Use a [`ModelRegistry`] loaded from a JSON definition.
    pub fn with_model_json(self, json: &str) -> ModelResult<Self> {
        let registry = ModelRegistry::from_json(json)?;
        Ok(self.with_model(Arc::new(registry)))
    }

    /// Use a [`ModelRegistry`] loaded from a JSON file.
    pub fn with_model_file(self, path: impl AsRef<Path>) -> ModelResult<Self> {
        let registry = ModelRegistry::load_file(path)?;
        Ok(self.with_model(Arc::new(registry)))
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register an additional widget type, replacing a core type of the same name.
    pub fn with_widget_type(mut self, descriptor: WidgetTypeDescriptor) -> Self {
        self.registry.register(descriptor);
        self
    }

    pub fn with_navigation(mut self, navigation: Arc<dyn NavigationSource>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.contexts.push(provider);
        self
    }

    /// Finish the builder and apply the configured profiling mode.
    pub fn build(self) -> WidgetResult<MetaUi> {
        let model = self.model.ok_or_else(|| WidgetError::Configuration {
            widget: "MetaUi".to_string(),
            message: "no meta-model was supplied".to_string(),
        })?;

        let mut factory = WidgetFactory::new(self.registry);
        if let Some(navigation) = self.navigation {
            factory = factory.with_navigation(navigation);
        }
        for provider in self.contexts {
            factory = factory.with_context_provider(provider);
        }

        profiling::set_mode(self.config.profiling);
        tracing::debug!(
            "metaui ready with {} widget types",
            factory.registry().len()
        );

        Ok(MetaUi {
            model,
            config: self.config,
            factory,
        })
    }
}

/// A meta-model, configuration and widget factory ready to build pages.
pub struct MetaUi {
    model: Arc<dyn MetaModel>,
    config: Config,
    factory: WidgetFactory,
}

impl MetaUi {
    pub fn builder() -> MetaUiBuilder {
        MetaUiBuilder::new()
    }

    pub fn model(&self) -> &Arc<dyn MetaModel> {
        &self.model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn factory(&self) -> &WidgetFactory {
        &self.factory
    }

    /// Install the global log subscriber with the configured filter.
    ///
    /// Returns `false` if a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        metaui_core::logging::try_init(&self.config.log_filter)
    }

    pub fn page_from_uxon(&self, uxon: UxonObject) -> WidgetResult<Page> {
        self.factory
            .build_page(Arc::clone(&self.model), self.config.clone(), uxon)
    }

    pub fn page_from_json(&self, json: &str) -> WidgetResult<Page> {
        self.page_from_uxon(UxonObject::from_json(json)?)
    }

    /// Build a page from a UXON file.
    pub fn page_from_file(&self, path: impl AsRef<Path>) -> WidgetResult<Page> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loading page from {}", path.display());
        self.page_from_json(&json)
    }
}
