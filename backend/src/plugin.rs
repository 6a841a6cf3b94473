//! Localization plugin
//!
//! Owns everything fixed at registration time (allow-list, default locale,
//! signal names, catalog, renderer) and installs the request-lifecycle
//! layers on a router.

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderName,
    middleware::{from_fn, from_fn_with_state},
};

use crate::config::I18nConfig;
use crate::middleware::{locale_middleware, render_view_middleware, view_context_middleware};
use crate::services::{Catalog, ViewRenderer};
use crate::utils::RequestI18n;
use crate::utils::i18n::{I18nError, LocaleSet, resolve_default_locale};

#[derive(Clone)]
pub struct LocalizationPlugin {
    inner: Arc<PluginState>,
}

struct PluginState {
    locales: LocaleSet,
    default_locale: String,
    query_parameter: Option<String>,
    language_header_field: Option<HeaderName>,
    catalog: Arc<Catalog>,
    renderer: Arc<dyn ViewRenderer>,
}

impl LocalizationPlugin {
    /// Validate the configuration and load the translation catalog
    pub fn new(config: &I18nConfig, renderer: Arc<dyn ViewRenderer>) -> Result<Self, I18nError> {
        let locales = config.locale_set()?;
        let catalog = Catalog::load(&config.directory, &locales)?;
        Self::with_catalog(config, Arc::new(catalog), renderer)
    }

    /// Build the plugin around an already loaded catalog
    pub fn with_catalog(
        config: &I18nConfig,
        catalog: Arc<Catalog>,
        renderer: Arc<dyn ViewRenderer>,
    ) -> Result<Self, I18nError> {
        let locales = config.locale_set()?;
        let default_locale = resolve_default_locale(config.default_locale.as_deref(), &locales);

        let language_header_field = config
            .language_header_field
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| {
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| I18nError::InvalidHeaderName(name.to_string()))
            })
            .transpose()?;

        let query_parameter = config.query_parameter.clone().filter(|name| !name.is_empty());

        tracing::info!(
            "Localization registered: locales={:?}, default={}, query={:?}, header={:?}",
            locales.iter().collect::<Vec<_>>(),
            default_locale,
            query_parameter,
            language_header_field
        );

        Ok(Self {
            inner: Arc::new(PluginState {
                locales,
                default_locale,
                query_parameter,
                language_header_field,
                catalog,
                renderer,
            }),
        })
    }

    /// Install the locale resolver, view-context merger and view renderer.
    ///
    /// Layers are route layers so that path parameters are already
    /// matched when the resolver runs. Per request the order is:
    /// resolver, handler, merger, renderer.
    pub fn register<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .route_layer(from_fn(view_context_middleware))
            .route_layer(from_fn_with_state(self.clone(), locale_middleware))
            .route_layer(from_fn_with_state(self.clone(), render_view_middleware))
    }

    /// A fresh translator for one request, set to the default locale
    pub fn new_request_i18n(&self) -> RequestI18n {
        RequestI18n::new(Arc::clone(&self.inner.catalog), self.inner.default_locale.clone())
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.inner.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.inner.default_locale
    }

    pub fn query_parameter(&self) -> Option<&str> {
        self.inner.query_parameter.as_deref()
    }

    pub fn language_header_field(&self) -> Option<&HeaderName> {
        self.inner.language_header_field.as_ref()
    }

    pub fn renderer(&self) -> &dyn ViewRenderer {
        self.inner.renderer.as_ref()
    }
}

impl std::fmt::Debug for LocalizationPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationPlugin")
            .field("locales", &self.inner.locales)
            .field("default_locale", &self.inner.default_locale)
            .field("query_parameter", &self.inner.query_parameter)
            .field("language_header_field", &self.inner.language_header_field)
            .finish()
    }
}
