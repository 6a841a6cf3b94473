use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::i18n::{I18nError, LocaleSet};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub i18n: I18nConfig,
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Localization settings, read once at registration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported locale codes; the first one is the implicit default
    pub locales: Option<Vec<String>>,
    /// Overrides the first of `locales` as the default
    #[serde(alias = "defaultLocale")]
    pub default_locale: Option<String>,
    /// Directory holding `<locale>.json` translation files
    pub directory: PathBuf,
    /// Query key inspected for a requested locale
    #[serde(alias = "queryParameter")]
    pub query_parameter: Option<String>,
    /// Header inspected for a requested locale
    #[serde(alias = "languageHeaderField")]
    pub language_header_field: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    pub directory: PathBuf,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the given path, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        // 1. Load from config file
        let mut config = match path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(config_path) => Self::from_toml(&config_path)?,
                None => {
                    tracing::warn!("Configuration file not found, using defaults");
                    Config::default()
                },
            },
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,request_locale=debug")
    /// - APP_I18N_LOCALES: Comma-separated locale codes (e.g., "de,en,fr")
    /// - APP_I18N_DEFAULT_LOCALE: Default locale code
    /// - APP_I18N_DIRECTORY: Translation file directory
    /// - APP_I18N_QUERY_PARAMETER: Query key carrying a requested locale
    /// - APP_I18N_HEADER_FIELD: Header carrying a requested locale
    /// - APP_VIEWS_DIRECTORY: Template directory
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Some(level) = var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(locales) = var("APP_I18N_LOCALES") {
            let locales: Vec<String> = locales
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
            tracing::info!("Override i18n.locales from env: {:?}", locales);
            self.i18n.locales = Some(locales);
        }

        if let Some(default_locale) = var("APP_I18N_DEFAULT_LOCALE") {
            tracing::info!("Override i18n.default_locale from env: {}", default_locale);
            self.i18n.default_locale = Some(default_locale);
        }

        if let Some(directory) = var("APP_I18N_DIRECTORY") {
            self.i18n.directory = PathBuf::from(directory);
            tracing::info!("Override i18n.directory from env: {}", self.i18n.directory.display());
        }

        if let Some(query) = var("APP_I18N_QUERY_PARAMETER") {
            tracing::info!("Override i18n.query_parameter from env: {}", query);
            self.i18n.query_parameter = Some(query);
        }

        if let Some(header) = var("APP_I18N_HEADER_FIELD") {
            tracing::info!("Override i18n.language_header_field from env: {}", header);
            self.i18n.language_header_field = Some(header);
        }

        if let Some(directory) = var("APP_VIEWS_DIRECTORY") {
            self.views.directory = PathBuf::from(directory);
            tracing::info!("Override views.directory from env: {}", self.views.directory.display());
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        // Validate server port
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        let locales = self.i18n.locale_set()?;

        if let Some(default_locale) = &self.i18n.default_locale
            && !locales.contains(default_locale)
        {
            tracing::warn!(
                "Default locale '{}' is not one of the configured locales {:?}",
                default_locale,
                locales.iter().collect::<Vec<_>>()
            );
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths = ["conf/config.toml", "config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl I18nConfig {
    pub fn locale_set(&self) -> Result<LocaleSet, I18nError> {
        LocaleSet::new(self.locales.as_deref())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,request_locale=debug".to_string(), file: None }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: None,
            default_locale: None,
            directory: PathBuf::from("locales"),
            query_parameter: None,
            language_header_field: None,
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("views") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_snake_case_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [i18n]
            locales = ["de", "en", "fr"]
            default_locale = "en"
            directory = "/srv/locales"
            query_parameter = "lang"
            language_header_field = "language"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        let locales = vec!["de".to_string(), "en".to_string(), "fr".to_string()];
        assert_eq!(config.i18n.locales, Some(locales));
        assert_eq!(config.i18n.default_locale.as_deref(), Some("en"));
        assert_eq!(config.i18n.directory, PathBuf::from("/srv/locales"));
        assert_eq!(config.i18n.query_parameter.as_deref(), Some("lang"));
        assert_eq!(config.i18n.language_header_field.as_deref(), Some("language"));
        assert_eq!(config.views.directory, PathBuf::from("views"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let config: Config = toml::from_str(
            r#"
            [i18n]
            locales = ["de"]
            defaultLocale = "de"
            queryParameter = "lang"
            languageHeaderField = "language"
            "#,
        )
        .unwrap();

        assert_eq!(config.i18n.default_locale.as_deref(), Some("de"));
        assert_eq!(config.i18n.query_parameter.as_deref(), Some("lang"));
        assert_eq!(config.i18n.language_header_field.as_deref(), Some("language"));
    }

    #[test]
    fn test_validate_requires_locales() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "No locales defined!");

        let mut config = Config::default();
        config.i18n.locales = Some(vec![]);
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Locales array is empty!");
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.i18n.locales = Some(vec!["en".to_string()]);
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_default_outside_locales() {
        let mut config = Config::default();
        config.i18n.locales = Some(vec!["en".to_string()]);
        config.i18n.default_locale = Some("de".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("APP_SERVER_PORT", "9090"),
            ("APP_I18N_LOCALES", "de, en ,,fr"),
            ("APP_I18N_DEFAULT_LOCALE", "en"),
            ("APP_I18N_QUERY_PARAMETER", "lang"),
            ("APP_I18N_HEADER_FIELD", "language"),
            ("APP_VIEWS_DIRECTORY", "templates"),
        ]));

        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.i18n.locales,
            Some(vec!["de".to_string(), "en".to_string(), "fr".to_string()])
        );
        assert_eq!(config.i18n.default_locale.as_deref(), Some("en"));
        assert_eq!(config.i18n.query_parameter.as_deref(), Some("lang"));
        assert_eq!(config.i18n.language_header_field.as_deref(), Some("language"));
        assert_eq!(config.views.directory, PathBuf::from("templates"));
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("APP_SERVER_PORT", "not-a-port")]));
        assert_eq!(config.server.port, 8080);
    }
}
