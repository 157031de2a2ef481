//! Site configuration for tome.
//!
//! Parses `tome.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`]. The
//! `site_url` override is special: it is substituted into the raw config
//! text before parsing (see [`substitute_site_url`]), so the parsed
//! configuration always reflects the deployment target.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site_name`
//! - `site_url`
//! - `server.host`

mod expand;
mod site_url;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use site_url::{DEFAULT_SITE_URL, SiteUrlIssue, check_site_url, substitute_site_url};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site URL (substituted into the config text before parsing).
    pub site_url: Option<String>,
    /// Override site name.
    pub site_name: Option<String>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override strict mode.
    pub strict: Option<bool>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tome.toml";

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identifier of the generated site (page titles, header).
    pub site_name: String,
    /// Absolute URL the artifact will be served under.
    pub site_url: String,
    /// Site description for `<meta name="description">`.
    pub site_description: Option<String>,
    /// Footer copyright line.
    pub copyright: Option<String>,
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Explicit navigation (derived from the directory layout when absent).
    pub nav: Option<Vec<NavEntry>>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 80,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    strict: Option<bool>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Output directory for the build artifact.
    pub output_dir: PathBuf,
    /// Treat broken internal links as build errors.
    pub strict: bool,
}

/// Navigation entry.
///
/// `path` is a source path relative to the docs directory
/// (e.g. `guide/outbox.md`). Entries without a path are pure sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavEntry {
    /// Display title.
    pub title: String,
    /// Source file of the page.
    pub path: Option<String>,
    /// Nested entries.
    #[serde(default)]
    pub children: Vec<NavEntry>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tome.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let site_url = cli_settings.and_then(|s| s.site_url.as_deref());

        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path, site_url)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered, site_url)?
        } else {
            let mut config = Self::default_with_cwd();
            if let Some(url) = site_url {
                url.clone_into(&mut config.site_url);
            }
            config
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// When `site_url` is given it replaces the `site_url` line of `content`
    /// before parsing. Relative paths are resolved against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, env expansion or validation fails.
    pub fn from_toml(
        content: &str,
        site_url: Option<&str>,
        config_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = match site_url {
            Some(url) => toml::from_str(&substitute_site_url(content, url))?,
            None => toml::from_str(content)?,
        };

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.resolve_paths(config_dir);

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// `site_url` is not handled here; it is substituted into the config text
    /// before parsing.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_name) = &settings.site_name {
            self.site_name.clone_from(site_name);
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(strict) = settings.strict {
            self.docs_resolved.strict = strict;
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
    }

    /// Problems with `site_url` that will break asset references.
    ///
    /// These are warnings, never errors: the build proceeds regardless.
    #[must_use]
    pub fn site_url_warnings(&self) -> Vec<SiteUrlIssue> {
        check_site_url(&self.site_url)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site_name: "Documentation".to_owned(),
            site_url: DEFAULT_SITE_URL.to_owned(),
            site_description: None,
            copyright: None,
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            nav: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("site"),
                strict: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path, site_url: Option<&str>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, site_url, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// `site_url` is deliberately not validated here; see [`Self::site_url_warnings`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_name, "site_name")?;
        self.validate_server()?;
        if let Some(nav) = &self.nav {
            validate_nav(nav, "nav")?;
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site_name = expand::expand_env(&self.site_name, "site_name")?;
        self.site_url = expand::expand_env(&self.site_url, "site_url")?;
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "site"),
            strict: self.docs.strict.unwrap_or(false),
        };
    }
}

/// Validate navigation entries recursively.
fn validate_nav(entries: &[NavEntry], field: &str) -> Result<(), ConfigError> {
    for (i, entry) in entries.iter().enumerate() {
        let entry_field = format!("{field}[{i}]");
        require_non_empty(entry.title.trim(), &format!("{entry_field}.title"))?;
        match &entry.path {
            Some(path) => {
                require_non_empty(path, &format!("{entry_field}.path"))?;
                if !path.ends_with(".md") {
                    return Err(ConfigError::Validation(format!(
                        "{entry_field}.path must point to a .md file"
                    )));
                }
            }
            None if entry.children.is_empty() => {
                return Err(ConfigError::Validation(format!(
                    "{entry_field} needs a path or children"
                )));
            }
            None => {}
        }
        validate_nav(&entry.children, &format!("{entry_field}.children"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site_name, "Documentation");
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 80);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/site"));
        assert!(!config.docs_resolved.strict);
        assert!(config.nav.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.server.port, 80);
    }

    #[test]
    fn test_parse_site_fields() {
        let toml = r#"
site_name = "Ordered CQRS"
site_url = "https://cqrs.example.org/"
site_description = "Mediator, outbox and saga guides"
copyright = "Copyright 2026 Example"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site_name, "Ordered CQRS");
        assert_eq!(config.site_url, "https://cqrs.example.org/");
        assert_eq!(
            config.site_description.as_deref(),
            Some("Mediator, outbox and saga guides")
        );
        assert_eq!(config.copyright.as_deref(), Some("Copyright 2026 Example"));
    }

    #[test]
    fn test_parse_nav() {
        let toml = r#"
[[nav]]
title = "Home"
path = "index.md"

[[nav]]
title = "Patterns"
children = [
    { title = "Outbox", path = "patterns/outbox.md" },
    { title = "Saga", path = "patterns/saga.md" },
]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let nav = config.nav.unwrap();
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].path.as_deref(), Some("index.md"));
        assert!(nav[1].path.is_none());
        assert_eq!(nav[1].children[1].title, "Saga");
    }

    #[test]
    fn test_from_toml_resolves_paths() {
        let toml = r#"
[docs]
source_dir = "content"
output_dir = "public"
strict = true
"#;
        let config = Config::from_toml(toml, None, Path::new("/project")).unwrap();
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/public")
        );
        assert!(config.docs_resolved.strict);
    }

    #[test]
    fn test_from_toml_substitutes_site_url() {
        let toml = "site_url = \"https://docs.example.com/\"\nsite_name = \"Docs\"\n";
        let config =
            Config::from_toml(toml, Some("http://localhost:8000/"), Path::new("/p")).unwrap();
        assert_eq!(config.site_url, "http://localhost:8000/");
        assert_eq!(config.site_name, "Docs");
    }

    #[test]
    fn test_from_toml_substitutes_when_key_absent() {
        let toml = "[server]\nport = 8080\n";
        let config = Config::from_toml(toml, Some("http://preview/"), Path::new("/p")).unwrap();
        assert_eq!(config.site_url, "http://preview/");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_toml_does_not_reject_malformed_site_url() {
        let toml = "site_url = \"docs.example.com\"\n";
        let config = Config::from_toml(toml, None, Path::new("/p")).unwrap();
        assert_eq!(
            config.site_url_warnings(),
            vec![
                SiteUrlIssue::UnsupportedScheme,
                SiteUrlIssue::MissingTrailingSlash
            ]
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tome.toml");
        std::fs::write(&path, "site_name = \"From File\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site_name, "From File");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("docs"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/tome.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_with_cli_site_url_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tome.toml");
        std::fs::write(&path, "site_url = \"https://docs.example.com/\"\n").unwrap();

        let settings = CliSettings {
            site_url: Some("https://staging.example.com/".to_owned()),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.site_url, "https://staging.example.com/");
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            site_name: Some("Override".to_owned()),
            source_dir: Some(PathBuf::from("/custom/docs")),
            output_dir: Some(PathBuf::from("/custom/site")),
            strict: Some(true),
            host: Some("127.0.0.1".to_owned()),
            port: Some(8080),
            ..CliSettings::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.site_name, "Override");
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/custom/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/custom/site"));
        assert!(config.docs_resolved.strict);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site_name, "Documentation");
        assert_eq!(config.server.port, 80);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
    }

    #[test]
    fn test_expand_env_vars_site_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TOME_CONFIG_TEST_URL", "https://env.example.com/");
        }
        let toml = "site_url = \"${TOME_CONFIG_TEST_URL}\"\n";
        let config = Config::from_toml(toml, None, Path::new("/p")).unwrap();
        assert_eq!(config.site_url, "https://env.example.com/");
        unsafe {
            std::env::remove_var("TOME_CONFIG_TEST_URL");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TOME_CONFIG_MISSING_VAR");
        }
        let toml = "site_url = \"${TOME_CONFIG_MISSING_VAR}\"\n";
        let err = Config::from_toml(toml, None, Path::new("/p")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("site_url"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_site_name_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_name = String::new();
        assert_validation_error(&config, &["site_name", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_nav_entry_without_path_or_children() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.nav = Some(vec![NavEntry {
            title: "Empty".to_owned(),
            path: None,
            children: Vec::new(),
        }]);
        assert_validation_error(&config, &["nav[0]", "path or children"]);
    }

    #[test]
    fn test_validate_nav_rejects_non_markdown_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.nav = Some(vec![NavEntry {
            title: "Section".to_owned(),
            path: None,
            children: vec![NavEntry {
                title: "Logo".to_owned(),
                path: Some("img/logo.png".to_owned()),
                children: Vec::new(),
            }],
        }]);
        assert_validation_error(&config, &["nav[0].children[0].path", ".md"]);
    }
}
