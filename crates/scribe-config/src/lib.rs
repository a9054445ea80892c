//! Configuration management for Scribe.
//!
//! Parses `scribe.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `render.ipfs_gateway` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override IPFS gateway prefix.
    pub ipfs_gateway: Option<String>,
    /// Override `target="_blank"` on rendered links.
    pub external_links: Option<bool>,
    /// Override default excerpt length.
    pub excerpt_max_chars: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "scribe.toml";

/// Default IPFS gateway prefix.
const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Characters that must not appear in a gateway emitted into HTML attributes.
const GATEWAY_FORBIDDEN_CHARS: &[char] = &['"', '\'', '<', '>', '`'];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Excerpt configuration.
    pub excerpt: ExcerptConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Gateway prefix for `ipfs://` links and images.
    pub ipfs_gateway: String,
    /// Open rendered links in a new tab.
    pub external_links: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_owned(),
            external_links: true,
        }
    }
}

/// Excerpt configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    /// Maximum excerpt length in characters (ellipsis excluded).
    pub max_chars: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self { max_chars: 200 }
    }
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
        /// Config field path (e.g., "`render.ipfs_gateway`").
        field: String,
        /// Error message (e.g., "${`IPFS_GATEWAY`}: environment variable not found").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `scribe.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and take precedence over config
    /// file values. The merged configuration is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(gateway) = &settings.ipfs_gateway {
            self.render.ipfs_gateway.clone_from(gateway);
        }
        if let Some(external_links) = settings.external_links {
            self.render.external_links = external_links;
        }
        if let Some(max_chars) = settings.excerpt_max_chars {
            self.excerpt.max_chars = max_chars;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(current)
    }

    /// Search for config file starting at `dir` and walking up.
    fn discover_config_from(mut dir: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_excerpt()?;
        Ok(())
    }

    /// Validate render configuration.
    fn validate_render(&self) -> Result<(), ConfigError> {
        let gateway = &self.render.ipfs_gateway;
        require_non_empty(gateway, "render.ipfs_gateway")?;
        require_http_url(gateway, "render.ipfs_gateway")?;

        // The gateway is emitted verbatim into href/src attributes
        if gateway.contains(GATEWAY_FORBIDDEN_CHARS) || gateway.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "render.ipfs_gateway contains characters not allowed in a URL".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate excerpt configuration.
    fn validate_excerpt(&self) -> Result<(), ConfigError> {
        if self.excerpt.max_chars == 0 {
            return Err(ConfigError::Validation(
                "excerpt.max_chars must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.ipfs_gateway =
            expand::expand_env(&self.render.ipfs_gateway, "render.ipfs_gateway")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.ipfs_gateway, "https://ipfs.io/ipfs/");
        assert!(config.render.external_links);
        assert_eq!(config.excerpt.max_chars, 200);
        assert!(config.config_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.ipfs_gateway, "https://ipfs.io/ipfs/");
        assert_eq!(config.excerpt.max_chars, 200);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[render]
ipfs_gateway = "https://gw.example/ipfs/"
external_links = false

[excerpt]
max_chars = 80
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.ipfs_gateway, "https://gw.example/ipfs/");
        assert!(!config.render.external_links);
        assert_eq!(config.excerpt.max_chars, 80);
    }

    #[test]
    fn test_parse_partial_section_keeps_defaults() {
        let toml = r"
[render]
external_links = false
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.ipfs_gateway, "https://ipfs.io/ipfs/");
        assert!(!config.render.external_links);
    }

    #[test]
    fn test_parse_invalid_type() {
        let toml = r#"
[excerpt]
max_chars = "many"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_gateway_scheme() {
        let mut config = Config::default();
        config.render.ipfs_gateway = "ftp://gw.example/".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.ipfs_gateway"));
    }

    #[test]
    fn test_validate_gateway_empty() {
        let mut config = Config::default();
        config.render.ipfs_gateway = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_gateway_rejects_attribute_breakout() {
        let mut config = Config::default();
        config.render.ipfs_gateway = r#"https://gw.example/" onload="x"#.to_owned();
        assert!(config.validate().is_err());

        config.render.ipfs_gateway = "https://gw example/".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_excerpt_zero() {
        let mut config = Config::default();
        config.excerpt.max_chars = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("excerpt.max_chars"));
    }

    #[test]
    fn test_apply_cli_settings_gateway() {
        let mut config = Config::default();
        let overrides = CliSettings {
            ipfs_gateway: Some("https://cli.example/ipfs/".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.render.ipfs_gateway, "https://cli.example/ipfs/");
        assert!(config.render.external_links); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_external_links_and_excerpt() {
        let mut config = Config::default();
        let overrides = CliSettings {
            external_links: Some(false),
            excerpt_max_chars: Some(42),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(!config.render.external_links);
        assert_eq!(config.excerpt.max_chars, 42);
        assert_eq!(config.render.ipfs_gateway, "https://ipfs.io/ipfs/"); // Unchanged
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[excerpt]\nmax_chars = 50\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.excerpt.max_chars, 50);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.toml");
        std::fs::write(&path, "[render\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_applies_cli_settings_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.toml");
        std::fs::write(&path, "[render]\nexternal_links = true\n").unwrap();
        let overrides = CliSettings {
            external_links: Some(false),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert!(!config.render.external_links);
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            ipfs_gateway: Some("javascript:alert(1)".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("scribe.toml"), "").unwrap();

        let found = Config::discover_config_from(nested).unwrap();

        assert_eq!(found, dir.path().join("scribe.toml"));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("scribe.toml"), "").unwrap();
        std::fs::write(nested.join("scribe.toml"), "").unwrap();

        let found = Config::discover_config_from(nested.clone()).unwrap();

        assert_eq!(found, nested.join("scribe.toml"));
    }
}
