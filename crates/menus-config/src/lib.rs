//! Configuration management for site menus.
//!
//! Parses `menus.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `classes.active`
//! - `classes.ancestor`
//! - `source.fixture`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the site fixture file.
    pub fixture: Option<PathBuf>,
    /// Override whether active classes are applied.
    pub apply_active_classes: Option<bool>,
    /// Override whether parents may be repeated in sub-navigation.
    pub allow_repeating_parents: Option<bool>,
    /// Override whether hrefs use absolute URLs.
    pub use_absolute_page_urls: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "menus.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSS class labels applied to active items.
    pub classes: ClassesConfig,
    /// Menu structure settings.
    pub menus: MenusConfig,
    /// Default option values for menu building.
    pub defaults: DefaultsConfig,
    /// Fixture source configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    #[allow(clippy::derivable_impls)]
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Class labels for active menu items.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassesConfig {
    /// Class for the item representing the current page.
    pub active: String,
    /// Class for items that are ancestors of the current page.
    pub ancestor: String,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        Self {
            active: "active".to_owned(),
            ancestor: "ancestor".to_owned(),
        }
    }
}

/// How specific page behaviors are consulted while building menus.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum UseSpecific {
    /// Never consult page behaviors.
    Off,
    /// Consult behaviors where a page declares them.
    #[default]
    Auto,
    /// Consult behaviors for top-level items eagerly.
    TopLevel,
    /// Always consult behaviors.
    Always,
}

/// Menu structure settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MenusConfig {
    /// Tree depth of section root pages (tree roots are depth 1).
    pub section_root_depth: u32,
    /// Default levels rendered by main menus.
    pub main_max_levels: u32,
    /// Default levels rendered by flat menus.
    pub flat_max_levels: u32,
    /// Default levels rendered by section menus.
    pub section_max_levels: u32,
    /// Default levels rendered by children menus.
    pub children_max_levels: u32,
    /// Upper bound accepted for any `max_levels` value.
    pub max_levels_limit: u32,
    /// Default behavior lookup mode.
    pub use_specific: UseSpecific,
    /// Relation name under which main menu items are listed in fixtures.
    pub main_items_relation: String,
    /// Relation name under which flat menu items are listed in fixtures.
    pub flat_items_relation: String,
}

impl Default for MenusConfig {
    fn default() -> Self {
        Self {
            section_root_depth: 2,
            main_max_levels: 2,
            flat_max_levels: 1,
            section_max_levels: 2,
            children_max_levels: 1,
            max_levels_limit: 4,
            use_specific: UseSpecific::Auto,
            main_items_relation: "menu_items".to_owned(),
            flat_items_relation: "menu_items".to_owned(),
        }
    }
}

/// Default option values for menu building.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Compute active and ancestor classes.
    pub apply_active_classes: bool,
    /// Repeat opted-in parents inside their own sub-navigation.
    pub allow_repeating_parents: bool,
    /// Render absolute URLs instead of site-relative ones.
    pub use_absolute_page_urls: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            apply_active_classes: true,
            allow_repeating_parents: true,
            use_absolute_page_urls: false,
        }
    }
}

/// Raw source configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    fixture: Option<String>,
}

/// Resolved source configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// Site fixture file describing pages, sites and menus.
    pub fixture: PathBuf,
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
        /// Config field path (e.g., "`classes.active`").
        field: String,
        /// Error message (e.g., "${`MENU_ACTIVE_CLASS`} not set").
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

/// Require a class label to be a single token.
fn require_class_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single class name"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `menus.toml` in current directory and parents.
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
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(fixture) = &settings.fixture {
            self.source_resolved.fixture.clone_from(fixture);
        }
        if let Some(apply) = settings.apply_active_classes {
            self.defaults.apply_active_classes = apply;
        }
        if let Some(allow) = settings.allow_repeating_parents {
            self.defaults.allow_repeating_parents = allow;
        }
        if let Some(absolute) = settings.use_absolute_page_urls {
            self.defaults.use_absolute_page_urls = absolute;
        }
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
            classes: ClassesConfig::default(),
            menus: MenusConfig::default(),
            defaults: DefaultsConfig::default(),
            source: SourceConfigRaw::default(),
            source_resolved: SourceConfig {
                fixture: base.join("site.yaml"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_classes()?;
        self.validate_menus()?;
        Ok(())
    }

    /// Check a `max_levels` value against the configured limit.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the value is zero or above
    /// `menus.max_levels_limit`.
    pub fn check_max_levels(&self, value: u32, field: &str) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{field} must be greater than 0"
            )));
        }
        if value > self.menus.max_levels_limit {
            return Err(ConfigError::Validation(format!(
                "{field} cannot exceed {}",
                self.menus.max_levels_limit
            )));
        }
        Ok(())
    }

    fn validate_classes(&self) -> Result<(), ConfigError> {
        require_class_name(&self.classes.active, "classes.active")?;
        require_class_name(&self.classes.ancestor, "classes.ancestor")?;
        Ok(())
    }

    fn validate_menus(&self) -> Result<(), ConfigError> {
        let menus = &self.menus;

        if menus.max_levels_limit == 0 {
            return Err(ConfigError::Validation(
                "menus.max_levels_limit must be greater than 0".to_owned(),
            ));
        }
        if menus.section_root_depth == 0 {
            return Err(ConfigError::Validation(
                "menus.section_root_depth must be greater than 0".to_owned(),
            ));
        }

        self.check_max_levels(menus.main_max_levels, "menus.main_max_levels")?;
        self.check_max_levels(menus.flat_max_levels, "menus.flat_max_levels")?;
        self.check_max_levels(menus.section_max_levels, "menus.section_max_levels")?;
        self.check_max_levels(menus.children_max_levels, "menus.children_max_levels")?;

        require_non_empty(&menus.main_items_relation, "menus.main_items_relation")?;
        require_non_empty(&menus.flat_items_relation, "menus.flat_items_relation")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.classes.active = expand::expand_env(&self.classes.active, "classes.active")?;
        self.classes.ancestor = expand::expand_env(&self.classes.ancestor, "classes.ancestor")?;

        if let Some(ref fixture) = self.source.fixture {
            self.source.fixture = Some(expand::expand_env(fixture, "source.fixture")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let fixture = self.source.fixture.as_deref().unwrap_or("site.yaml");
        self.source_resolved = SourceConfig {
            fixture: config_dir.join(fixture),
        };
    }
}
