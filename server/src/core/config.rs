use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filters::{CompileOptions, FilterCompiler, PresenceRule};
use crate::data::sql::Backend;
use crate::data::sqlite::Page;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_DATABASE_PATH, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SEARCH_MAX_LIMIT, MEMORY_DATABASE_PATH,
};

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub path: Option<PathBuf>,
}

/// Filter compiler configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FiltersFileConfig {
    pub dialect: Option<Backend>,
    pub escape_wildcards: Option<bool>,
    pub explicit_presence: Option<bool>,
}

/// Search configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchFileConfig {
    pub default_limit: Option<u32>,
    pub max_limit: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub database: Option<DatabaseFileConfig>,
    pub filters: Option<FiltersFileConfig>,
    pub search: Option<SearchFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                tracing::trace!(path = ?database.path, "Merging database.path");
                current.path = database.path;
            }
        }

        if let Some(filters) = other.filters {
            let current = self.filters.get_or_insert_with(FiltersFileConfig::default);
            if filters.dialect.is_some() {
                current.dialect = filters.dialect;
            }
            if filters.escape_wildcards.is_some() {
                current.escape_wildcards = filters.escape_wildcards;
            }
            if filters.explicit_presence.is_some() {
                current.explicit_presence = filters.explicit_presence;
            }
        }

        if let Some(search) = other.search {
            let current = self.search.get_or_insert_with(SearchFileConfig::default);
            if search.default_limit.is_some() {
                current.default_limit = search.default_limit;
            }
            if search.max_limit.is_some() {
                current.max_limit = search.max_limit;
            }
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    /// True when the path selects a throwaway in-memory database
    pub fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_DATABASE_PATH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub dialect: Backend,
    pub escape_wildcards: bool,
    pub presence: PresenceRule,
}

impl FilterConfig {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            presence: self.presence,
            escape_wildcards: self.escape_wildcards,
        }
    }

    pub fn compiler(&self) -> FilterCompiler {
        FilterCompiler::new(self.dialect.dialect(), self.compile_options())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl SearchConfig {
    /// Page for a request, falling back to the default limit and clamping
    pub fn page(&self, limit: Option<u32>, offset: u32) -> Page {
        Page::new(limit.unwrap_or(self.default_limit), offset).clamped(self.max_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub filters: FilterConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration: defaults -> config files -> CLI/env overrides
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.clinica/clinica.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(file_config, cli)
    }

    /// Resolve merged file config and CLI/env overrides into the final config
    fn from_layers(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_database = file_config.database.unwrap_or_default();
        let file_filters = file_config.filters.unwrap_or_default();
        let file_search = file_config.search.unwrap_or_default();

        let database = DatabaseConfig {
            path: cli
                .database
                .clone()
                .or(file_database.path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
        };

        let explicit_presence = cli
            .explicit_presence
            .or(file_filters.explicit_presence)
            .unwrap_or(false);
        let filters = FilterConfig {
            dialect: cli.dialect.or(file_filters.dialect).unwrap_or_default(),
            escape_wildcards: cli
                .escape_wildcards
                .or(file_filters.escape_wildcards)
                .unwrap_or(false),
            presence: if explicit_presence {
                PresenceRule::Explicit
            } else {
                PresenceRule::Truthy
            },
        };

        let search = SearchConfig {
            default_limit: file_search.default_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            max_limit: file_search.max_limit.unwrap_or(DEFAULT_SEARCH_MAX_LIMIT),
        };

        let config = Self {
            database,
            filters,
            search,
        };
        config.validate()?;

        tracing::debug!(
            database = %config.database.path.display(),
            dialect = %config.filters.dialect,
            escape_wildcards = config.filters.escape_wildcards,
            presence = ?config.filters.presence,
            "Configuration resolved"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            anyhow::bail!("database.path must not be empty");
        }
        if self.search.max_limit == 0 {
            anyhow::bail!("search.max_limit must be greater than 0");
        }
        if self.search.default_limit == 0 {
            anyhow::bail!("search.default_limit must be greater than 0");
        }
        if self.search.default_limit > self.search.max_limit {
            anyhow::bail!(
                "search.default_limit ({}) exceeds search.max_limit ({})",
                self.search.default_limit,
                self.search.max_limit
            );
        }
        Ok(())
    }
}

/// Get the profile config path (~/.clinica/clinica.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
