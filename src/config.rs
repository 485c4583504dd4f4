// Configuration loading and parsing (config/client.toml).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::query::{ListQuery, SortOrder};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire client.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    server: ServerConfig,
    #[serde(default)]
    credentials: CredentialsConfig,
    #[serde(default)]
    browser: BrowserConfig,
    #[serde(default)]
    log: LogConfig,
}

/// The assembled, validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub credentials: CredentialsConfig,
    pub browser: BrowserConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend API, e.g. `http://localhost:3000/api`.
    /// Trailing slashes are stripped at load time so URL building can always
    /// join with a plain `/`.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsConfig {
    /// Both fields present and non-empty.
    pub fn is_complete(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Defaults for the Pokemon browser screens.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_page_size() -> u32 {
    20
}

fn default_sort_by() -> String {
    "name".to_string()
}

fn default_sort_order() -> String {
    "ASC".to_string()
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            page_size: default_page_size(),
            sort_by: default_sort_by(),
            sort_order: default_sort_order(),
        }
    }
}

impl BrowserConfig {
    pub fn sort_order(&self) -> SortOrder {
        if self.sort_order.eq_ignore_ascii_case("DESC") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// A list query for the given page using the configured defaults.
    pub fn list_query(&self, page: u32) -> ListQuery {
        ListQuery {
            page,
            page_size: self.page_size,
            sort_by: Some(self.sort_by.clone()),
            sort_order: Some(self.sort_order()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> String {
    "logs/pokedraft.log".to_string()
}

fn default_log_filter() -> String {
    "pokedraft=info,warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/client.toml` under the given
/// base directory.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("client.toml");
    load_config_file(&path)
}

/// Load configuration from the working directory, falling back to the
/// user-level config directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let local = PathBuf::from("config").join("client.toml");
    if local.exists() {
        return load_config_file(&local);
    }

    if let Some(dirs) = ProjectDirs::from("", "", "pokedraft") {
        let user_path = dirs.config_dir().join("client.toml");
        if user_path.exists() {
            return load_config_file(&user_path);
        }
    }

    Err(ConfigError::FileNotFound { path: local })
}

fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;

    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config = Config {
        server: file.server,
        credentials: file.credentials,
        browser: file.browser,
        log: file.log,
    };

    // Normalize so URL construction always joins with a single `/`.
    while config.server.base_url.ends_with('/') {
        config.server.base_url.pop();
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.base_url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "server.base_url".into(),
            message: "must not be empty".into(),
        });
    }
    if config.server.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.timeout_secs".into(),
            message: "must be at least 1".into(),
        });
    }
    if config.browser.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "browser.page_size".into(),
            message: "must be at least 1".into(),
        });
    }
    let order = config.browser.sort_order.as_str();
    if !order.eq_ignore_ascii_case("ASC") && !order.eq_ignore_ascii_case("DESC") {
        return Err(ConfigError::ValidationError {
            field: "browser.sort_order".into(),
            message: format!("expected ASC or DESC, got `{order}`"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
