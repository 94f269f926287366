//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a small TOML file. Everything in it is
//! optional: a missing or unreadable file logs a warning and the compiled
//! defaults are used, so startup never fails for lack of configuration.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MUSICBOX_ROOT_FOLDER` environment variable
//! 3. `MUSICBOX_ROOT` environment variable
//! 4. `root_folder` in the TOML config file
//! 5. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Primary root folder environment variable
pub const ENV_ROOT_FOLDER: &str = "MUSICBOX_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ENV_ROOT: &str = "MUSICBOX_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "musicbox.db";

/// Built-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/musicbox (or /var/lib/musicbox for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("musicbox"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/musicbox"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/musicbox
        dirs::data_dir()
            .map(|d| d.join("musicbox"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/musicbox"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\musicbox
        dirs::data_local_dir()
            .map(|d| d.join("musicbox"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\musicbox"))
    } else {
        PathBuf::from("./musicbox_data")
    }
}

/// Bootstrap configuration loaded from TOML
///
/// Read once at startup. Restart to pick up changes.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Root folder for the database and uploaded audio (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub subscriptions: SubscriptionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body (audio uploads)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Upload directory; relative paths are resolved against the root folder
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// SQLite busy timeout
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Subscription lifecycle configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubscriptionConfig {
    /// Seconds between expiry sweeps; 0 disables the sweeper
    #[serde(default = "default_expiry_sweep_interval_secs")]
    pub expiry_sweep_interval_secs: u64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            expiry_sweep_interval_secs: default_expiry_sweep_interval_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_expiry_sweep_interval_secs() -> u64 {
    60
}

/// Candidate TOML config file locations for a module, most specific first
pub fn config_file_candidates(module_name: &str) -> Vec<PathBuf> {
    let file_name = format!("{}.toml", module_name);
    let mut candidates = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("musicbox").join(&file_name));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/musicbox").join(&file_name));
    }

    candidates
}

/// Load a TOML config file from an explicit path
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the module's TOML config, falling back to defaults
///
/// Never fails: missing files are expected, malformed files are logged.
pub fn load_module_config(module_name: &str) -> TomlConfig {
    for path in config_file_candidates(module_name) {
        if !path.exists() {
            continue;
        }
        match load_toml_config(&path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("{}; using built-in defaults", e);
                return TomlConfig::default();
            }
        }
    }

    debug!("No config file found for {}, using built-in defaults", module_name);
    TomlConfig::default()
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_override: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_override: None,
            toml_root: None,
        }
    }

    /// Command-line value (highest priority)
    pub fn with_cli_override(mut self, path: Option<PathBuf>) -> Self {
        self.cli_override = path;
        self
    }

    /// `root_folder` from an already loaded TOML config
    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_override {
            debug!("Root folder from command line: {}", path.display());
            return path.clone();
        }

        for var in [ENV_ROOT_FOLDER, ENV_ROOT] {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    debug!("Root folder from {}: {}", var, value);
                    return PathBuf::from(value);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            debug!("Root folder from TOML config: {}", path.display());
            return path.clone();
        }

        let default = CompiledDefaults::for_current_platform().root_folder;
        debug!(
            "Root folder for {} from compiled default: {}",
            self.module_name,
            default.display()
        );
        default
    }
}

/// Creates the root folder layout and hands out paths inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder if missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    /// Upload directory; absolute `upload_dir` values are used as-is
    pub fn upload_root(&self, storage: &StorageConfig) -> PathBuf {
        if storage.upload_dir.is_absolute() {
            storage.upload_dir.clone()
        } else {
            self.root_folder.join(&storage.upload_dir)
        }
    }
}
