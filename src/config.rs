//! Configuration for formfill paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (FORMFILL_HOME, FORMFILL_DB)
//! 2. Config file (.formfill/config.yaml)
//! 3. Defaults (~/.formfill)
//!
//! Config file discovery:
//! - Searches current directory and parents for .formfill/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Engine state directory (relative to config file)
    pub home: Option<String>,
    /// Database file (relative to config file)
    pub database: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to formfill home (engine state)
    pub home: PathBuf,
    /// Absolute path to the SQLite database
    pub database: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".formfill").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".formfill");

    let config_file = find_config_file();

    let (home, database) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let formfill_dir = config_path.parent().unwrap_or(Path::new("."));

        let home = if let Ok(env_home) = std::env::var("FORMFILL_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            resolve_path(formfill_dir, home_path)
        } else {
            default_home.clone()
        };

        let database = if let Ok(env_db) = std::env::var("FORMFILL_DB") {
            PathBuf::from(env_db)
        } else if let Some(ref db_path) = config.paths.database {
            resolve_path(formfill_dir, db_path)
        } else {
            home.join("formfill.db")
        };

        (home, database)
    } else {
        let home = std::env::var("FORMFILL_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        let database = std::env::var("FORMFILL_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("formfill.db"));

        (home, database)
    };

    Ok(ResolvedConfig {
        home,
        database,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the formfill home directory (engine state).
pub fn home_dir() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the SQLite database path ($FORMFILL_HOME/formfill.db by default)
pub fn db_path() -> Result<PathBuf> {
    Ok(config()?.database.clone())
}
