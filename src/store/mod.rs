//! SQLite-backed store for learned observations and preferences.
//!
//! Observations are append-only rows in `field_mappings`; reads aggregate
//! them per (field_name, cv_path) group. Preferences and per-site configs
//! are JSON blobs. SQLite serializes concurrent writers internally, which
//! is all the write safety the learning engine needs.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::domain::{LearnedMapping, Preferences, SiteConfig};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable store for (domain, field_name, cv_path, confidence) observations.
pub struct MappingStore {
    conn: Connection,
}

impl MappingStore {
    /// Open the store at the configured default location.
    pub fn open_default() -> StoreResult<Self> {
        let path = crate::config::db_path().map_err(|e| StoreError::Config(e.to_string()))?;
        Self::open(&path)
    }

    /// Open or create a store at an explicit path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Default database location under the formfill home directory.
    pub fn default_path() -> StoreResult<PathBuf> {
        crate::config::db_path().map_err(|e| StoreError::Config(e.to_string()))
    }

    fn init(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS user_preferences (
                id INTEGER PRIMARY KEY,
                preferences_json TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS site_configurations (
                id INTEGER PRIMARY KEY,
                domain TEXT UNIQUE NOT NULL,
                config_json TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS field_mappings (
                id INTEGER PRIMARY KEY,
                domain TEXT NOT NULL,
                field_name TEXT NOT NULL,
                cv_path TEXT NOT NULL,
                confidence REAL NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            ",
        )?;
        Ok(())
    }

    /// Record one learned observation.
    ///
    /// Empty domain or field name is a caller bug and is rejected;
    /// confidence is clamped into [0, 1] before storage.
    pub fn save_observation(
        &self,
        domain: &str,
        field_name: &str,
        cv_path: &str,
        confidence: f64,
    ) -> StoreResult<()> {
        if domain.trim().is_empty() {
            return Err(StoreError::InvalidInput("domain must not be empty".into()));
        }
        if field_name.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "field_name must not be empty".into(),
            ));
        }

        let confidence = confidence.clamp(0.0, 1.0);

        self.conn.execute(
            "INSERT INTO field_mappings (domain, field_name, cv_path, confidence)
             VALUES (?1, ?2, ?3, ?4)",
            params![domain, field_name, cv_path, confidence],
        )?;

        debug!(domain, field_name, cv_path, confidence, "saved observation");
        Ok(())
    }

    /// Aggregate learned mappings for a domain.
    ///
    /// Groups observations by (field_name, cv_path), keeps groups with mean
    /// confidence above 0.5, ordered by usage count then mean confidence,
    /// both descending.
    pub fn get_learned_mappings(&self, domain: &str) -> StoreResult<Vec<LearnedMapping>> {
        let mut stmt = self.conn.prepare(
            "SELECT field_name, cv_path, AVG(confidence) AS avg_confidence, COUNT(*) AS usage_count
             FROM field_mappings
             WHERE domain = ?1
             GROUP BY field_name, cv_path
             HAVING avg_confidence > 0.5
             ORDER BY usage_count DESC, avg_confidence DESC",
        )?;

        let rows = stmt.query_map(params![domain], |row| {
            Ok(LearnedMapping {
                field_name: row.get(0)?,
                cv_path: row.get(1)?,
                avg_confidence: row.get(2)?,
                usage_count: row.get(3)?,
            })
        })?;

        let mut mappings = Vec::new();
        for row in rows {
            mappings.push(row?);
        }
        Ok(mappings)
    }

    /// Latest saved preferences, or defaults when none were ever saved.
    pub fn get_preferences(&self) -> StoreResult<Preferences> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT preferences_json FROM user_preferences ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(Preferences::default()),
        }
    }

    /// Save preferences as a new latest row.
    pub fn save_preferences(&self, preferences: &Preferences) -> StoreResult<()> {
        let json = serde_json::to_string(preferences)?;
        self.conn.execute(
            "INSERT INTO user_preferences (preferences_json) VALUES (?1)",
            params![json],
        )?;
        Ok(())
    }

    /// Per-domain site configuration, if one was saved.
    pub fn get_site_config(&self, domain: &str) -> StoreResult<Option<SiteConfig>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT config_json FROM site_configurations WHERE domain = ?1",
                params![domain],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    /// Upsert a site configuration.
    pub fn save_site_config(&self, config: &SiteConfig) -> StoreResult<()> {
        let json = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO site_configurations (domain, config_json) VALUES (?1, ?2)",
            params![config.domain, json],
        )?;
        Ok(())
    }
}
