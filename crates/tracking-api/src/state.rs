//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds:
//! - **Tracking store**: issued records, unique on tracking number,
//!   optionally backed by PostgreSQL
//! - **Generator**: produces candidate tracking numbers
//! - **Metrics**: request and issuance counters
//! - **Configuration**
//!
//! The validator is stateless and lives in `tracking-core`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;
use tracking_core::{Clock, SystemClock, TimestampGenerator, TrackingNumberGenerator};

use crate::middleware::metrics::ApiMetrics;
use crate::store::TrackingStore;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not `tokio::sync`)
/// because we never hold the lock across `.await` points. `parking_lot::RwLock`
/// is non-poisonable.
#[derive(Debug)]
pub struct Store<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Store<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    /// Insert a record only if the key is free.
    ///
    /// The check and the insert happen under one write lock. On conflict
    /// the rejected value is handed back and the existing one is kept.
    pub fn insert_new(&self, key: K, value: V) -> Result<(), V> {
        match self.data.write().entry(key) {
            Entry::Occupied(_) => Err(value),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Retrieve a record by key.
    pub fn get(&self, key: &K) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Configuration ------------------------------------------------------------

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown LOG_FORMAT {other:?} (expected \"pretty\" or \"json\")")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Build configuration from `PORT` and `LOG_FORMAT`.
    ///
    /// Unset variables fall back to defaults. Set but malformed values are
    /// an error rather than silently ignored.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| format!("invalid PORT {port:?}: {e}"))?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        Ok(config)
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: every member is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    /// Issued tracking records.
    pub tracking_numbers: TrackingStore,
    /// Candidate tracking number source.
    pub generator: Arc<dyn TrackingNumberGenerator>,
    /// Request and issuance counters.
    pub metrics: ApiMetrics,
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tracking_numbers", &self.tracking_numbers)
            .field("metrics", &self.metrics)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// In-memory state with default configuration, the system clock, and
    /// the timestamp generator.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// State with the given configuration and optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self::from_parts(
            config,
            Arc::new(TimestampGenerator::system()),
            Arc::new(SystemClock),
            db_pool,
        )
    }

    /// State with every capability supplied by the caller.
    ///
    /// Tests use this to pin the clock and the random source.
    pub fn from_parts(
        config: AppConfig,
        generator: Arc<dyn TrackingNumberGenerator>,
        clock: Arc<dyn Clock>,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            tracking_numbers: TrackingStore::new(clock, db_pool),
            generator,
            metrics: ApiMetrics::new(),
            config,
        }
    }

    /// Hydrate the in-memory index from the database.
    ///
    /// Called once on startup. No-op without a database pool.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let loaded = self
            .tracking_numbers
            .hydrate()
            .await
            .map_err(|e| format!("failed to load tracking numbers: {e}"))?;

        if let Some(count) = loaded {
            tracing::info!(tracking_numbers = count, "Hydrated in-memory store from database");
        }
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
